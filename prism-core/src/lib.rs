//! Core library for the `prism` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - Coordinate file loading and date validation
//! - Abstraction over climate data providers, with an RCC ACIS implementation
//! - The CSV result writer and the retrieval loop
//!
//! It is used by `prism-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod coordinates;
pub mod dates;
pub mod error;
pub mod model;
pub mod output;
pub mod provider;
pub mod retrieve;

pub use config::{Config, PathsConfig, ServiceConfig};
pub use dates::{DateRange, EARLIEST_DATE};
pub use error::{ClimateError, Result};
pub use model::{Coordinate, DailyObservation};
pub use output::ResultWriter;
pub use provider::{ClimateProvider, provider_from_config};
pub use retrieve::{CoordinateFailure, RetrievalSummary, retrieve};
