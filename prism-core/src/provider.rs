use crate::{
    Config, DailyObservation, DateRange, Result, model::Coordinate, provider::acis::AcisProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod acis;

/// A source of daily gridded climate values for a point.
#[async_trait]
pub trait ClimateProvider: Send + Sync + Debug {
    /// Fetch one observation per day of `range` for `coordinate`.
    ///
    /// Implementations may return fewer days than requested when the service
    /// has no data for some of them; they never return days outside `range`.
    async fn fetch_daily(
        &self,
        coordinate: &Coordinate,
        range: &DateRange,
    ) -> Result<Vec<DailyObservation>>;
}

/// Construct the configured provider.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn ClimateProvider>> {
    let provider = AcisProvider::new(&config.service)?;
    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_default_config() {
        let cfg = Config::default();
        let provider = provider_from_config(&cfg).expect("default provider must build");
        assert!(format!("{provider:?}").contains("data.rcc-acis.org"));
    }
}
