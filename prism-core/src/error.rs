use thiserror::Error;

/// Errors produced while loading inputs, talking to ACIS, or writing results.
#[derive(Debug, Error)]
pub enum ClimateError {
    /// Bad user input: coordinate file contents, dates, ranges.
    #[error("{0}")]
    Validation(String),

    /// The request never produced a usable HTTP response.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The service answered, but rejected the request or returned something unusable.
    #[error("Service error: {0}")]
    Service(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl ClimateError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub(crate) fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    #[cfg(test)]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T, E = ClimateError> = std::result::Result<T, E>;
