use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("log scale domain must be strictly positive: [{low}, {high}]")]
    InvalidLogDomain { low: f64, high: f64 },

    #[error("{mode} requires `{field}` to be configured")]
    ConfigurationMismatch {
        mode: &'static str,
        field: &'static str,
    },
}
