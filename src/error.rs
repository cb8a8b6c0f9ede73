// External crates
use polars::error::PolarsError;
use thiserror::Error;

/// Result type alias for forecasting operations
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Failure taxonomy for the forecasting pipeline
///
/// Every variant is a distinct, catchable failure. The pipeline never
/// substitutes placeholder output or retries with shrunken parameters;
/// callers decide how to surface these.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// The requested target column does not exist in the series
    #[error("target column '{0}' not found in series")]
    InvalidColumn(String),

    /// The forecast horizon is not a positive number of steps
    #[error("forecast horizon must be positive, got {0}")]
    InvalidPeriods(usize),

    /// Too few rows remain to form at least one training and one
    /// validation window after smoothing and windowing
    #[error("insufficient data: {0}")]
    DataInsufficient(String),

    /// Model fitting produced a non-finite loss
    #[error("training diverged with loss {last_loss}")]
    TrainingFailed { last_loss: f64 },

    /// Upstream dataframe failure
    #[error(transparent)]
    Polars(#[from] PolarsError),
}
