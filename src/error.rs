//! Error type shared by the forecasting library

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Invalid loan term: {term_years} years (must be a whole number of years >= 1)")]
    InvalidTerm { term_years: f64 },

    #[error("Unknown month: {0:?} (expected a full English month name such as \"April\")")]
    UnknownMonth(String),

    #[error("Invalid forecast range: {years_forecasted} years (must be >= 1)")]
    InvalidRange { years_forecasted: i64 },

    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ForecastError {
    /// True for errors caused by the caller's inputs rather than by I/O
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ForecastError::InvalidTerm { .. }
                | ForecastError::UnknownMonth(_)
                | ForecastError::InvalidRange { .. }
                | ForecastError::InvalidInput { .. }
        )
    }
}

/// Reject negative and non-finite amounts
pub fn require_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ForecastError::InvalidInput {
            field: field.to_string(),
            reason: format!("must be a non-negative number (got {})", value),
        });
    }
    Ok(())
}

pub type Result<T> = std::result::Result<T, ForecastError>;
