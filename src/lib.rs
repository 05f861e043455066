//! Farm Cash Flow - multi-year cash-flow forecasting for agricultural operations
//!
//! This library provides:
//! - Fixed-rate loan amortization (constant monthly payment)
//! - A 12-month cash-flow forecast with a single annual harvest
//! - Annualized projections for the remaining forecast years
//! - Farm profile validation, CSV loading and parallel batch runs

pub mod error;
pub mod loan;
pub mod forecast;
pub mod farm;
pub mod batch;

// Re-export commonly used types
pub use error::{ForecastError, Result};
pub use loan::{compute_monthly_payment, LoanSummary, LoanTerms};
pub use forecast::{forecast, FarmEconomics, ForecastEngine, ForecastReport, ForecastResult, ForecastWindow};
pub use farm::FarmProfile;
pub use batch::{forecast_profiles, ProfileOutcome};
