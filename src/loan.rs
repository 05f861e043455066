//! Fixed-rate loan amortization
//!
//! A single loan repaid by a constant monthly payment over a whole number of years.

use serde::{Deserialize, Serialize};

use crate::error::{require_non_negative, ForecastError, Result};

/// Terms of a fixed-rate amortizing loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Outstanding principal
    pub principal: f64,

    /// Annual nominal rate in percent (6.0 = 6%)
    pub annual_rate_pct: f64,

    /// Term in whole years
    pub term_years: u32,
}

/// Repayment figures quoted for a loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub monthly_repayment: f64,
    pub total_repayment: f64,
}

impl LoanTerms {
    /// Create loan terms, rejecting a zero-year term
    pub fn new(principal: f64, annual_rate_pct: f64, term_years: u32) -> Result<Self> {
        if term_years == 0 {
            return Err(ForecastError::InvalidTerm { term_years: 0.0 });
        }
        Ok(Self {
            principal,
            annual_rate_pct,
            term_years,
        })
    }

    /// Build terms from unchecked request values. Principal and rate must be
    /// non-negative; the term must be a whole number of years.
    pub fn from_inputs(principal: f64, annual_rate_pct: f64, term_years: f64) -> Result<Self> {
        require_non_negative("loan_balance", principal)?;
        require_non_negative("loan_rate", annual_rate_pct)?;
        Self::new(principal, annual_rate_pct, whole_term_years(term_years)?)
    }

    /// Periodic (monthly) rate as a decimal
    pub fn monthly_rate(&self) -> f64 {
        (self.annual_rate_pct / 100.0) / 12.0
    }

    /// Total number of monthly payments
    pub fn num_payments(&self) -> f64 {
        f64::from(self.term_years) * 12.0
    }

    /// Constant monthly payment that fully amortizes the principal
    pub fn monthly_payment(&self) -> Result<f64> {
        compute_monthly_payment(self.principal, self.annual_rate_pct, self.term_years)
    }

    /// Monthly and total repayment over the full term
    pub fn summary(&self) -> Result<LoanSummary> {
        let monthly_repayment = self.monthly_payment()?;
        Ok(LoanSummary {
            monthly_repayment,
            total_repayment: monthly_repayment * self.num_payments(),
        })
    }

    /// Whether payments are still due in the given forecast year (1-indexed)
    pub fn is_active_in_year(&self, year: u32) -> bool {
        year <= self.term_years
    }
}

/// Convert a requested term to whole years. Fractional, non-finite and
/// sub-one-year values are `InvalidTerm`; `10.0` is accepted as 10.
pub fn whole_term_years(term_years: f64) -> Result<u32> {
    if !term_years.is_finite()
        || term_years.fract() != 0.0
        || term_years < 1.0
        || term_years > f64::from(u32::MAX)
    {
        return Err(ForecastError::InvalidTerm { term_years });
    }
    Ok(term_years as u32)
}

/// Calculate the constant monthly payment for a fixed-rate loan.
///
/// Uses the annuity formula `P·r·(1+r)^n / ((1+r)^n − 1)` with
/// `r = (rate/100)/12` and `n = term_years·12`. A zero rate falls back to
/// straight-line repayment `P / n`. Terms long enough to overflow `(1+r)^n`
/// return the interest-only limit `P·r`.
///
/// # Errors
/// `InvalidTerm` when `term_years` is zero.
pub fn compute_monthly_payment(principal: f64, annual_rate_pct: f64, term_years: u32) -> Result<f64> {
    if term_years == 0 {
        return Err(ForecastError::InvalidTerm { term_years: 0.0 });
    }

    let r = (annual_rate_pct / 100.0) / 12.0;
    let n = f64::from(term_years) * 12.0;

    if r == 0.0 {
        return Ok(principal / n);
    }

    let growth = (1.0 + r).powf(n);
    if growth.is_infinite() {
        // Limit of the annuity payment as n grows: interest only
        return Ok(principal * r);
    }
    Ok(principal * r * growth / (growth - 1.0))
}
