//! Farm profile matching the forecast request format

use serde::{Deserialize, Serialize};

use crate::error::{require_non_negative, ForecastError, Result};
use crate::forecast::{FarmEconomics, ForecastEngine, ForecastResult, ForecastWindow};
use crate::loan::LoanTerms;

/// Everything needed to forecast one farm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmProfile {
    #[serde(default)]
    pub farm_name: String,
    #[serde(default)]
    pub region: String,

    /// Enterprise type, e.g. "wheat" or "dairy"
    #[serde(default)]
    pub enterprise: String,

    pub hectares: f64,
    pub expected_yield_t_per_ha: f64,
    pub expected_price_per_tonne: f64,
    pub fixed_expenses: f64,
    pub variable_costs_per_hectare: f64,

    pub loan_balance: f64,

    /// Annual rate in percent
    pub loan_rate: f64,

    // Wide types so out-of-range request values surface as InvalidTerm/InvalidRange
    pub loan_term_years: f64,
    pub start_month: String,
    pub years_forecasted: i64,
}

impl FarmProfile {
    pub fn economics(&self) -> FarmEconomics {
        FarmEconomics {
            hectares: self.hectares,
            yield_per_ha: self.expected_yield_t_per_ha,
            price_per_tonne: self.expected_price_per_tonne,
            fixed_expenses: self.fixed_expenses,
            variable_cost_per_ha: self.variable_costs_per_hectare,
        }
    }

    pub fn loan_terms(&self) -> Result<LoanTerms> {
        LoanTerms::from_inputs(self.loan_balance, self.loan_rate, self.loan_term_years)
    }

    pub fn window(&self) -> Result<ForecastWindow> {
        let years = u32::try_from(self.years_forecasted)
            .ok()
            .filter(|&y| y >= 1)
            .ok_or(ForecastError::InvalidRange {
                years_forecasted: self.years_forecasted,
            })?;
        ForecastWindow::new(&self.start_month, years)
    }

    /// Check every input before forecasting
    pub fn validate(&self) -> Result<()> {
        if !self.hectares.is_finite() || self.hectares <= 0.0 {
            return Err(ForecastError::InvalidInput {
                field: "hectares".to_string(),
                reason: format!("must be greater than zero (got {})", self.hectares),
            });
        }

        require_non_negative("expected_yield_t_per_ha", self.expected_yield_t_per_ha)?;
        require_non_negative("expected_price_per_tonne", self.expected_price_per_tonne)?;
        require_non_negative("fixed_expenses", self.fixed_expenses)?;
        require_non_negative("variable_costs_per_hectare", self.variable_costs_per_hectare)?;

        // Loan balance, rate and term
        self.loan_terms()?;
        self.window()?;
        Ok(())
    }

    /// Validate and run the forecast
    pub fn forecast(&self) -> Result<ForecastResult> {
        self.validate()?;
        let engine = ForecastEngine::new(self.window()?);
        engine.project(&self.economics(), &self.loan_terms()?)
    }

    /// Name used in logs and batch output
    pub fn display_name(&self) -> &str {
        if self.farm_name.is_empty() {
            "(unnamed farm)"
        } else {
            &self.farm_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> FarmProfile {
        FarmProfile {
            farm_name: "Riverbend".to_string(),
            region: "Wimmera".to_string(),
            enterprise: "wheat".to_string(),
            hectares: 100.0,
            expected_yield_t_per_ha: 5.0,
            expected_price_per_tonne: 300.0,
            fixed_expenses: 12_000.0,
            variable_costs_per_hectare: 200.0,
            loan_balance: 50_000.0,
            loan_rate: 6.0,
            loan_term_years: 10.0,
            start_month: "April".to_string(),
            years_forecasted: 3,
        }
    }

    #[test]
    fn test_profile_forecast_matches_scalar_api() {
        let result = sample_profile().forecast().unwrap();
        assert_eq!(result.monthly_net().get("July"), Some(146_778.23));
        assert_eq!(result.yearly_cumulative().get("Year 3"), Some(334_016.31));
    }

    #[test]
    fn test_deserialize_request_json() {
        let json = r#"{
            "farm_name": "Hillside",
            "region": "Canterbury",
            "enterprise": "barley",
            "hectares": 50,
            "expected_yield_t_per_ha": 4,
            "expected_price_per_tonne": 250,
            "fixed_expenses": 8000,
            "variable_costs_per_hectare": 150,
            "loan_balance": 20000,
            "loan_rate": 5,
            "loan_term_years": 2,
            "start_month": "November",
            "years_forecasted": 4
        }"#;
        let profile: FarmProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.display_name(), "Hillside");

        let result = profile.forecast().unwrap();
        assert_eq!(result.yearly_net().get("Year 3"), Some(34_500.0));
    }

    #[test]
    fn test_descriptive_fields_are_optional() {
        let json = r#"{
            "hectares": 1, "expected_yield_t_per_ha": 1, "expected_price_per_tonne": 1,
            "fixed_expenses": 0, "variable_costs_per_hectare": 0,
            "loan_balance": 0, "loan_rate": 0, "loan_term_years": 1,
            "start_month": "May", "years_forecasted": 1
        }"#;
        let profile: FarmProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.display_name(), "(unnamed farm)");
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let mut p = sample_profile();
        p.hectares = 0.0;
        assert!(matches!(p.validate(), Err(ForecastError::InvalidInput { ref field, .. }) if field == "hectares"));

        let mut p = sample_profile();
        p.fixed_expenses = -1.0;
        assert!(matches!(p.validate(), Err(ForecastError::InvalidInput { ref field, .. }) if field == "fixed_expenses"));

        let mut p = sample_profile();
        p.loan_rate = f64::NAN;
        assert!(matches!(p.validate(), Err(ForecastError::InvalidInput { ref field, .. }) if field == "loan_rate"));

        let mut p = sample_profile();
        p.loan_term_years = -3.0;
        assert!(matches!(p.validate(), Err(ForecastError::InvalidTerm { .. })));

        let mut p = sample_profile();
        p.loan_term_years = 0.0;
        assert!(matches!(p.forecast(), Err(ForecastError::InvalidTerm { .. })));

        let mut p = sample_profile();
        p.loan_term_years = 10.5;
        assert!(matches!(p.forecast(), Err(ForecastError::InvalidTerm { .. })));

        let mut p = sample_profile();
        p.years_forecasted = 0;
        assert!(matches!(p.validate(), Err(ForecastError::InvalidRange { years_forecasted: 0 })));

        let mut p = sample_profile();
        p.start_month = "Apr".to_string();
        assert!(matches!(p.validate(), Err(ForecastError::UnknownMonth(_))));
    }

    #[test]
    fn test_term_accepts_whole_floats_only() {
        let base = serde_json::to_value(sample_profile()).unwrap();

        let mut whole = base.clone();
        whole["loan_term_years"] = serde_json::json!(10.0);
        let profile: FarmProfile = serde_json::from_value(whole).unwrap();
        let result = profile.forecast().unwrap();
        assert_eq!(result.yearly_cumulative().get("Year 3"), Some(334_016.31));

        let mut fractional = base;
        fractional["loan_term_years"] = serde_json::json!(10.5);
        let profile: FarmProfile = serde_json::from_value(fractional).unwrap();
        assert!(matches!(profile.forecast(), Err(ForecastError::InvalidTerm { .. })));
    }
}
