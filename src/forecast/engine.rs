//! Core forecast engine: one monthly year followed by annualized years

use chrono::Month;
use log::debug;
use serde::{Deserialize, Serialize};

use super::calendar::{parse_month, rotated_months};
use super::ledger::{round_cents, ForecastResult, MonthRow, YearRow};
use crate::error::{ForecastError, Result};
use crate::loan::LoanTerms;

/// Position within the forecast window at which harvest income lands (the 4th month)
pub const HARVEST_MONTH_INDEX: usize = 3;

/// Production economics of the farm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FarmEconomics {
    pub hectares: f64,
    pub yield_per_ha: f64,
    pub price_per_tonne: f64,

    /// Annual fixed expenses
    pub fixed_expenses: f64,

    /// Variable cost per hectare per year
    pub variable_cost_per_ha: f64,
}

impl FarmEconomics {
    /// Annual harvest income
    pub fn gross_income(&self) -> f64 {
        self.hectares * self.yield_per_ha * self.price_per_tonne
    }

    /// Annual fixed plus variable expenses
    pub fn total_expenses(&self) -> f64 {
        self.fixed_expenses + self.variable_cost_per_ha * self.hectares
    }

    pub fn monthly_expenses(&self) -> f64 {
        self.total_expenses() / 12.0
    }
}

/// Where the forecast starts and how many years it covers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastWindow {
    pub start_month: Month,
    pub years_forecasted: u32,
}

impl ForecastWindow {
    /// Build a window from a full month name and a year count
    pub fn new(start_month: &str, years_forecasted: u32) -> Result<Self> {
        let start_month = parse_month(start_month)?;
        if years_forecasted < 1 {
            return Err(ForecastError::InvalidRange {
                years_forecasted: i64::from(years_forecasted),
            });
        }
        Ok(Self {
            start_month,
            years_forecasted,
        })
    }
}

/// Forecast engine for a single window
pub struct ForecastEngine {
    window: ForecastWindow,
}

impl ForecastEngine {
    pub fn new(window: ForecastWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> &ForecastWindow {
        &self.window
    }

    /// Run the forecast for one farm and its loan
    pub fn project(&self, economics: &FarmEconomics, loan: &LoanTerms) -> Result<ForecastResult> {
        let monthly_loan_payment = loan.monthly_payment()?;
        let gross_income = economics.gross_income();
        let total_expenses = economics.total_expenses();

        debug!(
            "forecast from {} for {} years: gross_income={:.2} total_expenses={:.2} loan_payment={:.2}",
            self.window.start_month.name(),
            self.window.years_forecasted,
            gross_income,
            total_expenses,
            monthly_loan_payment,
        );

        // Shared by the monthly and yearly phases; never reset
        let mut running_total = 0.0;

        let months = self.project_months(economics, monthly_loan_payment, &mut running_total);
        let years = self.project_years(economics, loan, monthly_loan_payment, &mut running_total);

        Ok(ForecastResult {
            gross_income,
            total_expenses,
            monthly_loan_payment,
            months,
            years,
        })
    }

    fn project_months(
        &self,
        economics: &FarmEconomics,
        monthly_loan_payment: f64,
        running_total: &mut f64,
    ) -> Vec<MonthRow> {
        let gross_income = economics.gross_income();
        let monthly_expenses = economics.monthly_expenses();

        rotated_months(self.window.start_month)
            .iter()
            .enumerate()
            .map(|(position, month)| {
                let income = if position == HARVEST_MONTH_INDEX { gross_income } else { 0.0 };
                let net = income - monthly_expenses - monthly_loan_payment;
                *running_total += net;

                MonthRow {
                    position,
                    month: month.name().to_string(),
                    income,
                    expenses: monthly_expenses,
                    loan_payment: monthly_loan_payment,
                    net: round_cents(net),
                    cumulative: round_cents(*running_total),
                }
            })
            .collect()
    }

    fn project_years(
        &self,
        economics: &FarmEconomics,
        loan: &LoanTerms,
        monthly_loan_payment: f64,
        running_total: &mut f64,
    ) -> Vec<YearRow> {
        let income = economics.gross_income();
        let expenses = economics.total_expenses();

        (2..=self.window.years_forecasted)
            .map(|year| {
                let loan_payment = if loan.is_active_in_year(year) {
                    monthly_loan_payment * 12.0
                } else {
                    0.0
                };
                let net = income - expenses - loan_payment;
                *running_total += net;

                YearRow {
                    year,
                    income,
                    expenses,
                    loan_payment,
                    net: round_cents(net),
                    cumulative: round_cents(*running_total),
                }
            })
            .collect()
    }
}

/// Forecast a farm's cash flow from scalar inputs.
///
/// Harvest income lands in the 4th month of the window. Year 1 is reported
/// month by month and years 2..=`years_forecasted` as annual totals, all on
/// one running balance.
///
/// # Errors
/// `InvalidTerm` for a zero-year loan, `UnknownMonth` for a start month that is
/// not a full English month name, `InvalidRange` when `years_forecasted` is zero.
#[allow(clippy::too_many_arguments)]
pub fn forecast(
    hectares: f64,
    yield_per_ha: f64,
    price_per_tonne: f64,
    fixed_expenses: f64,
    variable_cost_per_ha: f64,
    loan_principal: f64,
    loan_rate_pct: f64,
    loan_term_years: u32,
    start_month: &str,
    years_forecasted: u32,
) -> Result<ForecastResult> {
    let economics = FarmEconomics {
        hectares,
        yield_per_ha,
        price_per_tonne,
        fixed_expenses,
        variable_cost_per_ha,
    };
    let loan = LoanTerms::new(loan_principal, loan_rate_pct, loan_term_years)?;
    let window = ForecastWindow::new(start_month, years_forecasted)?;

    ForecastEngine::new(window).project(&economics, &loan)
}
