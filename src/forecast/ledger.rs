//! Forecast output structures

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// Round to cents on the exact binary value, ties to even (0.125 -> 0.12,
/// 2.675 -> 2.67). Negative zero comes back as +0.0.
pub fn round_cents(value: f64) -> f64 {
    format!("{:.2}", value).parse::<f64>().unwrap_or(value) + 0.0
}

/// One month of the first forecast year
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct MonthRow {
    /// Position within the forecast window (0 = start month)
    pub position: usize,
    pub month: String,
    pub income: f64,
    pub expenses: f64,
    pub loan_payment: f64,

    /// Net cash flow, rounded to cents
    pub net: f64,

    /// Running total at month end, rounded to cents
    pub cumulative: f64,
}

impl MonthRow {
    pub fn is_deficit(&self) -> bool {
        self.net < 0.0
    }
}

/// One annualized forecast year (year 2 onwards)
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct YearRow {
    pub year: u32,
    pub income: f64,
    pub expenses: f64,
    pub loan_payment: f64,

    /// Annual net cash flow, rounded to cents
    pub net: f64,

    /// Running total at year end, rounded to cents
    pub cumulative: f64,
}

impl YearRow {
    /// Key used in the yearly maps, e.g. "Year 2"
    pub fn label(&self) -> String {
        format!("Year {}", self.year)
    }
}

/// Ordered label → amount pairs, serialized as a JSON object in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger(Vec<(String, f64)>);

impl Ledger {
    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.iter().find(|(l, _)| l == label).map(|&(_, v)| v)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(l, _)| l.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(|&(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(l, v)| (l.as_str(), *v))
    }

    pub fn last(&self) -> Option<(&str, f64)> {
        self.0.last().map(|(l, v)| (l.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for Ledger {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Ledger(iter.into_iter().collect())
    }
}

impl Serialize for Ledger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, value) in &self.0 {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// The five-part forecast mapping returned to API callers
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ForecastReport {
    #[serde(rename = "monthly_cash_flow")]
    pub monthly_net: Ledger,
    pub monthly_cumulative: Ledger,
    pub flagged_months: Vec<String>,
    pub yearly_cumulative: Ledger,
    pub yearly_net: Ledger,
}

/// Complete forecast result
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct ForecastResult {
    /// Annual harvest income (hectares × yield × price)
    pub gross_income: f64,

    /// Annual fixed plus variable expenses
    pub total_expenses: f64,

    pub monthly_loan_payment: f64,

    /// First forecast year, month by month in window order
    pub months: Vec<MonthRow>,

    /// Years 2..=N, annualized
    pub years: Vec<YearRow>,
}

impl ForecastResult {
    pub fn monthly_net(&self) -> Ledger {
        self.months.iter().map(|r| (r.month.clone(), r.net)).collect()
    }

    pub fn monthly_cumulative(&self) -> Ledger {
        self.months.iter().map(|r| (r.month.clone(), r.cumulative)).collect()
    }

    /// Deficit months of year 1, in window order
    pub fn flagged_months(&self) -> Vec<String> {
        self.months
            .iter()
            .filter(|r| r.is_deficit())
            .map(|r| r.month.clone())
            .collect()
    }

    pub fn yearly_cumulative(&self) -> Ledger {
        self.years.iter().map(|r| (r.label(), r.cumulative)).collect()
    }

    pub fn yearly_net(&self) -> Ledger {
        self.years.iter().map(|r| (r.label(), r.net)).collect()
    }

    pub fn report(&self) -> ForecastReport {
        ForecastReport {
            monthly_net: self.monthly_net(),
            monthly_cumulative: self.monthly_cumulative(),
            flagged_months: self.flagged_months(),
            yearly_cumulative: self.yearly_cumulative(),
            yearly_net: self.yearly_net(),
        }
    }

    /// Get summary statistics
    pub fn summary(&self) -> ForecastSummary {
        let ending_balance = self
            .years
            .last()
            .map(|r| r.cumulative)
            .or_else(|| self.months.last().map(|r| r.cumulative))
            .unwrap_or(0.0);

        let lowest = self
            .months
            .iter()
            .map(|r| (r.month.clone(), r.cumulative))
            .chain(self.years.iter().map(|r| (r.label(), r.cumulative)))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let total_loan_paid = self.months.iter().map(|r| r.loan_payment).sum::<f64>()
            + self.years.iter().map(|r| r.loan_payment).sum::<f64>();

        let (lowest_period, lowest_balance) = lowest.unwrap_or_default();

        ForecastSummary {
            years_forecasted: self.years.len() as u32 + 1,
            ending_balance,
            lowest_balance,
            lowest_period,
            deficit_months: self.months.iter().filter(|r| r.is_deficit()).count() as u32,
            total_loan_paid: round_cents(total_loan_paid),
        }
    }
}

/// Summary statistics for a forecast
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct ForecastSummary {
    pub years_forecasted: u32,
    pub ending_balance: f64,
    pub lowest_balance: f64,

    /// Month name or "Year N" label where the lowest balance occurs
    pub lowest_period: String,
    pub deficit_months: u32,
    pub total_loan_paid: f64,
}
