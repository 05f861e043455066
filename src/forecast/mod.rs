//! Cash-flow forecast: one year month by month, then annualized years

mod calendar;
mod engine;
mod ledger;

pub use calendar::{parse_month, rotated_months, CANONICAL_MONTHS};
pub use engine::{forecast, FarmEconomics, ForecastEngine, ForecastWindow, HARVEST_MONTH_INDEX};
pub use ledger::{
    round_cents, ForecastReport, ForecastResult, ForecastSummary, Ledger, MonthRow, YearRow,
};
