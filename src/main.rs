//! Farm Cash Flow CLI
//!
//! Command-line interface for running cash-flow forecasts and loan quotes.
//! Every flag can also be set through the environment variable shown in `--help`.

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Args, Parser, Subcommand};
use farm_cashflow::forecast::CANONICAL_MONTHS;
use farm_cashflow::{FarmProfile, ForecastResult, LoanTerms};
use log::info;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "farm_cashflow", version, about = "Agribusiness cash-flow forecaster")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Forecast monthly and yearly cash flow for one farm
    Forecast(ForecastArgs),
    /// Quote monthly and total repayment for a loan
    Loan(LoanArgs),
}

#[derive(Args)]
struct ForecastArgs {
    /// JSON file holding a complete farm profile (replaces the individual flags)
    #[arg(long, env = "FARM_PROFILE")]
    profile: Option<PathBuf>,

    #[arg(long, env = "FARM_HECTARES", required_unless_present = "profile")]
    hectares: Option<f64>,

    /// Expected yield in tonnes per hectare
    #[arg(long = "yield", env = "FARM_YIELD", required_unless_present = "profile")]
    yield_per_ha: Option<f64>,

    /// Expected price per tonne
    #[arg(long, env = "FARM_PRICE", required_unless_present = "profile")]
    price: Option<f64>,

    #[arg(long, env = "FARM_FIXED_EXPENSES", default_value_t = 0.0)]
    fixed_expenses: f64,

    #[arg(long, env = "FARM_VARIABLE_COSTS", default_value_t = 0.0)]
    variable_costs: f64,

    #[arg(long, env = "LOAN_BALANCE", default_value_t = 0.0)]
    loan_balance: f64,

    /// Annual loan rate in percent
    #[arg(long, env = "LOAN_RATE", default_value_t = 0.0)]
    loan_rate: f64,

    #[arg(long, env = "LOAN_TERM_YEARS", default_value_t = 1.0)]
    loan_term: f64,

    /// Full month name; defaults to the current month
    #[arg(long, env = "FORECAST_START_MONTH")]
    start_month: Option<String>,

    #[arg(long, env = "FORECAST_YEARS", default_value_t = 1)]
    years: i64,

    /// Print the forecast report as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Write month and year rows to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Args)]
struct LoanArgs {
    #[arg(long, env = "LOAN_BALANCE", allow_negative_numbers = true)]
    balance: f64,

    /// Annual rate in percent
    #[arg(long, env = "LOAN_RATE", allow_negative_numbers = true)]
    rate: f64,

    /// Term in whole years
    #[arg(long, env = "LOAN_TERM_YEARS", allow_negative_numbers = true)]
    term: f64,
}

/// Flat row for CSV export
#[derive(Serialize)]
struct CsvRow<'a> {
    period: &'a str,
    kind: &'static str,
    income: f64,
    expenses: f64,
    loan_payment: f64,
    net: f64,
    cumulative: f64,
}

fn current_month_name() -> String {
    let month = chrono::Local::now().month() as usize;
    CANONICAL_MONTHS[month - 1].name().to_string()
}

impl ForecastArgs {
    fn to_profile(&self) -> Result<FarmProfile> {
        if let Some(path) = &self.profile {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading profile {}", path.display()))?;
            return serde_json::from_str(&text)
                .with_context(|| format!("parsing profile {}", path.display()));
        }

        Ok(FarmProfile {
            farm_name: String::new(),
            region: String::new(),
            enterprise: String::new(),
            hectares: self.hectares.context("--hectares is required")?,
            expected_yield_t_per_ha: self.yield_per_ha.context("--yield is required")?,
            expected_price_per_tonne: self.price.context("--price is required")?,
            fixed_expenses: self.fixed_expenses,
            variable_costs_per_hectare: self.variable_costs,
            loan_balance: self.loan_balance,
            loan_rate: self.loan_rate,
            loan_term_years: self.loan_term,
            start_month: self.start_month.clone().unwrap_or_else(current_month_name),
            years_forecasted: self.years,
        })
    }
}

fn write_csv(path: &Path, result: &ForecastResult) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    for row in &result.months {
        writer.serialize(CsvRow {
            period: &row.month,
            kind: "month",
            income: row.income,
            expenses: row.expenses,
            loan_payment: row.loan_payment,
            net: row.net,
            cumulative: row.cumulative,
        })?;
    }
    for row in &result.years {
        let label = row.label();
        writer.serialize(CsvRow {
            period: &label,
            kind: "year",
            income: row.income,
            expenses: row.expenses,
            loan_payment: row.loan_payment,
            net: row.net,
            cumulative: row.cumulative,
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn print_table(profile: &FarmProfile, result: &ForecastResult) {
    println!("Forecast: {}", profile.display_name());
    println!("  Gross Income:   ${:.2}", result.gross_income);
    println!("  Total Expenses: ${:.2}", result.total_expenses);
    println!("  Loan Payment:   ${:.2}/month", result.monthly_loan_payment);
    println!();

    println!("{:>10} {:>14} {:>14}  ", "Month", "Net", "Cumulative");
    println!("{}", "-".repeat(44));
    for row in &result.months {
        let flag = if row.is_deficit() { "!" } else { "" };
        println!("{:>10} {:>14.2} {:>14.2}  {}", row.month, row.net, row.cumulative, flag);
    }

    if !result.years.is_empty() {
        println!();
        println!("{:>10} {:>14} {:>14}", "Year", "Net", "Cumulative");
        println!("{}", "-".repeat(44));
        for row in &result.years {
            println!("{:>10} {:>14.2} {:>14.2}", row.label(), row.net, row.cumulative);
        }
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Deficit Months:  {}", summary.deficit_months);
    println!("  Lowest Balance:  ${:.2} ({})", summary.lowest_balance, summary.lowest_period);
    println!("  Ending Balance:  ${:.2}", summary.ending_balance);
    println!("  Total Loan Paid: ${:.2}", summary.total_loan_paid);
}

fn run_forecast(args: &ForecastArgs) -> Result<()> {
    let profile = args.to_profile()?;
    let result = profile.forecast().context("forecast failed")?;
    info!(
        "forecast complete for {}: {} flagged months",
        profile.display_name(),
        result.flagged_months().len()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.report())?);
    } else {
        print_table(&profile, &result);
    }

    if let Some(path) = &args.csv {
        write_csv(path, &result)?;
        println!("\nRows written to: {}", path.display());
    }
    Ok(())
}

fn run_loan(args: &LoanArgs) -> Result<()> {
    let summary = LoanTerms::from_inputs(args.balance, args.rate, args.term)?.summary()?;
    println!("Monthly Repayment: ${:.2}", summary.monthly_repayment);
    println!("Total Repayment:   ${:.2}", summary.total_repayment);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Forecast(args) => run_forecast(args),
        Command::Loan(args) => run_loan(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan_cli(args: &[&str]) -> Cli {
        let mut argv = vec!["farm_cashflow", "loan"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn run(cli: &Cli) -> Result<()> {
        match &cli.command {
            Command::Loan(args) => run_loan(args),
            Command::Forecast(args) => run_forecast(args),
        }
    }

    #[test]
    fn test_loan_accepts_valid_terms() {
        let cli = loan_cli(&["--balance", "50000", "--rate", "6", "--term", "10"]);
        assert!(run(&cli).is_ok());
    }

    #[test]
    fn test_loan_rejects_negative_amounts() {
        let cli = loan_cli(&["--balance", "-5000", "--rate", "6", "--term", "10"]);
        let err = run(&cli).unwrap_err();
        assert!(err.to_string().contains("loan_balance"), "{}", err);

        let cli = loan_cli(&["--balance", "5000", "--rate", "-1", "--term", "10"]);
        let err = run(&cli).unwrap_err();
        assert!(err.to_string().contains("loan_rate"), "{}", err);
    }

    #[test]
    fn test_loan_rejects_fractional_term() {
        let cli = loan_cli(&["--balance", "5000", "--rate", "6", "--term", "2.5"]);
        assert!(run(&cli).is_err());
    }
}
