//! Run forecasts for a block of farms from a CSV file
//!
//! Usage: run_block <profiles.csv> [--output block_forecast_output.csv]
//!
//! Writes one summary row per farm. Farms whose inputs fail validation are
//! kept in the output with the error message and empty figures.

use anyhow::{Context, Result};
use clap::Parser;
use farm_cashflow::farm::load_profiles;
use farm_cashflow::forecast_profiles;
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "run_block", about = "Forecast every farm in a CSV file")]
struct Args {
    /// CSV file of farm profiles
    input: PathBuf,

    #[arg(long, short, env = "BLOCK_OUTPUT", default_value = "block_forecast_output.csv")]
    output: PathBuf,
}

/// One output line per farm
#[derive(Debug, Default, Serialize)]
struct BlockRow {
    farm_name: String,
    gross_income: Option<f64>,
    total_expenses: Option<f64>,
    monthly_loan_payment: Option<f64>,
    year_one_balance: Option<f64>,
    ending_balance: Option<f64>,
    lowest_balance: Option<f64>,
    lowest_period: Option<String>,
    deficit_months: Option<u32>,
    flagged_months: Option<String>,
    error: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading farms from {}...", args.input.display());

    let profiles = load_profiles(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    println!("Loaded {} farms in {:?}", profiles.len(), start.elapsed());

    let run_start = Instant::now();
    let outcomes = forecast_profiles(&profiles);
    info!("forecasts complete in {:?}", run_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let mut failures = 0;
    for outcome in &outcomes {
        let row = match &outcome.result {
            Ok(result) => {
                let summary = result.summary();
                BlockRow {
                    farm_name: outcome.farm_name.clone(),
                    gross_income: Some(result.gross_income),
                    total_expenses: Some(result.total_expenses),
                    monthly_loan_payment: Some(result.monthly_loan_payment),
                    year_one_balance: result.months.last().map(|r| r.cumulative),
                    ending_balance: Some(summary.ending_balance),
                    lowest_balance: Some(summary.lowest_balance),
                    lowest_period: Some(summary.lowest_period),
                    deficit_months: Some(summary.deficit_months),
                    flagged_months: Some(result.flagged_months().join(";")),
                    error: None,
                }
            }
            Err(e) => {
                failures += 1;
                BlockRow {
                    farm_name: outcome.farm_name.clone(),
                    error: Some(e.to_string()),
                    ..Default::default()
                }
            }
        };
        writer.serialize(row)?;
    }
    writer.flush()?;

    println!("Output written to {}", args.output.display());
    println!("\nBlock Summary:");
    println!("  Farms:    {}", outcomes.len());
    println!("  Failed:   {}", failures);
    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
