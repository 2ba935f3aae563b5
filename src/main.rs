//! ESPP Calculator CLI
//!
//! Command-line interface for estimating a year of ESPP earnings from a
//! historical price file

use anyhow::{Context, Result};
use clap::Parser;
use espp_calculator::market::{load_prices_csv, load_prices_json, parse_date};
use espp_calculator::{calculate_espp_earnings, EarningsResult, PeriodEarnings, PlanParameters};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "espp_calculator", version, about = "Estimate a year of ESPP profits from price history")]
struct Args {
    /// Daily price history (.csv or .json with date, open, close)
    prices: PathBuf,

    /// First period start date (YYYY-MM-DD)
    #[arg(long)]
    start_date: String,

    /// Months between purchases (1, 3, 6 or 12)
    #[arg(long, default_value_t = 6)]
    cadence: u32,

    /// Annual income
    #[arg(long, default_value_t = 60_000.0)]
    income: f64,

    /// Fraction of income contributed
    #[arg(long, default_value_t = 0.10)]
    contribution: f64,

    /// Plan discount as a fraction
    #[arg(long, default_value_t = 0.15)]
    discount: f64,

    /// Plan has no lookback provision
    #[arg(long)]
    no_lookback: bool,

    /// Write per-period records to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the full result as JSON instead of a table
    #[arg(long)]
    json: bool,
}

/// Flat per-period row for CSV export
#[derive(Debug, Serialize)]
struct CsvRow {
    period: u32,
    period_start: String,
    period_end: String,
    start_close: f64,
    end_close: f64,
    contribution: f64,
    buy_price: f64,
    discounted_price: f64,
    shares: u64,
    money_used: f64,
    unused_money: f64,
    sale_proceeds: f64,
    gain: f64,
    amount_to_pay_back: f64,
    cash_after_sale: f64,
    client_profit: f64,
    cake_profit: f64,
    cap_used: f64,
}

impl From<&PeriodEarnings> for CsvRow {
    fn from(row: &PeriodEarnings) -> Self {
        Self {
            period: row.period,
            period_start: row.period_start.date.to_string(),
            period_end: row.period_end.date.to_string(),
            start_close: row.period_start.close,
            end_close: row.period_end.close,
            contribution: row.contribution_this_period,
            buy_price: row.buy_price_of_stock,
            discounted_price: row.discounted_purchase_price,
            shares: row.stock_bought,
            money_used: row.money_used_to_buy_stock,
            unused_money: row.unused_money,
            sale_proceeds: row.total_sale_price,
            gain: row.gain,
            amount_to_pay_back: row.amount_to_pay_back,
            cash_after_sale: row.cash_in_bank_after_sale,
            client_profit: row.money_made_by_client,
            cake_profit: row.money_made_by_cake,
            cap_used: row.total_irs_contributions,
        }
    }
}

/// Format as `$ 1,234.56`
fn format_dollars(value: f64, digits: usize) -> String {
    let formatted = format!("{:.*}", digits, value.abs());
    let (whole, frac) = match formatted.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') { "-" } else { "" };
    match frac {
        Some(f) => format!("$ {}{}.{}", sign, grouped, f),
        None => format!("$ {}{}", sign, grouped),
    }
}

fn write_csv(path: &Path, result: &EarningsResult) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for row in &result.periods {
        writer.serialize(CsvRow::from(row))?;
    }
    writer.flush()?;
    Ok(())
}

fn print_table(result: &EarningsResult) {
    println!("{:>6} {:>12} {:>12} {:>10} {:>8} {:>14} {:>14}",
        "Period", "Start", "End", "BuyPrice", "Shares", "Contribution", "ClientProfit");
    println!("{}", "-".repeat(82));

    for row in &result.periods {
        println!("{:>6} {:>12} {:>12} {:>10.2} {:>8} {:>14} {:>14}",
            row.period,
            row.period_start.date,
            row.period_end.date,
            row.discounted_purchase_price,
            row.stock_bought,
            format_dollars(row.contribution_this_period, 2),
            format_dollars(row.money_made_by_client, 2),
        );
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Periods: {} of {}", summary.periods, summary.expected_periods);
    println!("  Total Contributions: {}", format_dollars(summary.total_contributions, 2));
    println!("  Total Shares: {}", summary.total_shares);
    println!("  Total Gain: {}", format_dollars(summary.total_gain, 2));
    println!("  Cake Share: {}", format_dollars(summary.total_money_made_by_cake, 2));
    println!("  Total Earned: {}", format_dollars(summary.total_money_made_by_client, 2));
    println!("  Cap Used: {}", format_dollars(summary.cap_used, 2));
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let is_json = args
        .prices
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let prices = if is_json {
        load_prices_json(&args.prices)
    } else {
        load_prices_csv(&args.prices)
    }
    .with_context(|| format!("failed to load prices from {}", args.prices.display()))?;

    let params = PlanParameters {
        period_start_date: parse_date(&args.start_date)?,
        period_cadence_in_months: args.cadence,
        income: args.income,
        contribution_percentage: args.contribution,
        discount: args.discount,
        lookback: !args.no_lookback,
    };

    let result = calculate_espp_earnings(&prices, &params)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_table(&result);
    }

    if !result.is_complete() {
        eprintln!(
            "\nInsufficient price history: only {} of {} periods could be computed",
            result.periods.len(),
            result.expected_periods
        );
    }

    if let Some(path) = &args.output {
        write_csv(path, &result)?;
        println!("\nPer-period results written to: {}", path.display());
    }

    Ok(())
}
