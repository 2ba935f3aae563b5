//! AWS Lambda handler for ESPP earnings estimates
//!
//! Accepts a price history and plan inputs as JSON and returns the per-period
//! records along with the aggregate summary. Fetching the price history is
//! the caller's job; this function only computes.

use espp_calculator::earnings::{EarningsSummary, PeriodEarnings};
use espp_calculator::{calculate_espp_earnings, PlanParameters, PricePoint};
use chrono::NaiveDate;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{error, info};
use serde::{Deserialize, Serialize};

/// Input for one estimate
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsRequest {
    /// Daily price history, ascending by date
    pub stock_data: Vec<PricePoint>,

    /// First period start date
    pub period_start_date: NaiveDate,

    /// Months between purchases (default: 6)
    #[serde(default = "default_cadence")]
    pub period_cadence_in_months: u32,

    /// Annual income (default: 60000)
    #[serde(default = "default_income")]
    pub income: f64,

    /// Fraction of income contributed (default: 10%)
    #[serde(default = "default_contribution")]
    pub contribution_percentage: f64,

    /// Plan discount (default: 15%)
    #[serde(default = "default_discount")]
    pub discount: f64,

    /// Lookback provision (default: true)
    #[serde(default = "default_lookback")]
    pub lookback: bool,
}

fn default_cadence() -> u32 { 6 }
fn default_income() -> f64 { 60_000.0 }
fn default_contribution() -> f64 { 0.10 }
fn default_discount() -> f64 { 0.15 }
fn default_lookback() -> bool { true }

impl EarningsRequest {
    fn plan(&self) -> PlanParameters {
        PlanParameters {
            period_start_date: self.period_start_date,
            period_cadence_in_months: self.period_cadence_in_months,
            income: self.income,
            contribution_percentage: self.contribution_percentage,
            discount: self.discount,
            lookback: self.lookback,
        }
    }
}

/// Output of one estimate
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsResponse {
    pub complete: bool,
    pub total_earned: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<EarningsSummary>,
    pub periods: Vec<PeriodEarnings>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn estimate(request: &EarningsRequest) -> EarningsResponse {
    let start = std::time::Instant::now();

    match calculate_espp_earnings(&request.stock_data, &request.plan()) {
        Ok(result) => EarningsResponse {
            complete: result.is_complete(),
            total_earned: result.total_earned(),
            summary: Some(result.summary()),
            periods: result.periods,
            execution_time_ms: start.elapsed().as_millis() as u64,
            error: None,
        },
        Err(e) => {
            error!("estimate rejected: {}", e);
            EarningsResponse {
                execution_time_ms: start.elapsed().as_millis() as u64,
                error: Some(e.to_string()),
                ..Default::default()
            }
        }
    }
}

async fn handler(event: LambdaEvent<EarningsRequest>) -> Result<EarningsResponse, Error> {
    let (request, _context) = event.into_parts();
    info!(
        "estimating {} trading days from {} every {} months",
        request.stock_data.len(),
        request.period_start_date,
        request.period_cadence_in_months
    );
    Ok(estimate(&request))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
