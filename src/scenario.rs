//! Scenario runner for comparing many plan configurations
//!
//! Loads a price series once, then evaluates any number of plans against it.
//! Every run owns its own cap accumulator, so scenarios run in parallel
//! without sharing state.

use crate::earnings::{calculate_espp_earnings, EarningsResult};
use crate::error::Result;
use crate::market::{load_prices_csv, load_prices_json, PricePoint};
use crate::plan::PlanParameters;
use rayon::prelude::*;
use std::path::Path;

/// Pre-loaded scenario runner for one ticker's history
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv("aapl_5y.csv")?;
///
/// // Same plan with and without lookback
/// let with = PlanParameters { lookback: true, ..plan.clone() };
/// let without = PlanParameters { lookback: false, ..plan };
/// let results = runner.run_scenarios(&[with, without]);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    prices: Vec<PricePoint>,
}

impl ScenarioRunner {
    pub fn new(prices: Vec<PricePoint>) -> Self {
        Self { prices }
    }

    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(load_prices_csv(path)?))
    }

    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(load_prices_json(path)?))
    }

    /// Run a single plan
    pub fn run(&self, params: &PlanParameters) -> Result<EarningsResult> {
        calculate_espp_earnings(&self.prices, params)
    }

    /// Run many plans in parallel; results keep the input order
    pub fn run_scenarios(&self, scenarios: &[PlanParameters]) -> Vec<Result<EarningsResult>> {
        scenarios
            .par_iter()
            .map(|params| calculate_espp_earnings(&self.prices, params))
            .collect()
    }

    pub fn prices(&self) -> &[PricePoint] {
        &self.prices
    }
}
