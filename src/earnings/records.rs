//! Earnings output structures

use super::periods::BoundaryPoint;
use serde::{Deserialize, Serialize};

/// Full arithmetic of one purchase period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodEarnings {
    /// Period number within the run (1-indexed)
    pub period: u32,

    pub period_start: BoundaryPoint,
    pub period_end: BoundaryPoint,

    // Purchase
    pub contribution_this_period: f64,
    pub buy_price_of_stock: f64,
    pub discounted_purchase_price: f64,
    pub stock_bought: u64,
    pub money_used_to_buy_stock: f64,
    pub unused_money: f64,

    // Sale at period end
    pub price_of_stock: f64,
    pub total_sale_price: f64,
    pub gain: f64,

    // Settlement
    pub amount_to_pay_back: f64,
    pub cash_in_bank_after_sale: f64,
    pub money_made_by_client: f64,
    pub money_made_by_cake: f64,

    /// Cumulative purchases at period-start price, after this period
    #[serde(rename = "totalIRSContributions")]
    pub total_irs_contributions: f64,
}

/// Result of one engine run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsResult {
    /// Periods a full year of history would have produced
    pub expected_periods: u32,

    pub periods: Vec<PeriodEarnings>,
}

impl EarningsResult {
    pub fn new(expected_periods: u32, periods: Vec<PeriodEarnings>) -> Self {
        Self { expected_periods, periods }
    }

    /// False when the price history was too short for a full plan year
    pub fn is_complete(&self) -> bool {
        self.periods.len() == self.expected_periods as usize
    }

    /// Total earned by the employee across all periods
    pub fn total_earned(&self) -> f64 {
        self.periods.iter().map(|p| p.money_made_by_client).sum()
    }

    pub fn summary(&self) -> EarningsSummary {
        let total_contributions: f64 = self.periods.iter().map(|p| p.contribution_this_period).sum();
        let total_shares: u64 = self.periods.iter().map(|p| p.stock_bought).sum();
        let total_gain: f64 = self.periods.iter().map(|p| p.gain).sum();
        let total_money_made_by_cake: f64 = self.periods.iter().map(|p| p.money_made_by_cake).sum();
        let cap_used = self.periods.last().map(|p| p.total_irs_contributions).unwrap_or(0.0);

        EarningsSummary {
            periods: self.periods.len() as u32,
            expected_periods: self.expected_periods,
            total_contributions,
            total_shares,
            total_gain,
            total_money_made_by_client: self.total_earned(),
            total_money_made_by_cake,
            cap_used,
        }
    }
}

/// Aggregates across a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsSummary {
    pub periods: u32,
    pub expected_periods: u32,
    pub total_contributions: f64,
    pub total_shares: u64,
    pub total_gain: f64,
    pub total_money_made_by_client: f64,
    pub total_money_made_by_cake: f64,
    pub cap_used: f64,
}
