//! A single trading day of the price feed

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day from the feed
///
/// Weekends and holidays are simply absent; the series is treated as a list
/// of valid trading days in ascending date order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, open: f64, close: f64) -> Self {
        Self { date, open, close }
    }
}

/// Check that dates strictly increase through the series
pub fn is_ascending(prices: &[PricePoint]) -> bool {
    prices.windows(2).all(|w| w[0].date < w[1].date)
}
