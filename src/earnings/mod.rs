//! ESPP earnings engine: period segmentation and per-period calculation

mod periods;
mod records;
mod calculator;

pub use periods::{segment_periods, BoundaryPoint, PeriodBoundary};
pub use records::{EarningsResult, EarningsSummary, PeriodEarnings};
pub use calculator::{calculate_espp_earnings, EarningsCalculator};
