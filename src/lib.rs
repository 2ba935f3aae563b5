//! ESPP Calculator - earnings engine for Employee Stock Purchase Plans
//!
//! This library provides:
//! - Segmentation of a daily price series into purchase periods
//! - Per-period purchase, sale, and gain-sharing arithmetic under the annual cap
//! - Price feed loaders (CSV and JSON chart exports)
//! - Batch scenario evaluation and an observable store for front-end state

pub mod market;
pub mod plan;
pub mod earnings;
pub mod scenario;
pub mod store;
pub mod error;

// Re-export commonly used types
pub use market::PricePoint;
pub use plan::{PlanParameters, PlanParametersPatch, ANNUAL_CAP};
pub use earnings::{calculate_espp_earnings, EarningsCalculator, EarningsResult, PeriodEarnings};
pub use scenario::ScenarioRunner;
pub use error::{EsppError, Result};
