//! ESPP plan configuration and its numeric-safety validation

use crate::error::{EsppError, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

pub const MONTHS_IN_YEAR: u32 = 12;

/// Annual ceiling on share purchases valued at period-start price
pub const ANNUAL_CAP: f64 = 25_000.0;

/// Fraction of each period's gain kept by the facilitating party
pub const GAIN_SHARE: f64 = 0.5;

/// Purchase cadences a plan may use
pub const SUPPORTED_CADENCES: [u32; 4] = [1, 3, 6, 12];

/// Number of purchase periods in a year for a cadence
///
/// Fails with `Configuration` when the cadence does not partition a year.
pub fn periods_per_year(period_cadence_in_months: u32) -> Result<u32> {
    if period_cadence_in_months == 0 || MONTHS_IN_YEAR % period_cadence_in_months != 0 {
        return Err(EsppError::Configuration(format!(
            "period cadence of {} months does not evenly divide {}",
            period_cadence_in_months, MONTHS_IN_YEAR
        )));
    }
    Ok(MONTHS_IN_YEAR / period_cadence_in_months)
}

/// Employee and plan inputs to an earnings calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanParameters {
    /// Date anchoring the first period boundary
    pub period_start_date: NaiveDate,

    /// Months between purchases, one of 1, 3, 6, 12
    pub period_cadence_in_months: u32,

    /// Annual income
    pub income: f64,

    /// Fraction of income withheld, in [0, 1]
    pub contribution_percentage: f64,

    /// Purchase discount off market price, in [0, 1)
    pub discount: f64,

    /// Price the purchase off the lower of period-start and period-end close
    pub lookback: bool,
}

impl Default for PlanParameters {
    fn default() -> Self {
        Self {
            period_start_date: Local::now().date_naive(),
            period_cadence_in_months: 6,
            income: 60_000.0,
            contribution_percentage: 0.10,
            discount: 0.15,
            lookback: true,
        }
    }
}

impl PlanParameters {
    pub fn periods_per_year(&self) -> Result<u32> {
        periods_per_year(self.period_cadence_in_months)
    }

    /// Flat amount withheld each period, before any cap effect
    pub fn contribution_per_period(&self) -> Result<f64> {
        Ok(self.income * self.contribution_percentage / self.periods_per_year()? as f64)
    }

    /// Reject anything that would make the arithmetic undefined
    pub fn validate(&self) -> Result<()> {
        self.periods_per_year()?;

        if !SUPPORTED_CADENCES.contains(&self.period_cadence_in_months) {
            return Err(EsppError::InvalidParameter(format!(
                "period cadence of {} months is not supported (expected one of {:?})",
                self.period_cadence_in_months, SUPPORTED_CADENCES
            )));
        }

        if !self.discount.is_finite() || self.discount < 0.0 || self.discount >= 1.0 {
            return Err(EsppError::InvalidParameter(format!(
                "discount must be in [0, 1), got {}",
                self.discount
            )));
        }

        if !self.income.is_finite() || self.income <= 0.0 {
            return Err(EsppError::InvalidParameter(format!(
                "income must be positive, got {}",
                self.income
            )));
        }

        if !self.contribution_percentage.is_finite()
            || !(0.0..=1.0).contains(&self.contribution_percentage)
        {
            return Err(EsppError::InvalidParameter(format!(
                "contribution percentage must be in [0, 1], got {}",
                self.contribution_percentage
            )));
        }

        Ok(())
    }
}
