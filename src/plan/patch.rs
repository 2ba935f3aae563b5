//! Partial plan updates, as produced field by field by an input form

use super::params::PlanParameters;
use crate::store::Merge;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Any subset of plan fields; `None` leaves the current value alone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanParametersPatch {
    pub period_start_date: Option<NaiveDate>,
    pub period_cadence_in_months: Option<u32>,
    pub income: Option<f64>,
    pub contribution_percentage: Option<f64>,
    pub discount: Option<f64>,
    pub lookback: Option<bool>,
}

impl Merge for PlanParameters {
    type Patch = PlanParametersPatch;

    fn merge(&mut self, patch: PlanParametersPatch) {
        if let Some(date) = patch.period_start_date {
            self.period_start_date = date;
        }
        if let Some(cadence) = patch.period_cadence_in_months {
            self.period_cadence_in_months = cadence;
        }
        if let Some(income) = patch.income {
            self.income = income;
        }
        if let Some(pct) = patch.contribution_percentage {
            self.contribution_percentage = pct;
        }
        if let Some(discount) = patch.discount {
            self.discount = discount;
        }
        if let Some(lookback) = patch.lookback {
            self.lookback = lookback;
        }
    }
}
