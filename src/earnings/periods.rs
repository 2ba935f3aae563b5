//! Carve a daily price series into consecutive ESPP purchase periods

use crate::error::Result;
use crate::market::PricePoint;
use crate::plan::periods_per_year;
use chrono::{Months, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

/// A trading day chosen as a period boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryPoint {
    /// Date the schedule asked for (may fall on a non-trading day)
    pub scheduled_date: NaiveDate,
    /// Trading day that satisfied it
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
}

impl BoundaryPoint {
    fn new(scheduled_date: NaiveDate, day: &PricePoint) -> Self {
        Self {
            scheduled_date,
            date: day.date,
            open: day.open,
            close: day.close,
        }
    }

    pub fn price(&self) -> PricePoint {
        PricePoint::new(self.date, self.open, self.close)
    }
}

/// Start and end price points of one purchase period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodBoundary {
    pub period_start: BoundaryPoint,
    pub period_end: BoundaryPoint,
}

/// Partition `prices` into one year of purchase periods starting at `period_start_date`
///
/// Each scheduled date resolves to the first trading day on or after it, and
/// consecutive points are paired so that every period ends where the next one
/// starts. A series too short for a full year yields fewer periods (possibly
/// none); callers compare the length against the expected period count.
pub fn segment_periods(
    prices: &[PricePoint],
    period_start_date: NaiveDate,
    period_cadence_in_months: u32,
) -> Result<Vec<PeriodBoundary>> {
    let number_of_periods = periods_per_year(period_cadence_in_months)? as usize;
    let points_needed = number_of_periods + 1;

    let mut points: Vec<BoundaryPoint> = Vec::with_capacity(points_needed);
    let mut cursor = Some(period_start_date);

    for day in prices {
        let Some(scheduled) = cursor else { break };
        if points.len() == points_needed {
            break;
        }

        if day.date >= scheduled {
            points.push(BoundaryPoint::new(scheduled, day));
            // Step from the previous scheduled date: Jan 31 -> Feb 28 -> Mar 28
            cursor = scheduled.checked_add_months(Months::new(period_cadence_in_months));
        }
    }

    let boundaries: Vec<PeriodBoundary> = points
        .windows(2)
        .map(|pair| PeriodBoundary {
            period_start: pair[0],
            period_end: pair[1],
        })
        .collect();

    debug!(
        "segmented {} trading days into {}/{} periods from {}",
        prices.len(),
        boundaries.len(),
        number_of_periods,
        period_start_date
    );

    Ok(boundaries)
}
