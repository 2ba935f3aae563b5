//! Per-period ESPP earnings under the annual purchase cap and gain-sharing split

use super::periods::{segment_periods, PeriodBoundary};
use super::records::{EarningsResult, PeriodEarnings};
use crate::error::{EsppError, Result};
use crate::market::{is_ascending, PricePoint};
use crate::plan::{PlanParameters, ANNUAL_CAP, GAIN_SHARE};
use log::{debug, warn};

/// Earnings calculator for one set of plan parameters
#[derive(Debug, Clone)]
pub struct EarningsCalculator {
    params: PlanParameters,
    periods_per_year: u32,
    contribution_per_period: f64,
}

impl EarningsCalculator {
    /// Validate parameters up front; no arithmetic runs on a rejected plan
    pub fn new(params: PlanParameters) -> Result<Self> {
        params.validate()?;
        let periods_per_year = params.periods_per_year()?;
        let contribution_per_period = params.contribution_per_period()?;

        Ok(Self {
            params,
            periods_per_year,
            contribution_per_period,
        })
    }

    pub fn params(&self) -> &PlanParameters {
        &self.params
    }

    /// Segment the series and compute every period
    pub fn run(&self, prices: &[PricePoint]) -> Result<EarningsResult> {
        if !is_ascending(prices) {
            return Err(EsppError::InvalidParameter(
                "price series must be strictly ascending by date".to_string(),
            ));
        }

        let boundaries = segment_periods(
            prices,
            self.params.period_start_date,
            self.params.period_cadence_in_months,
        )?;
        let periods = self.calculate(&boundaries)?;

        if periods.len() < self.periods_per_year as usize {
            warn!(
                "insufficient price history: {} of {} periods from {}",
                periods.len(),
                self.periods_per_year,
                self.params.period_start_date
            );
        }

        Ok(EarningsResult::new(self.periods_per_year, periods))
    }

    /// Fold over the periods, threading cumulative cap usage from one to the next
    pub fn calculate(&self, boundaries: &[PeriodBoundary]) -> Result<Vec<PeriodEarnings>> {
        for boundary in boundaries {
            check_price(boundary.period_start.close, "period start")?;
            check_price(boundary.period_end.close, "period end")?;
        }

        let mut cap_used = 0.0;
        let mut rows = Vec::with_capacity(boundaries.len());

        for (idx, boundary) in boundaries.iter().enumerate() {
            let row = self.calculate_period(idx as u32 + 1, boundary, cap_used);
            cap_used = row.total_irs_contributions;
            rows.push(row);
        }

        debug!(
            "calculated {} periods, cap used {:.2} of {:.2}",
            rows.len(),
            cap_used,
            ANNUAL_CAP
        );

        Ok(rows)
    }

    /// One period, given cap usage accumulated before it
    fn calculate_period(&self, period: u32, boundary: &PeriodBoundary, cap_used: f64) -> PeriodEarnings {
        let start_close = boundary.period_start.close;
        let end_close = boundary.period_end.close;
        let contribution = self.contribution_per_period;

        let buy_price_of_stock = if self.params.lookback {
            start_close.min(end_close)
        } else {
            end_close
        };
        let discounted_purchase_price = buy_price_of_stock * (1.0 - self.params.discount);

        // The cap is valued at period-start price, not purchase price
        let max_by_cap = ((ANNUAL_CAP - cap_used).max(0.0) / start_close).floor();
        let max_by_contribution = (contribution / discounted_purchase_price).floor();
        let stock_bought = max_by_cap.min(max_by_contribution) as u64;
        let shares = stock_bought as f64;

        let money_used_to_buy_stock = shares * discounted_purchase_price;
        let unused_money = contribution - money_used_to_buy_stock;

        // Shares are sold at the first opportunity, at period-end close
        let total_sale_price = shares * end_close;
        let gain = total_sale_price - money_used_to_buy_stock;

        let amount_to_pay_back = contribution + GAIN_SHARE * gain;
        let cash_in_bank_after_sale = total_sale_price + unused_money;

        PeriodEarnings {
            period,
            period_start: boundary.period_start,
            period_end: boundary.period_end,
            contribution_this_period: contribution,
            buy_price_of_stock,
            discounted_purchase_price,
            stock_bought,
            money_used_to_buy_stock,
            unused_money,
            price_of_stock: end_close,
            total_sale_price,
            gain,
            amount_to_pay_back,
            cash_in_bank_after_sale,
            money_made_by_client: cash_in_bank_after_sale - amount_to_pay_back,
            money_made_by_cake: amount_to_pay_back - contribution,
            total_irs_contributions: cap_used + shares * start_close,
        }
    }

    /// Back-of-envelope yearly profit: `I * P * (discount + lookback discount) / 2` per period
    ///
    /// The lookback discount of a period is the rise from the period-start close,
    /// as a fraction of that close (zero when it fell, or without lookback).
    pub fn rough_estimate(&self, boundaries: &[PeriodBoundary]) -> f64 {
        boundaries
            .iter()
            .map(|b| {
                let lookback_discount = if self.params.lookback && b.period_start.close > 0.0 {
                    ((b.period_end.close - b.period_start.close) / b.period_start.close).max(0.0)
                } else {
                    0.0
                };
                self.contribution_per_period * (self.params.discount + lookback_discount) * GAIN_SHARE
            })
            .sum()
    }
}

fn check_price(close: f64, which: &str) -> Result<()> {
    if !close.is_finite() || close <= 0.0 {
        return Err(EsppError::InvalidParameter(format!(
            "{} close must be positive, got {}",
            which, close
        )));
    }
    Ok(())
}

/// Compute ESPP earnings for a price series and plan in one call
pub fn calculate_espp_earnings(prices: &[PricePoint], params: &PlanParameters) -> Result<EarningsResult> {
    EarningsCalculator::new(params.clone())?.run(prices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::earnings::periods::BoundaryPoint;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use chrono::{Duration, NaiveDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn point(d: NaiveDate, close: f64) -> BoundaryPoint {
        BoundaryPoint {
            scheduled_date: d,
            date: d,
            open: close,
            close,
        }
    }

    fn boundary(start_close: f64, end_close: f64) -> PeriodBoundary {
        PeriodBoundary {
            period_start: point(date(2017, 1, 3), start_close),
            period_end: point(date(2018, 1, 3), end_close),
        }
    }

    fn annual_plan() -> PlanParameters {
        PlanParameters {
            period_start_date: date(2017, 1, 3),
            period_cadence_in_months: 12,
            income: 60_000.0,
            contribution_percentage: 0.15,
            discount: 0.15,
            lookback: true,
        }
    }

    /// Calendar-day series whose close follows `f(day_index)`
    fn series(start: NaiveDate, days: i64, f: impl Fn(i64) -> f64) -> Vec<PricePoint> {
        (0..days)
            .map(|i| PricePoint::new(start + Duration::days(i), f(i), f(i)))
            .collect()
    }

    #[test]
    fn test_single_period_worked_example() {
        let calc = EarningsCalculator::new(annual_plan()).unwrap();
        let rows = calc.calculate(&[boundary(100.0, 110.0)]).unwrap();
        let row = &rows[0];

        assert_eq!(row.period, 1);
        assert_relative_eq!(row.contribution_this_period, 9000.0);
        assert_relative_eq!(row.buy_price_of_stock, 100.0);
        assert_relative_eq!(row.discounted_purchase_price, 85.0);
        assert_eq!(row.stock_bought, 105);
        assert_relative_eq!(row.money_used_to_buy_stock, 8925.0);
        assert_relative_eq!(row.unused_money, 75.0);
        assert_relative_eq!(row.price_of_stock, 110.0);
        assert_relative_eq!(row.total_sale_price, 11550.0);
        assert_relative_eq!(row.gain, 2625.0);
        assert_relative_eq!(row.amount_to_pay_back, 10312.5);
        assert_relative_eq!(row.cash_in_bank_after_sale, 11625.0);
        assert_relative_eq!(row.money_made_by_cake, 1312.5);
        assert_relative_eq!(row.money_made_by_client, 1312.5);
        assert_relative_eq!(row.total_irs_contributions, 10500.0);
    }

    #[test]
    fn test_without_lookback_buys_at_period_end() {
        let plan = PlanParameters { lookback: false, ..annual_plan() };
        let calc = EarningsCalculator::new(plan).unwrap();
        let row = &calc.calculate(&[boundary(100.0, 110.0)]).unwrap()[0];

        assert_relative_eq!(row.buy_price_of_stock, 110.0);
        assert_relative_eq!(row.discounted_purchase_price, 93.5);
        assert_eq!(row.stock_bought, 96);
    }

    #[test]
    fn test_lookback_uses_lower_end_price() {
        let calc = EarningsCalculator::new(annual_plan()).unwrap();
        let row = &calc.calculate(&[boundary(120.0, 100.0)]).unwrap()[0];

        assert_relative_eq!(row.buy_price_of_stock, 100.0);
        assert_relative_eq!(row.price_of_stock, 100.0);
    }

    #[test]
    fn test_cap_binds_single_period() {
        let plan = PlanParameters { income: 200_000.0, ..annual_plan() };
        let calc = EarningsCalculator::new(plan).unwrap();
        let row = &calc.calculate(&[boundary(100.0, 100.0)]).unwrap()[0];

        // 30000 / 85 would buy 352 shares, the cap allows 25000 / 100 = 250
        assert_eq!(row.stock_bought, 250);
        assert_relative_eq!(row.money_used_to_buy_stock, 21250.0);
        assert_relative_eq!(row.unused_money, 8750.0);
        assert_relative_eq!(row.total_irs_contributions, 25000.0);
    }

    #[test]
    fn test_cap_carries_across_periods() {
        let plan = PlanParameters {
            period_cadence_in_months: 6,
            income: 300_000.0,
            discount: 0.0,
            ..annual_plan()
        };
        let calc = EarningsCalculator::new(plan).unwrap();
        let rows = calc
            .calculate(&[boundary(100.0, 100.0), boundary(100.0, 100.0)])
            .unwrap();

        assert_eq!(rows[0].stock_bought, 225);
        assert_relative_eq!(rows[0].total_irs_contributions, 22500.0);
        assert_eq!(rows[1].stock_bought, 25);
        assert_relative_eq!(rows[1].total_irs_contributions, 25000.0);
    }

    #[test]
    fn test_exhausted_cap_buys_nothing() {
        let plan = PlanParameters {
            period_cadence_in_months: 6,
            income: 400_000.0,
            ..annual_plan()
        };
        let calc = EarningsCalculator::new(plan).unwrap();
        let rows = calc
            .calculate(&[boundary(50.0, 60.0), boundary(60.0, 70.0)])
            .unwrap();

        assert_eq!(rows[0].stock_bought, 500);
        assert_eq!(rows[1].stock_bought, 0);
        assert_relative_eq!(rows[1].unused_money, 30000.0);
        assert_relative_eq!(rows[1].gain, 0.0);
        assert_relative_eq!(rows[1].money_made_by_client, 0.0);
    }

    #[test]
    fn test_profit_split_is_exact() {
        let plan = PlanParameters {
            period_cadence_in_months: 1,
            income: 83_417.0,
            contribution_percentage: 0.13,
            discount: 0.1,
            period_start_date: date(2015, 1, 1),
            ..annual_plan()
        };
        let prices = series(date(2015, 1, 1), 600, |i| 40.0 + 15.0 * ((i as f64) / 17.0).sin());
        let result = calculate_espp_earnings(&prices, &plan).unwrap();

        assert_eq!(result.periods.len(), 12);
        for row in &result.periods {
            assert_abs_diff_eq!(row.money_made_by_client + row.money_made_by_cake, row.gain, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_cap_usage_monotonic_and_bounded() {
        let plan = PlanParameters {
            period_cadence_in_months: 1,
            income: 250_000.0,
            period_start_date: date(2015, 1, 1),
            ..annual_plan()
        };
        let prices = series(date(2015, 1, 1), 600, |i| 20.0 + 0.05 * i as f64);
        let result = calculate_espp_earnings(&prices, &plan).unwrap();

        let mut previous = 0.0;
        for row in &result.periods {
            assert!(row.total_irs_contributions >= previous);
            assert!(row.total_irs_contributions <= ANNUAL_CAP + 1e-9);
            let by_contribution = (row.contribution_this_period / row.discounted_purchase_price).floor() as u64;
            assert!(row.stock_bought <= by_contribution);
            previous = row.total_irs_contributions;
        }
        assert!(result.periods.last().unwrap().stock_bought < result.periods[0].stock_bought);
    }

    #[test]
    fn test_runs_are_identical() {
        let plan = PlanParameters {
            period_start_date: date(2015, 1, 1),
            period_cadence_in_months: 3,
            ..annual_plan()
        };
        let prices = series(date(2015, 1, 1), 500, |i| 30.0 + (i % 37) as f64);

        let first = calculate_espp_earnings(&prices, &plan).unwrap();
        let second = calculate_espp_earnings(&prices, &plan).unwrap();
        assert_eq!(first.periods.len(), 4);
        assert_eq!(first.periods, second.periods);
    }

    #[test]
    fn test_full_and_short_history() {
        let plan = PlanParameters {
            period_start_date: date(2015, 1, 1),
            period_cadence_in_months: 1,
            ..annual_plan()
        };

        let full = calculate_espp_earnings(&series(date(2015, 1, 1), 400, |_| 10.0), &plan).unwrap();
        assert_eq!(full.periods.len(), 12);
        assert!(full.is_complete());

        let short = calculate_espp_earnings(&series(date(2015, 1, 1), 100, |_| 10.0), &plan).unwrap();
        assert_eq!(short.expected_periods, 12);
        assert_eq!(short.periods.len(), 3);
        assert!(!short.is_complete());

        let none = calculate_espp_earnings(&[], &plan).unwrap();
        assert!(none.periods.is_empty());
        assert_eq!(none.total_earned(), 0.0);
    }

    #[test]
    fn test_annual_cadence_one_record() {
        let prices = series(date(2017, 1, 1), 800, |i| 100.0 + 0.01 * i as f64);
        let result = calculate_espp_earnings(&prices, &annual_plan()).unwrap();
        assert_eq!(result.expected_periods, 1);
        assert_eq!(result.periods.len(), 1);
    }

    #[test]
    fn test_rejects_full_discount() {
        let plan = PlanParameters { discount: 1.0, ..annual_plan() };
        let err = EarningsCalculator::new(plan).unwrap_err();
        assert!(matches!(err, EsppError::InvalidParameter(_)));
    }

    #[test]
    fn test_rejects_cadence_not_dividing_year() {
        let plan = PlanParameters { period_cadence_in_months: 5, ..annual_plan() };
        let err = calculate_espp_earnings(&[], &plan).unwrap_err();
        assert!(matches!(err, EsppError::Configuration(_)));
    }

    #[test]
    fn test_rejects_non_positive_prices_before_computing() {
        let calc = EarningsCalculator::new(annual_plan()).unwrap();

        let err = calc.calculate(&[boundary(100.0, 110.0), boundary(0.0, 110.0)]).unwrap_err();
        assert!(matches!(err, EsppError::InvalidParameter(_)));

        let err = calc.calculate(&[boundary(100.0, -1.0)]).unwrap_err();
        assert!(matches!(err, EsppError::InvalidParameter(_)));

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = calc.calculate(&[boundary(bad, 110.0)]).unwrap_err();
            assert!(matches!(err, EsppError::InvalidParameter(_)));
            let err = calc.calculate(&[boundary(100.0, bad)]).unwrap_err();
            assert!(matches!(err, EsppError::InvalidParameter(_)));
        }
    }

    #[test]
    fn test_rejects_unordered_series() {
        let mut prices = series(date(2017, 1, 1), 400, |_| 50.0);
        prices.swap(10, 11);
        let err = calculate_espp_earnings(&prices, &annual_plan()).unwrap_err();
        assert!(matches!(err, EsppError::InvalidParameter(_)));

        let mut prices = series(date(2017, 1, 1), 400, |_| 50.0);
        prices[11].date = prices[10].date;
        let err = calculate_espp_earnings(&prices, &annual_plan()).unwrap_err();
        assert!(matches!(err, EsppError::InvalidParameter(_)));
    }

    #[test]
    fn test_zero_contribution() {
        let plan = PlanParameters { contribution_percentage: 0.0, ..annual_plan() };
        let calc = EarningsCalculator::new(plan).unwrap();
        let row = &calc.calculate(&[boundary(100.0, 110.0)]).unwrap()[0];

        assert_eq!(row.stock_bought, 0);
        assert_relative_eq!(row.money_made_by_client, 0.0);
    }

    #[test]
    fn test_summary_totals() {
        let plan = PlanParameters { period_cadence_in_months: 6, ..annual_plan() };
        let calc = EarningsCalculator::new(plan).unwrap();
        let rows = calc
            .calculate(&[boundary(100.0, 110.0), boundary(110.0, 99.0)])
            .unwrap();
        let result = EarningsResult::new(2, rows);
        let summary = result.summary();

        assert_eq!(summary.periods, 2);
        assert_relative_eq!(summary.total_contributions, 9000.0);
        assert_eq!(summary.total_shares, result.periods[0].stock_bought + result.periods[1].stock_bought);
        assert_relative_eq!(
            summary.total_money_made_by_client,
            result.periods[0].money_made_by_client + result.periods[1].money_made_by_client
        );
        assert_relative_eq!(summary.cap_used, result.periods[1].total_irs_contributions);
    }

    #[test]
    fn test_rough_estimate() {
        let calc = EarningsCalculator::new(annual_plan()).unwrap();
        // Price rose 10%: 9000 * (0.15 + 0.1) / 2
        assert_relative_eq!(calc.rough_estimate(&[boundary(100.0, 110.0)]), 1125.0, epsilon = 1e-9);
        // Price fell: no lookback boost
        assert_relative_eq!(calc.rough_estimate(&[boundary(100.0, 90.0)]), 675.0, epsilon = 1e-9);
    }
}
