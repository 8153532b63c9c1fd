use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::time_value::{
    checked_product, checked_total, default_day_count, discount_factor, resolve_curve,
    validate_day_count, RateCurve,
};
use crate::types::{with_metadata, ComputationOutput, DayCount, Money, PeriodRecord};
use crate::DdmResult;

/// Input for a present value table over a fixed cash-flow stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PvTableInput {
    /// Cash flows indexed by period, starting at period 0
    pub cash_flows: Vec<Money>,
    /// Discount rate: flat, per period, or an interpolated `(start, end)` pair
    pub discount_curve: RateCurve,
    /// Length of one period in years
    #[serde(default = "default_day_count")]
    pub day_count: DayCount,
    /// Treat a two-element `discount_curve` as interpolation endpoints
    #[serde(default)]
    pub interpolate_discount_curve: bool,
}

/// Output of the present value table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PvTableOutput {
    pub periods: Vec<PeriodRecord>,
    /// Sum of the present value column (NPV of the stream)
    pub total_present_value: Money,
    /// Sum of the undiscounted cash flows
    pub total_cash_flow: Money,
}

/// Build one record per cash flow, discounting each at its period's rate.
///
/// The record at index `t` has `period = t`, so an empty stream yields an
/// empty table.
pub fn present_value_table(
    cash_flows: &[Money],
    discount_curve: &RateCurve,
    day_count: DayCount,
    interpolate: bool,
) -> DdmResult<Vec<PeriodRecord>> {
    validate_day_count(day_count)?;
    let rates = resolve_curve(discount_curve, cash_flows.len(), interpolate, "discount_curve")?;

    let mut periods = Vec::with_capacity(cash_flows.len());
    for (t, (cash_flow, rate)) in cash_flows.iter().zip(rates).enumerate() {
        let period = t as u32;
        let df = discount_factor(rate, period, day_count)?;
        let present_value = checked_product(*cash_flow, df, "present value")?;
        periods.push(PeriodRecord {
            period,
            cash_flow: *cash_flow,
            discount_rate: rate,
            discount_factor: df,
            present_value,
        });
    }

    debug!("built present value table with {} periods", periods.len());
    Ok(periods)
}

/// Calculate the present value table and its totals.
pub fn calculate_pv_table(input: &PvTableInput) -> DdmResult<ComputationOutput<PvTableOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let periods = present_value_table(
        &input.cash_flows,
        &input.discount_curve,
        input.day_count,
        input.interpolate_discount_curve,
    )?;

    if periods.is_empty() {
        warnings.push("No cash flows supplied; table is empty".into());
    }
    if let Some(max_rate) = periods.iter().map(|p| p.discount_rate).max() {
        if max_rate > dec!(0.50) {
            warnings.push(format!(
                "Discount rate of {max_rate} exceeds 50%; verify the curve is in decimal form"
            ));
        }
    }
    if periods.iter().any(|p| p.discount_rate < Decimal::ZERO) {
        warnings.push("Negative discount rates present; discount factors exceed 1".into());
    }

    let total_present_value = checked_total(
        periods.iter().map(|p| p.present_value),
        "total present value",
    )?;
    let total_cash_flow = checked_total(periods.iter().map(|p| p.cash_flow), "total cash flow")?;

    let output = PvTableOutput {
        periods,
        total_present_value,
        total_cash_flow,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Period-by-period discounting: PV = CF / (1 + r)^(t × day_count)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValuationError;

    fn approx_eq(a: Decimal, b: Decimal, eps: Decimal) -> bool {
        (a - b).abs() < eps
    }

    fn bond_like_flows() -> Vec<Money> {
        let mut flows = vec![dec!(-100)];
        flows.extend(std::iter::repeat(dec!(3)).take(11));
        flows.push(dec!(103));
        flows
    }

    #[test]
    fn test_zero_rate_pv_equals_cash_flow() {
        let flows = vec![dec!(-50), dec!(10), dec!(20), dec!(30)];
        let table =
            present_value_table(&flows, &RateCurve::flat(Decimal::ZERO), Decimal::ONE, false)
                .unwrap();
        for (record, cf) in table.iter().zip(&flows) {
            assert_eq!(record.present_value, *cf);
            assert_eq!(record.discount_factor, Decimal::ONE);
        }
    }

    #[test]
    fn test_periods_are_sequential() {
        let table = present_value_table(
            &bond_like_flows(),
            &RateCurve::flat(dec!(0.04)),
            Decimal::ONE,
            false,
        )
        .unwrap();
        assert_eq!(table.len(), 13);
        for (t, record) in table.iter().enumerate() {
            assert_eq!(record.period, t as u32);
        }
    }

    #[test]
    fn test_flat_rate_discounting() {
        let flows = vec![dec!(0), dec!(110), dec!(121)];
        let table =
            present_value_table(&flows, &RateCurve::flat(dec!(0.10)), Decimal::ONE, false).unwrap();
        assert!(approx_eq(table[1].present_value, dec!(100), dec!(0.000001)));
        assert!(approx_eq(table[2].present_value, dec!(100), dec!(0.000001)));
    }

    #[test]
    fn test_interpolated_curve_table() {
        let curve = RateCurve::Explicit(vec![dec!(0.03), dec!(0.05)]);
        let table = present_value_table(&bond_like_flows(), &curve, Decimal::ONE, true).unwrap();
        assert_eq!(table[0].discount_rate, dec!(0.03));
        assert_eq!(table[12].discount_rate, dec!(0.05));
        // Period 0 is never discounted
        assert_eq!(table[0].present_value, dec!(-100));
        assert!(table.windows(2).all(|w| w[1].discount_rate > w[0].discount_rate));
    }

    #[test]
    fn test_semi_annual_day_count() {
        let flows = vec![dec!(0), dec!(100)];
        let table =
            present_value_table(&flows, &RateCurve::flat(dec!(0.21)), dec!(0.5), false).unwrap();
        // 100 / 1.21^0.5 = 100 / 1.1
        assert!(approx_eq(table[1].present_value, dec!(90.909090909), dec!(0.00001)));
    }

    #[test]
    fn test_explicit_curve_shape_error() {
        let flows = vec![dec!(1), dec!(2), dec!(3)];
        let curve = RateCurve::Explicit(vec![dec!(0.05), dec!(0.05)]);
        let err = present_value_table(&flows, &curve, Decimal::ONE, false).unwrap_err();
        assert!(matches!(err, ValuationError::Shape { .. }));
    }

    #[test]
    fn test_overflowing_present_value_is_domain_error() {
        // A -50% rate compounds the discount factor to 2^10 by the last period
        let mut flows = vec![Decimal::ZERO; 10];
        flows.push(dec!(100000000000000000000000000));
        let err = present_value_table(&flows, &RateCurve::flat(dec!(-0.5)), Decimal::ONE, false)
            .unwrap_err();
        assert!(matches!(err, ValuationError::Domain(_)));
    }

    #[test]
    fn test_overflowing_total_is_domain_error() {
        let input = PvTableInput {
            cash_flows: vec![Decimal::MAX, Decimal::MAX],
            discount_curve: RateCurve::flat(Decimal::ZERO),
            day_count: Decimal::ONE,
            interpolate_discount_curve: false,
        };
        assert!(matches!(
            calculate_pv_table(&input),
            Err(ValuationError::Domain(_))
        ));
    }

    #[test]
    fn test_long_horizon_table() {
        let flows = vec![Decimal::ONE; 1500];
        let table =
            present_value_table(&flows, &RateCurve::flat(dec!(0.05)), Decimal::ONE, false).unwrap();
        assert_eq!(table.len(), 1500);
        assert!(table[1499].present_value < dec!(0.00000000000000000001));
        assert!(table.iter().all(|p| p.discount_factor >= Decimal::ZERO));
    }

    #[test]
    fn test_empty_cash_flows() {
        let table =
            present_value_table(&[], &RateCurve::flat(dec!(0.05)), Decimal::ONE, false).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_calculate_totals_and_envelope() {
        let input = PvTableInput {
            cash_flows: vec![dec!(-1000), dec!(300), dec!(400), dec!(500)],
            discount_curve: RateCurve::flat(dec!(0.10)),
            day_count: Decimal::ONE,
            interpolate_discount_curve: false,
        };
        let out = calculate_pv_table(&input).unwrap();
        // -1000 + 300/1.1 + 400/1.21 + 500/1.331 = -21.04
        assert!(approx_eq(out.result.total_present_value, dec!(-21.04), dec!(0.01)));
        assert_eq!(out.result.total_cash_flow, dec!(200));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_high_rate_warning() {
        let input = PvTableInput {
            cash_flows: vec![dec!(100), dec!(100)],
            discount_curve: RateCurve::flat(dec!(0.75)),
            day_count: Decimal::ONE,
            interpolate_discount_curve: false,
        };
        let out = calculate_pv_table(&input).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("exceeds 50%")));
    }

    #[test]
    fn test_input_defaults_from_json() {
        let input: PvTableInput =
            serde_json::from_str(r#"{"cash_flows": [-100, 60, 60], "discount_curve": 0.05}"#)
                .unwrap();
        assert_eq!(input.day_count, Decimal::ONE);
        assert!(!input.interpolate_discount_curve);
    }
}
