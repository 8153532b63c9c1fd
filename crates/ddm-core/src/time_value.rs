//! Discount rate curves and discount factors.
//!
//! A [`RateCurve`] is resolved into one rate per period, either by repeating a
//! flat rate, by taking an explicit per-period sequence, or by geometric
//! interpolation between two endpoint rates. Each rate is then converted into a
//! discount factor `1 / (1 + r)^(t × day_count)`.

use log::debug;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};

use crate::error::ValuationError;
use crate::types::{DayCount, Money, Rate};
use crate::DdmResult;

/// Rate assumption for a table of periods.
///
/// Deserialised untagged: a bare number is `Flat`, an array is `Explicit`,
/// and an object `{ "start": .., "end": .. }` is `Interpolated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RateCurve {
    /// One rate applied to every period.
    Flat(Rate),
    /// One rate per period; length must equal the period count.
    Explicit(Vec<Rate>),
    /// Geometrically interpolated from `start` (first period) to `end` (last period).
    Interpolated { start: Rate, end: Rate },
}

impl RateCurve {
    pub fn flat(rate: Rate) -> Self {
        RateCurve::Flat(rate)
    }

    pub fn interpolated(start: Rate, end: Rate) -> Self {
        RateCurve::Interpolated { start, end }
    }
}

impl From<Rate> for RateCurve {
    fn from(rate: Rate) -> Self {
        RateCurve::Flat(rate)
    }
}

impl From<Vec<Rate>> for RateCurve {
    fn from(rates: Vec<Rate>) -> Self {
        RateCurve::Explicit(rates)
    }
}

/// Build `n` per-period rates from a curve.
///
/// With `interpolate` set, the curve must supply a `(start, end)` pair, either
/// as `Interpolated` or as a two-element `Explicit` sequence. An `Interpolated`
/// curve is always interpolated.
pub fn build_rate_sequence(curve: &RateCurve, n: usize, interpolate: bool) -> DdmResult<Vec<Rate>> {
    resolve_curve(curve, n, interpolate, "rate_curve")
}

pub(crate) fn resolve_curve(
    curve: &RateCurve,
    n: usize,
    interpolate: bool,
    field: &str,
) -> DdmResult<Vec<Rate>> {
    match curve {
        RateCurve::Interpolated { start, end } => geometric_space(*start, *end, n),
        RateCurve::Explicit(rates) if interpolate => {
            if rates.len() != 2 {
                return Err(ValuationError::Shape {
                    field: field.into(),
                    expected: 2,
                    actual: rates.len(),
                });
            }
            geometric_space(rates[0], rates[1], n)
        }
        RateCurve::Flat(_) if interpolate => Err(ValuationError::Shape {
            field: field.into(),
            expected: 2,
            actual: 1,
        }),
        RateCurve::Flat(rate) => Ok(vec![*rate; n]),
        RateCurve::Explicit(rates) => {
            if rates.len() != n {
                return Err(ValuationError::Shape {
                    field: field.into(),
                    expected: n,
                    actual: rates.len(),
                });
            }
            Ok(rates.clone())
        }
    }
}

/// `n` values from `start` to `end` with a constant ratio between neighbours.
///
/// Both endpoints must be strictly positive. The first and last values are
/// exactly `start` and `end`.
pub fn geometric_space(start: Rate, end: Rate, n: usize) -> DdmResult<Vec<Rate>> {
    if start <= Decimal::ZERO || end <= Decimal::ZERO {
        return Err(ValuationError::Domain(format!(
            "geometric interpolation requires positive endpoints, got start={start}, end={end}"
        )));
    }

    match n {
        0 => return Ok(Vec::new()),
        1 => return Ok(vec![start]),
        _ => {}
    }

    let steps = Decimal::from(n as u64 - 1);
    let step = end
        .checked_div(start)
        .and_then(|ratio| ratio.checked_powd(Decimal::ONE / steps))
        .ok_or_else(|| {
            ValuationError::Domain(format!(
                "cannot interpolate between {start} and {end} over {n} periods"
            ))
        })?;

    let mut rates = Vec::with_capacity(n);
    let mut current = start;
    rates.push(current);
    for _ in 1..n - 1 {
        current *= step;
        rates.push(current);
    }
    rates.push(end);

    debug!("geometric curve {start} -> {end} over {n} periods, step ratio {step}");
    Ok(rates)
}

/// Discount factor `1 / (1 + rate)^(period × day_count)`.
///
/// Computed as `(1 / (1 + rate))^(period × day_count)`, so long horizons at
/// positive rates shrink toward zero rather than overflowing the compounding
/// factor.
pub fn discount_factor(rate: Rate, period: u32, day_count: DayCount) -> DdmResult<Decimal> {
    validate_day_count(day_count)?;

    let base = Decimal::ONE.checked_add(rate).ok_or_else(|| {
        ValuationError::Domain(format!("1 + rate overflows for rate {rate}"))
    })?;
    let exponent = checked_product(Decimal::from(period), day_count, "period × day_count")?;
    if exponent.is_zero() {
        return Ok(Decimal::ONE);
    }

    if base.is_zero() {
        return Err(ValuationError::Domain(format!(
            "discount factor undefined for rate {rate} at period {period}: compounding factor is zero"
        )));
    }
    let per_period = Decimal::ONE.checked_div(base).ok_or_else(|| {
        ValuationError::Domain(format!("discount factor undefined for rate {rate}"))
    })?;

    let factor = if exponent.fract().is_zero() {
        let whole = exponent.trunc().to_i64().ok_or_else(|| {
            ValuationError::Domain(format!("exponent {exponent} is out of range"))
        })?;
        per_period.checked_powi(whole)
    } else {
        if base < Decimal::ZERO {
            return Err(ValuationError::Domain(format!(
                "cannot raise non-positive base {base} to fractional power {exponent} (period {period})"
            )));
        }
        per_period.checked_powd(exponent)
    };

    factor.ok_or_else(|| {
        ValuationError::Domain(format!(
            "discount factor overflows for rate {rate} at period {period}"
        ))
    })
}

/// Present value of a single cash flow received at `period`.
pub fn present_value(
    cash_flow: Money,
    period: u32,
    day_count: DayCount,
    rate: Rate,
) -> DdmResult<Money> {
    let df = discount_factor(rate, period, day_count)?;
    checked_product(cash_flow, df, "present value")
}

/// `a × b`, or a `Domain` error naming `context` when the product overflows.
pub fn checked_product(a: Decimal, b: Decimal, context: &str) -> DdmResult<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| ValuationError::Domain(format!("{context} overflows: {a} × {b}")))
}

/// Sum of `values`, or a `Domain` error naming `context` when the total overflows.
pub fn checked_total<I>(values: I, context: &str) -> DdmResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v)
            .ok_or_else(|| ValuationError::Domain(format!("{context} overflows")))
    })
}

/// Annual periods unless configured otherwise.
pub fn default_day_count() -> DayCount {
    Decimal::ONE
}

pub(crate) fn validate_day_count(day_count: DayCount) -> DdmResult<()> {
    if day_count <= Decimal::ZERO {
        return Err(ValuationError::InvalidInput {
            field: "day_count".into(),
            reason: "Period length must be positive.".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn approx_eq(a: Decimal, b: Decimal, eps: Decimal) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_flat_curve_repeats_rate() {
        let rates = build_rate_sequence(&RateCurve::flat(dec!(0.05)), 6, false).unwrap();
        assert_eq!(rates.len(), 6);
        assert!(rates.iter().all(|r| *r == dec!(0.05)));
    }

    #[test]
    fn test_flat_curve_zero_periods() {
        let rates = build_rate_sequence(&RateCurve::flat(dec!(0.05)), 0, false).unwrap();
        assert!(rates.is_empty());
    }

    #[test]
    fn test_explicit_curve_passthrough() {
        let curve = RateCurve::Explicit(vec![dec!(0.03), dec!(0.04), dec!(0.05)]);
        let rates = build_rate_sequence(&curve, 3, false).unwrap();
        assert_eq!(rates, vec![dec!(0.03), dec!(0.04), dec!(0.05)]);
    }

    #[test]
    fn test_explicit_curve_length_mismatch() {
        let curve = RateCurve::Explicit(vec![dec!(0.03), dec!(0.04)]);
        let err = build_rate_sequence(&curve, 3, false).unwrap_err();
        assert!(matches!(
            err,
            ValuationError::Shape {
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_geometric_endpoints_exact() {
        let rates = geometric_space(dec!(0.03), dec!(0.05), 13).unwrap();
        assert_eq!(rates.len(), 13);
        assert_eq!(rates[0], dec!(0.03));
        assert_eq!(rates[12], dec!(0.05));
    }

    #[test]
    fn test_geometric_constant_ratio() {
        let rates = geometric_space(dec!(0.03), dec!(0.05), 13).unwrap();
        let first_ratio = rates[1] / rates[0];
        for pair in rates.windows(2) {
            let ratio = pair[1] / pair[0];
            assert!(
                approx_eq(ratio, first_ratio, dec!(0.00000001)),
                "ratio {ratio} drifted from {first_ratio}"
            );
        }
    }

    #[test]
    fn test_geometric_is_not_arithmetic() {
        let rates = geometric_space(dec!(0.01), dec!(0.04), 3).unwrap();
        // Geometric midpoint of 1% and 4% is 2%, arithmetic would be 2.5%
        assert!(approx_eq(rates[1], dec!(0.02), dec!(0.0000001)));
    }

    #[test]
    fn test_geometric_decreasing_curve() {
        let rates = geometric_space(dec!(0.08), dec!(0.02), 5).unwrap();
        assert!(rates.windows(2).all(|w| w[1] < w[0]));
        assert_eq!(rates[4], dec!(0.02));
    }

    #[test]
    fn test_geometric_single_and_empty() {
        assert_eq!(geometric_space(dec!(0.03), dec!(0.05), 1).unwrap(), vec![dec!(0.03)]);
        assert!(geometric_space(dec!(0.03), dec!(0.05), 0).unwrap().is_empty());
    }

    #[test]
    fn test_geometric_rejects_non_positive_endpoints() {
        assert!(matches!(
            geometric_space(dec!(0), dec!(0.05), 4),
            Err(ValuationError::Domain(_))
        ));
        assert!(matches!(
            geometric_space(dec!(0.03), dec!(-0.01), 4),
            Err(ValuationError::Domain(_))
        ));
    }

    #[test]
    fn test_interpolate_flag_uses_explicit_pair() {
        let curve = RateCurve::Explicit(vec![dec!(0.03), dec!(0.05)]);
        let rates = build_rate_sequence(&curve, 5, true).unwrap();
        assert_eq!(rates.len(), 5);
        assert_eq!(rates[0], dec!(0.03));
        assert_eq!(rates[4], dec!(0.05));
    }

    #[test]
    fn test_interpolate_flag_rejects_flat_curve() {
        let err = build_rate_sequence(&RateCurve::flat(dec!(0.05)), 5, true).unwrap_err();
        assert!(matches!(err, ValuationError::Shape { expected: 2, .. }));
    }

    #[test]
    fn test_interpolated_variant_ignores_flag() {
        let curve = RateCurve::interpolated(dec!(0.03), dec!(0.05));
        let with_flag = build_rate_sequence(&curve, 4, true).unwrap();
        let without_flag = build_rate_sequence(&curve, 4, false).unwrap();
        assert_eq!(with_flag, without_flag);
    }

    #[test]
    fn test_discount_factor_annual() {
        let df = discount_factor(dec!(0.10), 2, Decimal::ONE).unwrap();
        // 1 / 1.21
        assert!(approx_eq(df, dec!(0.826446281), dec!(0.0000001)));
    }

    #[test]
    fn test_discount_factor_period_zero() {
        assert_eq!(discount_factor(dec!(0.10), 0, Decimal::ONE).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_discount_factor_fractional_exponent() {
        let df = discount_factor(dec!(0.21), 1, dec!(0.5)).unwrap();
        // sqrt(1.21) = 1.1
        assert!(approx_eq(df, Decimal::ONE / dec!(1.1), dec!(0.0000001)));
    }

    #[test]
    fn test_discount_factor_negative_base_fractional_power() {
        let err = discount_factor(dec!(-1.5), 1, dec!(0.5)).unwrap_err();
        assert!(matches!(err, ValuationError::Domain(_)));
    }

    #[test]
    fn test_discount_factor_negative_base_integer_power() {
        // (1 - 1.5)^2 = 0.25, well defined
        let df = discount_factor(dec!(-1.5), 2, Decimal::ONE).unwrap();
        assert_eq!(df, dec!(4));
    }

    #[test]
    fn test_discount_factor_zero_base() {
        let err = discount_factor(dec!(-1), 3, Decimal::ONE).unwrap_err();
        assert!(matches!(err, ValuationError::Domain(_)));
    }

    #[test]
    fn test_discount_factor_long_horizon_shrinks_to_zero() {
        // (1.05)^1500 exceeds Decimal::MAX but its reciprocal is representable
        let df = discount_factor(dec!(0.05), 1500, Decimal::ONE).unwrap();
        assert!(df >= Decimal::ZERO);
        assert!(df < dec!(0.00000000000000000001));
    }

    #[test]
    fn test_discount_factor_negative_rate_overflow() {
        // 1 / (1 - 0.99) = 100 per period, 100^20 is out of range
        let err = discount_factor(dec!(-0.99), 20, Decimal::ONE).unwrap_err();
        assert!(matches!(err, ValuationError::Domain(_)));
    }

    #[test]
    fn test_zero_base_at_period_zero() {
        assert_eq!(discount_factor(dec!(-1), 0, Decimal::ONE).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_present_value_overflow_is_domain_error() {
        let err = present_value(Decimal::MAX, 1, Decimal::ONE, dec!(-0.5)).unwrap_err();
        assert!(matches!(err, ValuationError::Domain(_)));
    }

    #[test]
    fn test_checked_total_overflow() {
        assert_eq!(checked_total(vec![dec!(1), dec!(2)], "sum").unwrap(), dec!(3));
        assert!(matches!(
            checked_total(vec![Decimal::MAX, Decimal::MAX], "sum"),
            Err(ValuationError::Domain(_))
        ));
    }

    #[test]
    fn test_discount_factor_rejects_non_positive_day_count() {
        let err = discount_factor(dec!(0.05), 1, Decimal::ZERO).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidInput { .. }));
    }

    #[test]
    fn test_present_value_single_period() {
        let pv = present_value(dec!(110), 1, Decimal::ONE, dec!(0.10)).unwrap();
        assert!(approx_eq(pv, dec!(100), dec!(0.0000001)));
    }

    #[test]
    fn test_rate_curve_deserialises_untagged() {
        let flat: RateCurve = serde_json::from_str("0.05").unwrap();
        assert_eq!(flat, RateCurve::Flat(dec!(0.05)));

        let explicit: RateCurve = serde_json::from_str("[0.03, 0.04]").unwrap();
        assert_eq!(explicit, RateCurve::Explicit(vec![dec!(0.03), dec!(0.04)]));

        let interp: RateCurve = serde_json::from_str(r#"{"start": 0.03, "end": 0.05}"#).unwrap();
        assert_eq!(interp, RateCurve::interpolated(dec!(0.03), dec!(0.05)));
    }
}
