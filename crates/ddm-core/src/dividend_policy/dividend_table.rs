//! Projected dividend present value table.
//!
//! Dividends compound period by period from an initial dividend at a growth
//! rate that may vary over time, and each dividend is discounted at its own
//! period's rate. The last explicit period carries a single-stage Gordon
//! continuing value in place of the plain discounted dividend:
//!
//!   PV_T = D_T / (r_T - g_T) × DF_T
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`.

use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ValuationError;
use crate::time_value::{
    checked_product, checked_total, default_day_count, discount_factor, resolve_curve,
    validate_day_count, RateCurve,
};
use crate::types::{with_metadata, ComputationOutput, DayCount, DividendPeriodRecord, Money, Rate};
use crate::DdmResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// Input for the projected dividend table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DividendTableInput {
    /// Dividend at period 0 (D₀).
    pub initial_dividend: Money,
    /// Dividend growth for periods 1..=terminal_period.
    pub growth_curve: RateCurve,
    /// Discount rate for periods 0..=terminal_period.
    pub discount_curve: RateCurve,
    /// Last explicitly modelled period (T).
    pub terminal_period: u32,
    /// Length of one period in years.
    #[serde(default = "default_day_count")]
    pub day_count: DayCount,
    /// Treat a two-element `growth_curve` as interpolation endpoints.
    #[serde(default)]
    pub interpolate_growth_curve: bool,
    /// Treat a two-element `discount_curve` as interpolation endpoints.
    #[serde(default)]
    pub interpolate_discount_curve: bool,
}

/// Output of the projected dividend table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DividendTableOutput {
    /// One record per period, 0..=terminal_period.
    pub periods: Vec<DividendPeriodRecord>,
    /// Undiscounted continuing value at the terminal period: D_T / (r_T - g_T).
    pub terminal_value: Money,
    /// Continuing value discounted to period 0 (equals the last record's PV).
    pub pv_terminal_value: Money,
    /// Sum of discounted dividends before the terminal period.
    pub pv_explicit_dividends: Money,
    /// Sum of the present value column.
    pub total_present_value: Money,
    /// Discounted continuing value as a percentage of the total.
    pub terminal_pct: Decimal,
}

struct Projection {
    periods: Vec<DividendPeriodRecord>,
    terminal_value: Money,
    terminal_spread: Rate,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Project dividends over periods `0..=terminal_period` and discount them.
///
/// The last record's present value is the discounted Gordon continuing value.
pub fn dividend_pv_table(
    initial_dividend: Money,
    growth_curve: &RateCurve,
    discount_curve: &RateCurve,
    terminal_period: u32,
    day_count: DayCount,
    interpolate_growth: bool,
    interpolate_discount: bool,
) -> DdmResult<Vec<DividendPeriodRecord>> {
    let projection = project(
        initial_dividend,
        growth_curve,
        discount_curve,
        terminal_period,
        day_count,
        interpolate_growth,
        interpolate_discount,
    )?;
    Ok(projection.periods)
}

/// Calculate the dividend table with terminal value decomposition.
pub fn calculate_dividend_table(
    input: &DividendTableInput,
) -> DdmResult<ComputationOutput<DividendTableOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let projection = project(
        input.initial_dividend,
        &input.growth_curve,
        &input.discount_curve,
        input.terminal_period,
        input.day_count,
        input.interpolate_growth_curve,
        input.interpolate_discount_curve,
    )?;

    let periods = projection.periods;
    let pv_terminal_value = periods
        .last()
        .map(|p| p.present_value)
        .unwrap_or(Decimal::ZERO);
    let pv_explicit_dividends = checked_total(
        periods
            .iter()
            .filter(|p| !p.is_terminal)
            .map(|p| p.present_value),
        "explicit dividend present value",
    )?;
    let total_present_value = checked_total(
        [pv_explicit_dividends, pv_terminal_value],
        "total present value",
    )?;

    let terminal_pct = if total_present_value == Decimal::ZERO {
        Decimal::ZERO
    } else {
        pv_terminal_value
            .checked_div(total_present_value)
            .and_then(|share| share.checked_mul(dec!(100)))
            .ok_or_else(|| {
                ValuationError::Domain("terminal value share of total overflows".into())
            })?
    };

    if input.initial_dividend < Decimal::ZERO {
        warnings.push(format!(
            "Initial dividend {} is negative; projected values are negative",
            input.initial_dividend
        ));
    }
    if terminal_pct > dec!(85) {
        warnings.push(format!(
            "Terminal value is {}% of total value; result is dominated by the perpetuity assumption",
            terminal_pct.round_dp(1)
        ));
    }
    if projection.terminal_spread < dec!(0.01) {
        warnings.push(format!(
            "Terminal spread r - g of {} is below 1%; continuing value is highly sensitive",
            projection.terminal_spread
        ));
    }

    let output = DividendTableOutput {
        periods,
        terminal_value: projection.terminal_value,
        pv_terminal_value,
        pv_explicit_dividends,
        total_present_value,
        terminal_pct,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Projected dividend discounting with Gordon continuing value at the terminal period",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn project(
    initial_dividend: Money,
    growth_curve: &RateCurve,
    discount_curve: &RateCurve,
    terminal_period: u32,
    day_count: DayCount,
    interpolate_growth: bool,
    interpolate_discount: bool,
) -> DdmResult<Projection> {
    validate_day_count(day_count)?;

    let n = terminal_period as usize;
    let discount_rates = resolve_curve(discount_curve, n + 1, interpolate_discount, "discount_curve")?;
    // growth_rates[t - 1] applies to period t
    let growth_rates = resolve_curve(growth_curve, n, interpolate_growth, "growth_curve")?;

    let r_terminal = discount_rates[n];
    let g_terminal = match growth_rates.last() {
        Some(g) => *g,
        None => flat_terminal_growth(growth_curve, interpolate_growth)?,
    };
    if r_terminal <= g_terminal {
        return Err(ValuationError::Domain(format!(
            "discount rate ({r_terminal}) must exceed growth rate ({g_terminal}) at terminal period {terminal_period}"
        )));
    }
    let terminal_spread = r_terminal.checked_sub(g_terminal).ok_or_else(|| {
        ValuationError::Domain(format!(
            "terminal spread overflows for r={r_terminal}, g={g_terminal}"
        ))
    })?;

    let mut periods = Vec::with_capacity(n + 1);
    let mut dividend = initial_dividend;

    for (t, rate) in discount_rates.iter().enumerate() {
        let growth_rate = if t == 0 {
            Decimal::ZERO
        } else {
            let g = growth_rates[t - 1];
            let multiplier = Decimal::ONE.checked_add(g).ok_or_else(|| {
                ValuationError::Domain(format!("growth multiplier overflows at period {t}"))
            })?;
            dividend = checked_product(dividend, multiplier, "projected dividend")?;
            g
        };

        let period = t as u32;
        let df = discount_factor(*rate, period, day_count)?;
        periods.push(DividendPeriodRecord {
            period,
            dividend,
            growth_rate,
            discount_rate: *rate,
            discount_factor: df,
            present_value: checked_product(dividend, df, "discounted dividend")?,
            is_terminal: t == n,
        });
    }

    let terminal_value = dividend.checked_div(terminal_spread).ok_or_else(|| {
        ValuationError::Domain(format!(
            "continuing value overflows: {dividend} / {terminal_spread}"
        ))
    })?;
    if let Some(last) = periods.last_mut() {
        last.present_value =
            checked_product(terminal_value, last.discount_factor, "discounted continuing value")?;
    }

    if terminal_value < Decimal::ZERO {
        warn!("negative continuing value {terminal_value} at period {terminal_period}");
    }
    debug!(
        "projected {} dividend periods, terminal value {terminal_value}",
        periods.len()
    );

    Ok(Projection {
        periods,
        terminal_value,
        terminal_spread,
    })
}

/// Terminal growth when no period is projected: only a flat curve supplies one.
fn flat_terminal_growth(growth_curve: &RateCurve, interpolate_growth: bool) -> DdmResult<Rate> {
    match growth_curve {
        RateCurve::Flat(g) if !interpolate_growth => Ok(*g),
        RateCurve::Explicit(rates) => Err(ValuationError::Shape {
            field: "growth_curve".into(),
            expected: 1,
            actual: rates.len(),
        }),
        _ => Err(ValuationError::Shape {
            field: "growth_curve".into(),
            expected: 1,
            actual: 2,
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
