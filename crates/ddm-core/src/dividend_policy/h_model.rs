//! H-Model Dividend Discount Model.
//!
//! Two-stage variant in which dividend growth declines **linearly** from a
//! short-term rate (g_S) to a long-term rate (g_L) over N high-growth periods.
//! The half-length of that decline is H = N/2.
//!
//! Formula:
//!   V₀ = D₀(1+g_L)/(r-g_L) + D₀·(N/2)·(g_S-g_L)/(r-g_L)
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::gordon_growth::{checked_quotient, growth_spread, next_dividend};
use crate::error::ValuationError;
use crate::time_value::{checked_product, checked_total};
use crate::types::{Money, Rate};
use crate::DdmResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// Input for the H-model valuation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HModelInput {
    /// Current dividend per share (D₀).
    pub dividend: Money,
    /// Required rate of return.
    pub discount_rate: Rate,
    /// Initial (supernormal) growth rate.
    pub short_term_growth: Rate,
    /// Growth rate once the decline completes.
    pub long_term_growth: Rate,
    /// Number of periods over which growth declines (2H).
    pub high_growth_periods: Decimal,
}

/// Output of the H-model valuation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HModelOutput {
    /// Value per share.
    pub intrinsic_value: Money,
    /// Perpetuity at long-term growth: D₀(1+g_L)/(r-g_L).
    pub stable_value: Money,
    /// Premium from supernormal growth: D₀·H·(g_S-g_L)/(r-g_L).
    pub growth_premium: Money,
    /// Growth premium as a percentage of total value.
    pub growth_premium_pct: Decimal,
    /// Half-length of the decline (H = N/2).
    pub half_life: Decimal,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// H-model value per share.
pub fn h_model_valuation(
    short_term_growth: Rate,
    long_term_growth: Rate,
    high_growth_periods: Decimal,
    discount_rate: Rate,
    dividend: Money,
) -> DdmResult<Money> {
    let out = calculate_h_model(&HModelInput {
        dividend,
        discount_rate,
        short_term_growth,
        long_term_growth,
        high_growth_periods,
    })?;
    Ok(out.intrinsic_value)
}

/// H-model value with its stable/premium decomposition.
pub fn calculate_h_model(input: &HModelInput) -> DdmResult<HModelOutput> {
    validate_input(input)?;

    let spread = growth_spread(input.discount_rate, input.long_term_growth)?;
    let half_life = input.high_growth_periods / dec!(2);

    let stable_value = checked_quotient(
        next_dividend(input.dividend, input.long_term_growth)?,
        spread,
        "stable value",
    )?;
    let excess_growth = input
        .short_term_growth
        .checked_sub(input.long_term_growth)
        .ok_or_else(|| ValuationError::Domain("excess growth overflows".into()))?;
    let growth_premium = checked_quotient(
        checked_product(
            checked_product(input.dividend, half_life, "growth premium")?,
            excess_growth,
            "growth premium",
        )?,
        spread,
        "growth premium",
    )?;
    let intrinsic_value = checked_total([stable_value, growth_premium], "H-model value")?;

    let growth_premium_pct = if intrinsic_value == Decimal::ZERO {
        Decimal::ZERO
    } else {
        checked_product(
            checked_quotient(growth_premium, intrinsic_value, "growth premium share")?,
            dec!(100),
            "growth premium share",
        )?
    };

    Ok(HModelOutput {
        intrinsic_value,
        stable_value,
        growth_premium,
        growth_premium_pct,
        half_life,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &HModelInput) -> DdmResult<()> {
    if input.high_growth_periods < Decimal::ZERO {
        return Err(ValuationError::InvalidInput {
            field: "high_growth_periods".into(),
            reason: "High-growth period count must be non-negative.".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
