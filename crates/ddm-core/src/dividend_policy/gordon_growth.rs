//! Single-stage dividend models.
//!
//! - Sustainable growth from a DuPont decomposition of retention × ROE.
//! - Gordon Growth value: P₀ = D₀(1+g)/(r-g).
//! - Justified leading P/E: D₁/E₁/(r-g).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValuationError;
use crate::time_value::checked_product;
use crate::types::{Money, Rate};
use crate::DdmResult;

/// Financial statement inputs for the sustainable growth rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SustainableGrowthInput {
    pub net_income: Money,
    pub dividends: Money,
    pub sales: Money,
    pub total_assets: Money,
    pub shareholders_equity: Money,
}

/// Sustainable growth with its DuPont components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SustainableGrowthOutput {
    /// g = b × ROE
    pub sustainable_growth: Rate,
    /// Earnings retention ratio b = (NI - Div) / NI
    pub retention_ratio: Rate,
    /// NI / Sales
    pub net_margin: Rate,
    /// Sales / Assets
    pub asset_turnover: Decimal,
    /// Assets / Equity
    pub equity_multiplier: Decimal,
    /// Return on equity: margin × turnover × leverage
    pub return_on_equity: Rate,
}

/// Sustainable dividend growth rate `(NI-Div)/NI × NI/Sales × Sales/Assets × Assets/Equity`.
pub fn sustainable_dividend_growth(
    net_income: Money,
    dividends: Money,
    sales: Money,
    total_assets: Money,
    shareholders_equity: Money,
) -> DdmResult<Rate> {
    let out = calculate_sustainable_growth(&SustainableGrowthInput {
        net_income,
        dividends,
        sales,
        total_assets,
        shareholders_equity,
    })?;
    Ok(out.sustainable_growth)
}

/// Decompose sustainable growth into retention and the three DuPont ratios.
pub fn calculate_sustainable_growth(
    input: &SustainableGrowthInput,
) -> DdmResult<SustainableGrowthOutput> {
    require_non_zero(input.net_income, "net_income")?;
    require_non_zero(input.sales, "sales")?;
    require_non_zero(input.total_assets, "total_assets")?;
    require_non_zero(input.shareholders_equity, "shareholders_equity")?;

    let retained = input.net_income.checked_sub(input.dividends).ok_or_else(|| {
        ValuationError::Domain("retained earnings overflow".into())
    })?;
    let retention_ratio = checked_quotient(retained, input.net_income, "retention ratio")?;
    let net_margin = checked_quotient(input.net_income, input.sales, "net margin")?;
    let asset_turnover = checked_quotient(input.sales, input.total_assets, "asset turnover")?;
    let equity_multiplier =
        checked_quotient(input.total_assets, input.shareholders_equity, "equity multiplier")?;
    let return_on_equity = checked_product(
        checked_product(net_margin, asset_turnover, "return on equity")?,
        equity_multiplier,
        "return on equity",
    )?;

    Ok(SustainableGrowthOutput {
        sustainable_growth: checked_product(retention_ratio, return_on_equity, "sustainable growth")?,
        retention_ratio,
        net_margin,
        asset_turnover,
        equity_multiplier,
        return_on_equity,
    })
}

/// Gordon Growth value of a share: `D₀(1+g) / (r-g)`.
pub fn gordon_growth_valuation(growth_rate: Rate, discount_rate: Rate, dividend: Money) -> DdmResult<Money> {
    let spread = growth_spread(discount_rate, growth_rate)?;
    checked_quotient(next_dividend(dividend, growth_rate)?, spread, "Gordon value")
}

/// Justified leading P/E: `D₁ / E₁ / (r-g)` with `D₁ = D₀(1+g)`.
pub fn leading_price_earnings(
    dividend: Money,
    earnings_estimate: Money,
    discount_rate: Rate,
    growth_rate: Rate,
) -> DdmResult<Decimal> {
    require_non_zero(earnings_estimate, "earnings_estimate")?;
    let spread = growth_spread(discount_rate, growth_rate)?;
    let payout = checked_quotient(
        next_dividend(dividend, growth_rate)?,
        earnings_estimate,
        "leading payout",
    )?;
    checked_quotient(payout, spread, "leading P/E")
}

/// Next-period dividend `D₁ = D₀(1+g)`.
pub fn next_dividend(dividend: Money, growth_rate: Rate) -> DdmResult<Money> {
    let multiplier = Decimal::ONE.checked_add(growth_rate).ok_or_else(|| {
        ValuationError::Domain(format!("growth multiplier overflows for g={growth_rate}"))
    })?;
    checked_product(dividend, multiplier, "next dividend")
}

pub(crate) fn checked_quotient(numerator: Decimal, divisor: Decimal, context: &str) -> DdmResult<Decimal> {
    numerator.checked_div(divisor).ok_or_else(|| {
        ValuationError::Domain(format!("{context} overflows: {numerator} / {divisor}"))
    })
}

/// `r - g`, rejected unless strictly positive.
pub(crate) fn growth_spread(discount_rate: Rate, growth_rate: Rate) -> DdmResult<Rate> {
    if discount_rate <= growth_rate {
        return Err(ValuationError::Domain(format!(
            "discount rate ({discount_rate}) must exceed growth rate ({growth_rate}) for a convergent perpetuity"
        )));
    }
    discount_rate.checked_sub(growth_rate).ok_or_else(|| {
        ValuationError::Domain(format!(
            "spread overflows for r={discount_rate}, g={growth_rate}"
        ))
    })
}

fn require_non_zero(value: Decimal, field: &str) -> DdmResult<()> {
    if value.is_zero() {
        return Err(ValuationError::Domain(format!("{field} must be non-zero")));
    }
    Ok(())
}
