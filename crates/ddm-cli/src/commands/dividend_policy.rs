use clap::Args;
use log::debug;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use ddm_core::dividend_policy::dividend_table::{self, DividendTableInput};
use ddm_core::dividend_policy::gordon_growth::{self, SustainableGrowthInput};
use ddm_core::dividend_policy::h_model::{self, HModelInput};

use crate::commands::valuation::curve_from_flags;
use crate::input;

/// Arguments for a projected dividend table
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct DividendTableArgs {
    /// Dividend at period 0 (D0)
    #[arg(long)]
    pub initial_dividend: Option<Decimal>,

    /// Flat dividend growth rate
    #[arg(long)]
    pub growth_rate: Option<Decimal>,

    /// Growth rate at period 1 of an interpolated growth curve
    #[arg(long, requires = "growth_end")]
    pub growth_start: Option<Decimal>,

    /// Growth rate at the terminal period of an interpolated growth curve
    #[arg(long, requires = "growth_start")]
    pub growth_end: Option<Decimal>,

    /// Flat discount rate
    #[arg(long)]
    pub discount_rate: Option<Decimal>,

    /// Discount rate at period 0 of an interpolated discount curve
    #[arg(long, requires = "discount_end")]
    pub discount_start: Option<Decimal>,

    /// Discount rate at the terminal period of an interpolated discount curve
    #[arg(long, requires = "discount_start")]
    pub discount_end: Option<Decimal>,

    /// Last explicitly modelled period
    #[arg(long)]
    pub terminal_period: Option<u32>,

    /// Length of one period in years
    #[arg(long, default_value = "1")]
    pub day_count: Decimal,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the Gordon Growth Model
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct GordonArgs {
    /// Current dividend per share (D0)
    #[arg(long)]
    pub dividend: Decimal,

    /// Perpetual dividend growth rate
    #[arg(long)]
    pub growth_rate: Decimal,

    /// Required rate of return
    #[arg(long)]
    pub discount_rate: Decimal,
}

/// Arguments for the justified leading P/E
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LeadingPeArgs {
    /// Current dividend per share (D0)
    #[arg(long)]
    pub dividend: Decimal,

    /// Next-period earnings estimate (E1)
    #[arg(long)]
    pub earnings_estimate: Decimal,

    /// Required rate of return
    #[arg(long)]
    pub discount_rate: Decimal,

    /// Perpetual dividend growth rate
    #[arg(long)]
    pub growth_rate: Decimal,
}

/// Arguments for the sustainable growth rate
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SustainableGrowthArgs {
    #[arg(long)]
    pub net_income: Option<Decimal>,

    #[arg(long)]
    pub dividends: Option<Decimal>,

    #[arg(long)]
    pub sales: Option<Decimal>,

    #[arg(long)]
    pub total_assets: Option<Decimal>,

    #[arg(long)]
    pub shareholders_equity: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the H-model
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct HModelArgs {
    /// Current dividend per share (D0)
    #[arg(long)]
    pub dividend: Option<Decimal>,

    /// Required rate of return
    #[arg(long)]
    pub discount_rate: Option<Decimal>,

    /// Initial supernormal growth rate
    #[arg(long)]
    pub short_term_growth: Option<Decimal>,

    /// Long-term stable growth rate
    #[arg(long)]
    pub long_term_growth: Option<Decimal>,

    /// Periods over which growth declines linearly (2H)
    #[arg(long)]
    pub high_growth_periods: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_dividend_table(args: DividendTableArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input_data: DividendTableInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        DividendTableInput {
            initial_dividend: args
                .initial_dividend
                .ok_or("--initial-dividend is required (or provide --input)")?,
            growth_curve: curve_from_flags(
                args.growth_rate,
                args.growth_start,
                args.growth_end,
                "growth",
            )?,
            discount_curve: curve_from_flags(
                args.discount_rate,
                args.discount_start,
                args.discount_end,
                "discount",
            )?,
            terminal_period: args
                .terminal_period
                .ok_or("--terminal-period is required (or provide --input)")?,
            day_count: args.day_count,
            interpolate_growth_curve: false,
            interpolate_discount_curve: false,
        }
    };

    debug!(
        "dividend-table from D0={} over {} periods",
        input_data.initial_dividend, input_data.terminal_period
    );
    let result = dividend_table::calculate_dividend_table(&input_data)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_gordon(args: GordonArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let value =
        gordon_growth::gordon_growth_valuation(args.growth_rate, args.discount_rate, args.dividend)?;
    let next_dividend = gordon_growth::next_dividend(args.dividend, args.growth_rate)?;
    Ok(json!({
        "intrinsic_value": value,
        "next_dividend": next_dividend,
    }))
}

pub fn run_leading_pe(args: LeadingPeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let leading_pe = gordon_growth::leading_price_earnings(
        args.dividend,
        args.earnings_estimate,
        args.discount_rate,
        args.growth_rate,
    )?;
    Ok(json!({ "leading_pe": leading_pe }))
}

pub fn run_sustainable_growth(
    args: SustainableGrowthArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let input_data: SustainableGrowthInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        SustainableGrowthInput {
            net_income: args
                .net_income
                .ok_or("--net-income is required (or provide --input)")?,
            dividends: args
                .dividends
                .ok_or("--dividends is required (or provide --input)")?,
            sales: args.sales.ok_or("--sales is required (or provide --input)")?,
            total_assets: args
                .total_assets
                .ok_or("--total-assets is required (or provide --input)")?,
            shareholders_equity: args
                .shareholders_equity
                .ok_or("--shareholders-equity is required (or provide --input)")?,
        }
    };
    let result = gordon_growth::calculate_sustainable_growth(&input_data)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_h_model(args: HModelArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input_data: HModelInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        HModelInput {
            dividend: args
                .dividend
                .ok_or("--dividend is required (or provide --input)")?,
            discount_rate: args
                .discount_rate
                .ok_or("--discount-rate is required (or provide --input)")?,
            short_term_growth: args
                .short_term_growth
                .ok_or("--short-term-growth is required (or provide --input)")?,
            long_term_growth: args
                .long_term_growth
                .ok_or("--long-term-growth is required (or provide --input)")?,
            high_growth_periods: args
                .high_growth_periods
                .ok_or("--high-growth-periods is required (or provide --input)")?,
        }
    };
    let result = h_model::calculate_h_model(&input_data)?;
    Ok(serde_json::to_value(result)?)
}
