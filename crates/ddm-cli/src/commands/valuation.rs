use clap::Args;
use log::debug;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use ddm_core::time_value::{self, RateCurve};
use ddm_core::valuation::pv_table::{self, PvTableInput};

use crate::input;

/// Arguments for a present value table
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PvTableArgs {
    /// Comma-separated cash flows, period 0 first (e.g. -100,3,3,103)
    #[arg(long, value_delimiter = ',')]
    pub cash_flows: Vec<Decimal>,

    /// Flat discount rate (e.g. 0.05 for 5%)
    #[arg(long)]
    pub discount_rate: Option<Decimal>,

    /// Discount rate at the first period of an interpolated curve
    #[arg(long, requires = "discount_end")]
    pub discount_start: Option<Decimal>,

    /// Discount rate at the last period of an interpolated curve
    #[arg(long, requires = "discount_start")]
    pub discount_end: Option<Decimal>,

    /// Length of one period in years
    #[arg(long, default_value = "1")]
    pub day_count: Decimal,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for expanding a rate curve
#[derive(Args)]
pub struct RateCurveArgs {
    /// Flat rate repeated for every period
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Comma-separated explicit rates, one per period
    #[arg(long, value_delimiter = ',')]
    pub rates: Vec<Decimal>,

    /// First-period rate of an interpolated curve
    #[arg(long, requires = "end")]
    pub start: Option<Decimal>,

    /// Last-period rate of an interpolated curve
    #[arg(long, requires = "start")]
    pub end: Option<Decimal>,

    /// Number of periods
    #[arg(long)]
    pub periods: usize,

    /// Interpolate between a two-element --rates pair
    #[arg(long)]
    pub interpolate: bool,
}

/// Arguments for a single-period discount factor
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct DiscountFactorArgs {
    /// Discount rate for the period
    #[arg(long)]
    pub rate: Decimal,

    /// Period index
    #[arg(long)]
    pub period: u32,

    /// Length of one period in years
    #[arg(long, default_value = "1")]
    pub day_count: Decimal,

    /// Optional cash flow to discount
    #[arg(long)]
    pub cash_flow: Option<Decimal>,
}

/// Resolve a curve from `--<name>-rate` or `--<name>-start/--<name>-end` flags.
pub fn curve_from_flags(
    flat: Option<Decimal>,
    start: Option<Decimal>,
    end: Option<Decimal>,
    name: &str,
) -> Result<RateCurve, Box<dyn std::error::Error>> {
    match (flat, start, end) {
        (_, Some(start), Some(end)) => Ok(RateCurve::interpolated(start, end)),
        (Some(rate), _, _) => Ok(RateCurve::flat(rate)),
        _ => Err(format!(
            "--{name}-rate or --{name}-start/--{name}-end is required (or provide --input)"
        )
        .into()),
    }
}

pub fn run_pv_table(args: PvTableArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input_data: PvTableInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        if args.cash_flows.is_empty() {
            return Err("--cash-flows is required (or provide --input)".into());
        }
        PvTableInput {
            cash_flows: args.cash_flows,
            discount_curve: curve_from_flags(
                args.discount_rate,
                args.discount_start,
                args.discount_end,
                "discount",
            )?,
            day_count: args.day_count,
            interpolate_discount_curve: false,
        }
    };

    debug!(
        "pv-table over {} cash flows, curve {:?}",
        input_data.cash_flows.len(),
        input_data.discount_curve
    );
    let result = pv_table::calculate_pv_table(&input_data)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_rate_curve(args: RateCurveArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let curve = if !args.rates.is_empty() {
        RateCurve::Explicit(args.rates)
    } else {
        curve_from_flags(args.rate, args.start, args.end, "rate")
            .map_err(|_| "--rate, --rates or --start/--end is required")?
    };

    let rates = time_value::build_rate_sequence(&curve, args.periods, args.interpolate)?;
    let periods: Vec<Value> = rates
        .iter()
        .enumerate()
        .map(|(t, r)| json!({ "period": t, "rate": r }))
        .collect();
    Ok(json!({ "periods": periods }))
}

pub fn run_discount_factor(args: DiscountFactorArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let discount_factor = time_value::discount_factor(args.rate, args.period, args.day_count)?;
    let present_value = args
        .cash_flow
        .map(|cf| time_value::checked_product(cf, discount_factor, "present value"))
        .transpose()?;
    Ok(json!({
        "discount_factor": discount_factor,
        "present_value": present_value,
    }))
}
