use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Length of one period in years (1 = annual, 0.5 = semi-annual).
pub type DayCount = Decimal;

/// One row of a present value table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub period: u32,
    pub cash_flow: Money,
    pub discount_rate: Rate,
    pub discount_factor: Decimal,
    pub present_value: Money,
}

/// One row of a projected dividend table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendPeriodRecord {
    pub period: u32,
    pub dividend: Money,
    /// Growth applied to reach this period's dividend (zero at period 0).
    pub growth_rate: Rate,
    pub discount_rate: Rate,
    pub discount_factor: Decimal,
    /// Discounted dividend, or the discounted continuing value at the terminal period.
    pub present_value: Money,
    pub is_terminal: bool,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
