pub mod dividend_policy;
pub mod valuation;
