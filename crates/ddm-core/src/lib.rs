pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "valuation")]
pub mod valuation;

#[cfg(feature = "dividend_policy")]
pub mod dividend_policy;

pub use error::ValuationError;
pub use time_value::RateCurve;
pub use types::*;

/// Standard result type for all ddm operations
pub type DdmResult<T> = Result<T, ValuationError>;
