pub mod config;
pub mod error;
pub mod serialize;
pub mod time_value;
pub mod types;
pub mod validation;

#[cfg(feature = "payoff")]
pub mod payoff;

#[cfg(feature = "income_tax")]
pub mod income_tax;

#[cfg(feature = "rent_vs_buy")]
pub mod rent_vs_buy;

#[cfg(feature = "emergency_fund")]
pub mod emergency_fund;

#[cfg(feature = "resilience")]
pub mod resilience;

#[cfg(feature = "freedom")]
pub mod freedom;

pub use config::TaxConfig;
pub use error::{PersonalFinanceError, ValidationRule, Violation};
pub use types::*;

/// Standard result type for all personal-finance operations
pub type PersonalFinanceResult<T> = Result<T, PersonalFinanceError>;
