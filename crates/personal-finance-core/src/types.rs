//! Numeric aliases and the envelope every calculator returns.

use rust_decimal::Decimal;
use serde::Serialize;

/// Pounds and pence. Never `f64`.
pub type Money = Decimal;

/// Fractional rate (0.05 = 5%), as used by the tax tables and the housing
/// and freedom calculators.
pub type Rate = Decimal;

/// Percentage points (5.0 = 5%), as entered on the loan payoff form.
pub type Percent = Decimal;

/// A calculator's result plus the context needed to read it.
///
/// `warnings` carry non-fatal conditions (a loan never cleared, a target
/// never reached); failures are errors, never warnings.
#[derive(Debug, Clone, Serialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComputationMetadata {
    /// Crate version that produced the figures.
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Wrap a finished result in its envelope.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_metadata_populates_envelope() {
        let out = with_metadata(
            "Test methodology",
            &serde_json::json!({ "horizon": 10 }),
            vec!["note".into()],
            42,
            7u32,
        );
        assert_eq!(out.result, 7);
        assert_eq!(out.methodology, "Test methodology");
        assert_eq!(out.assumptions["horizon"], 10);
        assert_eq!(out.warnings, vec!["note".to_string()]);
        assert_eq!(out.metadata.computation_time_us, 42);
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }
}
