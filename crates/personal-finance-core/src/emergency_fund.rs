use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::error::{overflow, Violation};
use crate::serialize::{self, quantize_money};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::validation::{check_int_range, check_non_negative, into_result};
use crate::PersonalFinanceResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyFundInput {
    pub monthly_expenses: Money,
    /// Months of expenses to hold, 1 to 36.
    pub target_months: i64,
    #[serde(default)]
    pub current_savings: Money,
}

impl EmergencyFundInput {
    pub fn validate(&self) -> Vec<Violation> {
        let mut errors = Vec::new();
        check_non_negative(&mut errors, "monthly_expenses", "Monthly expenses", self.monthly_expenses);
        check_int_range(&mut errors, "target_months", "Target months", self.target_months, (1, 36));
        check_non_negative(&mut errors, "current_savings", "Current savings", self.current_savings);
        errors
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmergencyFundResult {
    #[serde(serialize_with = "serialize::money")]
    pub target_fund: Money,
    #[serde(serialize_with = "serialize::money")]
    pub savings_gap: Money,
    /// Months current savings would last; `None` with zero expenses.
    #[serde(serialize_with = "serialize::optional_rate")]
    pub coverage_months: Option<Decimal>,
    /// Share of the target already saved, capped at 1.
    #[serde(serialize_with = "serialize::optional_rate")]
    pub funded_pct: Option<Rate>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

pub fn calculate_emergency_fund(
    input: &EmergencyFundInput,
) -> PersonalFinanceResult<ComputationOutput<EmergencyFundResult>> {
    let start = Instant::now();
    into_result("emergency_fund", input.validate())?;

    info!(target_months = input.target_months, "starting emergency fund calculation");

    let target_fund = input
        .monthly_expenses
        .checked_mul(Decimal::from(input.target_months))
        .ok_or_else(|| overflow("target fund"))?;
    let savings_gap = (target_fund - input.current_savings).max(Decimal::ZERO);

    let mut warnings = Vec::new();
    let coverage_months = if input.monthly_expenses.is_zero() {
        warnings.push("Monthly expenses are zero; coverage in months is undefined".to_string());
        None
    } else {
        let months = input
            .current_savings
            .checked_div(input.monthly_expenses)
            .ok_or_else(|| overflow("coverage months"))?;
        Some(quantize_money(months))
    };
    let funded_pct = if target_fund.is_zero() {
        None
    } else {
        Some(
            input
                .current_savings
                .checked_div(target_fund)
                .map_or(Decimal::ONE, |share| share.min(Decimal::ONE)),
        )
    };

    let output = EmergencyFundResult {
        target_fund,
        savings_gap,
        coverage_months,
        funded_pct,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Emergency fund: target months of expenses against current liquid savings",
        &json!({ "target_months": input.target_months }),
        warnings,
        elapsed,
        output,
    ))
}
