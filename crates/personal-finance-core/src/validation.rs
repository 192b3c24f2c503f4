//! Reusable field checks shared by every calculator input.
//!
//! Each check appends to a caller-owned list instead of returning early, so an
//! input's `validate()` reports every violated rule in a fixed order.

use rust_decimal::Decimal;
use tracing::warn;

use crate::error::{PersonalFinanceError, ValidationRule, Violation};
use crate::PersonalFinanceResult;

/// `"monthly_rent"` -> `"Monthly Rent"`.
pub fn field_title(field: &str) -> String {
    field
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Inclusive range test.
pub fn within<T: PartialOrd>(value: T, low: T, high: T) -> bool {
    value >= low && value <= high
}

/// `label` prefixes the message, e.g. `"Monthly Rent: Value cannot be negative"`.
pub fn check_non_negative(violations: &mut Vec<Violation>, field: &str, label: &str, value: Decimal) {
    if value < Decimal::ZERO {
        violations.push(Violation::new(
            field,
            ValidationRule::NonNegative,
            format!("{label}: Value cannot be negative"),
        ));
    }
}

/// Fractional rate in [0, 1].
pub fn check_fraction(violations: &mut Vec<Violation>, field: &str, label: &str, value: Decimal) {
    if !within(value, Decimal::ZERO, Decimal::ONE) {
        violations.push(Violation::new(
            field,
            ValidationRule::Range,
            format!("{label}: Rate must be between 0 and 1"),
        ));
    }
}

pub fn check_int_range(
    violations: &mut Vec<Violation>,
    field: &str,
    label: &str,
    value: i64,
    (low, high): (i64, i64),
) {
    if !within(value, low, high) {
        violations.push(Violation::new(
            field,
            ValidationRule::Range,
            format!("{label}: Value must be between {low} and {high}"),
        ));
    }
}

/// Integer score in [0, 100].
pub fn check_score(violations: &mut Vec<Violation>, field: &str, label: &str, value: i64) {
    if !within(value, 0, 100) {
        violations.push(Violation::new(
            field,
            ValidationRule::Range,
            format!("{label}: Score must be between 0 and 100"),
        ));
    }
}

/// Tag must be one of `allowed`. `label` names the field in prose.
pub fn check_membership(
    violations: &mut Vec<Violation>,
    field: &str,
    label: &str,
    value: &str,
    allowed: &[&str],
) {
    if !allowed.contains(&value) {
        violations.push(Violation::new(
            field,
            ValidationRule::Membership,
            format!("{label} must be one of: {}", allowed.join(", ")),
        ));
    }
}

/// Turn a collected list into the calculator's go/no-go result.
pub fn into_result(calculator: &str, violations: Vec<Violation>) -> PersonalFinanceResult<()> {
    if violations.is_empty() {
        return Ok(());
    }
    warn!(
        calculator,
        violations = violations.len(),
        messages = ?violations.iter().map(|v| v.message.as_str()).collect::<Vec<_>>(),
        "input rejected"
    );
    Err(PersonalFinanceError::Validation(violations))
}
