use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a business-rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRule {
    /// Value outside its permitted numeric range.
    Range,
    /// Two related values in the wrong order (e.g. low > high).
    Ordering,
    /// Monetary amount below zero.
    NonNegative,
    /// Cross-field combination that cannot describe a real situation.
    Consistency,
    /// Tag not in the allowed set of values.
    Membership,
}

/// A single business-rule violation on otherwise well-typed input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub rule: ValidationRule,
    pub message: String,
}

impl Violation {
    pub fn new(field: &str, rule: ValidationRule, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            rule,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Debug, Error)]
pub enum PersonalFinanceError {
    #[error("Invalid input: {}", join_messages(.0))]
    Validation(Vec<Violation>),

    #[error("Invalid input: {0}")]
    MalformedInput(String),

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

fn join_messages(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result of a checked `Decimal` operation that left the representable range.
pub(crate) fn overflow(context: &str) -> PersonalFinanceError {
    PersonalFinanceError::Overflow {
        context: context.to_string(),
    }
}

impl PersonalFinanceError {
    /// True when the caller can fix the failure by supplying different input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PersonalFinanceError::Validation(_)
                | PersonalFinanceError::MalformedInput(_)
                | PersonalFinanceError::InvalidInput { .. }
        )
    }

    /// Human-readable messages for an `{"errors": [...]}` body.
    pub fn messages(&self) -> Vec<String> {
        match self {
            PersonalFinanceError::Validation(violations) => {
                violations.iter().map(|v| v.message.clone()).collect()
            }
            PersonalFinanceError::MalformedInput(_) | PersonalFinanceError::InvalidInput { .. } => {
                vec![self.to_string()]
            }
            other => vec![format!("Calculation error: {other}")],
        }
    }
}

impl From<serde_json::Error> for PersonalFinanceError {
    fn from(e: serde_json::Error) -> Self {
        PersonalFinanceError::SerializationError(e.to_string())
    }
}
