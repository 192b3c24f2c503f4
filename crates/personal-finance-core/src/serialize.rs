//! JSON conversion at the calculator boundary.
//!
//! Result structures derive `Serialize` and tag each decimal field with one of
//! the field serializers below, so the output schema is fixed at compile time:
//! money is quantized to 2 dp (round-half-up) and emitted as a JSON number,
//! rates are emitted unquantized. Inputs go the other way through
//! [`parse_input`], which reports coercion failures as malformed input rather
//! than as business-rule violations.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::DeserializeOwned;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};

use crate::error::PersonalFinanceError;
use crate::PersonalFinanceResult;

/// Quantize a monetary amount to pennies, rounding half away from zero.
pub fn quantize_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn to_number<S: Serializer>(value: Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    // Nearest f64 via the decimal text.
    let number: f64 = value
        .to_string()
        .parse()
        .map_err(|_| S::Error::custom(format!("decimal {value} is not representable as f64")))?;
    serializer.serialize_f64(number)
}

/// Money field: 2 dp, half-up, JSON number.
pub fn money<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    to_number(quantize_money(*value), serializer)
}

/// Optional money field: `null` when absent.
pub fn optional_money<S: Serializer>(
    value: &Option<Decimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => money(v, serializer),
        None => serializer.serialize_none(),
    }
}

/// Rate or percentage field: unquantized JSON number.
pub fn rate<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    to_number(*value, serializer)
}

/// Optional rate field: `null` when absent.
pub fn optional_rate<S: Serializer>(
    value: &Option<Decimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => rate(v, serializer),
        None => serializer.serialize_none(),
    }
}

/// Whole-pound amount for prose, e.g. `£12,345`. Banker's rounding.
pub fn currency_text(amount: Decimal) -> String {
    let rounded = amount.round_dp(0);
    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-£{grouped}")
    } else {
        format!("£{grouped}")
    }
}

/// Percentage with exactly one decimal place, e.g. `12.0`. Banker's rounding.
pub fn percent_text(value: Decimal) -> String {
    let mut rounded = value.round_dp(1);
    rounded.rescale(1);
    rounded.to_string()
}

/// Convert any result structure into a tree of JSON primitives.
pub fn to_json<T: Serialize>(value: &T) -> PersonalFinanceResult<serde_json::Value> {
    Ok(serde_json::to_value(value)?)
}

/// Coerce a raw JSON payload into a typed calculator input.
pub fn parse_input<T: DeserializeOwned>(value: serde_json::Value) -> PersonalFinanceResult<T> {
    serde_json::from_value(value).map_err(|e| PersonalFinanceError::MalformedInput(e.to_string()))
}
