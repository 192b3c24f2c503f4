use rust_decimal::Decimal;

use crate::error::{overflow, PersonalFinanceError};
use crate::types::{Money, Rate};
use crate::PersonalFinanceResult;

/// (1 + rate)^n by repeated multiplication.
pub fn compound(rate: Rate, n: u32) -> PersonalFinanceResult<Decimal> {
    let one_plus_r = Decimal::ONE
        .checked_add(rate)
        .ok_or_else(|| overflow("compounding factor"))?;
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result
            .checked_mul(one_plus_r)
            .ok_or_else(|| overflow("compounding factor"))?;
    }
    Ok(result)
}

/// Level payment that amortises `principal` over `periods` at `periodic_rate`.
///
/// Standard annuity formula `P·r / (1 − (1+r)^−n)`; with a zero rate the
/// principal is spread evenly.
pub fn annuity_payment(principal: Money, periodic_rate: Rate, periods: u32) -> PersonalFinanceResult<Money> {
    if periods == 0 {
        return Err(PersonalFinanceError::InvalidInput {
            field: "periods".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if periodic_rate.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }

    let factor = compound(periodic_rate, periods)?;
    if factor.is_zero() {
        return Err(PersonalFinanceError::DivisionByZero {
            context: "annuity compounding factor".into(),
        });
    }
    let discount = Decimal::ONE
        .checked_div(factor)
        .ok_or_else(|| overflow("annuity discount factor"))?;
    let denominator = Decimal::ONE - discount;
    if denominator.is_zero() {
        return Err(PersonalFinanceError::DivisionByZero {
            context: "annuity discount denominator".into(),
        });
    }

    principal
        .checked_mul(periodic_rate)
        .and_then(|interest| interest.checked_div(denominator))
        .ok_or_else(|| overflow("annuity payment"))
}

/// Value after `periods` of growth, with `contribution` added at the end of
/// each period.
pub fn future_value(
    present_value: Money,
    rate: Rate,
    contribution: Money,
    periods: u32,
) -> PersonalFinanceResult<Money> {
    let one_plus_r = Decimal::ONE
        .checked_add(rate)
        .ok_or_else(|| overflow("growth factor"))?;
    let mut value = present_value;
    for _ in 0..periods {
        value = value
            .checked_mul(one_plus_r)
            .and_then(|grown| grown.checked_add(contribution))
            .ok_or_else(|| overflow("future value"))?;
    }
    Ok(value)
}
