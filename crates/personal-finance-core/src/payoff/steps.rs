//! Single-year transforms driven by the scenario projector.
//!
//! Each step fails with an overflow error rather than leaving the `Decimal`
//! range.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::overflow;
use crate::types::{Money, Percent, Rate};
use crate::PersonalFinanceResult;

/// Roll a loan forward one year. Returns `(new_balance, interest_accrued)`.
///
/// Repayment beyond balance plus interest is absorbed; the balance never goes
/// negative and no credit carries forward.
pub fn step_loan_balance(
    balance: Money,
    repayment: Money,
    annual_rate_pct: Percent,
) -> PersonalFinanceResult<(Money, Money)> {
    let interest = balance
        .checked_mul(annual_rate_pct / dec!(100))
        .ok_or_else(|| overflow("loan interest"))?;
    let new_balance = balance
        .checked_add(interest)
        .and_then(|owed| owed.checked_sub(repayment))
        .ok_or_else(|| overflow("loan balance"))?;
    Ok((new_balance.max(Decimal::ZERO), interest))
}

/// Grow an investment one year with no new contribution.
/// Returns `(new_value, growth)`.
pub fn step_investment(value: Money, annual_rate_pct: Percent) -> PersonalFinanceResult<(Money, Money)> {
    let growth = value
        .checked_mul(annual_rate_pct / dec!(100))
        .ok_or_else(|| overflow("investment growth"))?;
    let new_value = value
        .checked_add(growth)
        .ok_or_else(|| overflow("investment value"))?;
    Ok((new_value, growth))
}

/// Income-contingent repayment: a share of income above the threshold,
/// capped at the outstanding balance.
pub fn statutory_repayment(
    income: Money,
    loan_balance: Money,
    threshold: Money,
    rate: Rate,
) -> PersonalFinanceResult<Money> {
    if income <= threshold {
        return Ok(Decimal::ZERO);
    }
    let repayment = (income - threshold)
        .checked_mul(rate)
        .ok_or_else(|| overflow("statutory repayment"))?;
    Ok(repayment.min(loan_balance))
}
