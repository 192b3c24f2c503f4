//! Time to financial independence: how many years of contributions and
//! growth until the portfolio covers annual expenses at a safe withdrawal
//! rate.

use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::error::{overflow, ValidationRule, Violation};
use crate::serialize::{self, currency_text};
use crate::time_value::future_value;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::validation::{check_fraction, check_non_negative, field_title, into_result};
use crate::PersonalFinanceResult;

/// Longest horizon simulated.
pub const MAX_YEARS: u32 = 60;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeToFreedomInput {
    pub annual_expenses: Money,
    pub current_investments: Money,
    pub annual_contribution: Money,
    /// Fraction, 0.05 = 5%.
    pub investment_return_rate: Rate,
    /// Fraction, 0.04 = 4%.
    pub safe_withdrawal_rate: Rate,
}

impl TimeToFreedomInput {
    pub fn validate(&self) -> Vec<Violation> {
        let mut errors = Vec::new();
        for (field, value) in [
            ("annual_expenses", self.annual_expenses),
            ("current_investments", self.current_investments),
            ("annual_contribution", self.annual_contribution),
        ] {
            check_non_negative(&mut errors, field, &field_title(field), value);
        }
        for (field, value) in [
            ("investment_return_rate", self.investment_return_rate),
            ("safe_withdrawal_rate", self.safe_withdrawal_rate),
        ] {
            check_fraction(&mut errors, field, &field_title(field), value);
        }
        if self.safe_withdrawal_rate <= Decimal::ZERO {
            errors.push(Violation::new(
                "safe_withdrawal_rate",
                ValidationRule::Range,
                "Safe withdrawal rate must be greater than 0",
            ));
        }
        errors
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FreedomYear {
    pub year: u32,
    #[serde(serialize_with = "serialize::money")]
    pub portfolio_value: Money,
    #[serde(serialize_with = "serialize::money")]
    pub freedom_number: Money,
    /// Portfolio as a share of the freedom number, capped at 1.
    #[serde(serialize_with = "serialize::rate")]
    pub progress_pct: Rate,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeToFreedomResult {
    #[serde(serialize_with = "serialize::money")]
    pub freedom_number: Money,
    /// `Some(0)` when already there, `None` when not reached within
    /// [`MAX_YEARS`].
    pub years_to_freedom: Option<u32>,
    pub timeline_series: Vec<FreedomYear>,
    pub summary: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A ratio too large for `Decimal` is still full progress.
fn progress(value: Money, target: Money) -> Rate {
    if target.is_zero() {
        return Decimal::ONE;
    }
    value
        .checked_div(target)
        .map_or(Decimal::ONE, |ratio| ratio.min(Decimal::ONE))
}

fn year_row(year: u32, value: Money, target: Money) -> FreedomYear {
    FreedomYear {
        year,
        portfolio_value: value,
        freedom_number: target,
        progress_pct: progress(value, target),
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

pub fn calculate_time_to_freedom(
    input: &TimeToFreedomInput,
) -> PersonalFinanceResult<ComputationOutput<TimeToFreedomResult>> {
    let start = Instant::now();
    into_result("time_to_freedom", input.validate())?;

    let freedom_number = input
        .annual_expenses
        .checked_div(input.safe_withdrawal_rate)
        .ok_or_else(|| overflow("freedom number"))?;
    info!(%freedom_number, "starting time-to-freedom projection");

    let mut value = input.current_investments;
    let mut timeline_series = vec![year_row(0, value, freedom_number)];
    let mut years_to_freedom = (value >= freedom_number).then_some(0);

    if years_to_freedom.is_none() {
        for year in 1..=MAX_YEARS {
            value = future_value(value, input.investment_return_rate, input.annual_contribution, 1)?;
            timeline_series.push(year_row(year, value, freedom_number));
            if value >= freedom_number {
                debug!(year, %value, "freedom number reached");
                years_to_freedom = Some(year);
                break;
            }
        }
    }

    let target_text = currency_text(freedom_number);
    let mut warnings = Vec::new();
    let summary = match years_to_freedom {
        Some(0) => format!("You have already reached your freedom number of {target_text}."),
        Some(1) => format!("You reach your freedom number of {target_text} in 1 year."),
        Some(years) => format!("You reach your freedom number of {target_text} in {years} years."),
        None => {
            warnings.push(format!(
                "Freedom number is not reached within {MAX_YEARS} years at the given contribution and return"
            ));
            format!("Your freedom number of {target_text} is not reached within {MAX_YEARS} years.")
        }
    };

    let output = TimeToFreedomResult {
        freedom_number,
        years_to_freedom,
        timeline_series,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Time to freedom: annual compounding with end-of-year contributions until expenses / SWR is met",
        &json!({
            "max_years": MAX_YEARS,
            "investment_return_rate": input.investment_return_rate.to_string(),
            "safe_withdrawal_rate": input.safe_withdrawal_rate.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(expenses: Money, current: Money, contribution: Money, r: Rate, swr: Rate) -> TimeToFreedomInput {
        TimeToFreedomInput {
            annual_expenses: expenses,
            current_investments: current,
            annual_contribution: contribution,
            investment_return_rate: r,
            safe_withdrawal_rate: swr,
        }
    }

    // ---------------------------------------------------------------
    // 1. Timeline
    // ---------------------------------------------------------------
    #[test]
    fn test_reached_after_growth() {
        let out = calculate_time_to_freedom(&input(
            dec!(40000),
            dec!(900000),
            dec!(10000),
            dec!(0.05),
            dec!(0.04),
        ))
        .unwrap();
        let r = out.result;
        assert_eq!(r.freedom_number, dec!(1000000));
        assert_eq!(r.years_to_freedom, Some(2));
        assert_eq!(r.timeline_series.len(), 3);
        assert_eq!(r.timeline_series[1].portfolio_value, dec!(955000));
        assert_eq!(r.timeline_series[2].portfolio_value, dec!(1012750));
        assert_eq!(r.timeline_series[2].progress_pct, Decimal::ONE);
        assert_eq!(r.summary, "You reach your freedom number of £1,000,000 in 2 years.");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_contributions_only_hit_exactly() {
        let r = calculate_time_to_freedom(&input(
            dec!(4000),
            Decimal::ZERO,
            dec!(10000),
            Decimal::ZERO,
            dec!(0.04),
        ))
        .unwrap()
        .result;
        assert_eq!(r.years_to_freedom, Some(10));
        assert_eq!(r.timeline_series[5].progress_pct, dec!(0.5));
    }

    #[test]
    fn test_already_free() {
        let r = calculate_time_to_freedom(&input(
            dec!(40000),
            dec!(2000000),
            Decimal::ZERO,
            dec!(0.05),
            dec!(0.04),
        ))
        .unwrap()
        .result;
        assert_eq!(r.years_to_freedom, Some(0));
        assert_eq!(r.timeline_series.len(), 1);
        assert!(r.summary.starts_with("You have already reached"));
    }

    // ---------------------------------------------------------------
    // 2. Not reached
    // ---------------------------------------------------------------
    #[test]
    fn test_not_reached_within_horizon() {
        let out = calculate_time_to_freedom(&input(
            dec!(100000),
            dec!(1000),
            Decimal::ZERO,
            Decimal::ZERO,
            dec!(0.01),
        ))
        .unwrap();
        assert_eq!(out.result.years_to_freedom, None);
        assert_eq!(out.result.timeline_series.len(), 61);
        assert_eq!(out.result.timeline_series.last().unwrap().year, 60);
        assert_eq!(out.warnings.len(), 1);
    }

    // ---------------------------------------------------------------
    // 3. Validation
    // ---------------------------------------------------------------
    #[test]
    fn test_validation_messages() {
        let messages: Vec<String> = input(dec!(-1), dec!(-1), dec!(0), dec!(1.2), dec!(0))
            .validate()
            .into_iter()
            .map(|v| v.message)
            .collect();
        assert_eq!(
            messages,
            vec![
                "Annual Expenses: Value cannot be negative".to_string(),
                "Current Investments: Value cannot be negative".to_string(),
                "Investment Return Rate: Rate must be between 0 and 1".to_string(),
                "Safe withdrawal rate must be greater than 0".to_string(),
            ]
        );
    }

    #[test]
    fn test_negative_swr_reports_both() {
        let errors = input(dec!(1), dec!(0), dec!(0), dec!(0.05), dec!(-0.01)).validate();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "Safe Withdrawal Rate: Rate must be between 0 and 1");
    }

    // ---------------------------------------------------------------
    // 4. Decimal range
    // ---------------------------------------------------------------
    #[test]
    fn test_freedom_number_past_decimal_range() {
        let case = input(
            dec!(100000000000000000000),
            Decimal::ZERO,
            Decimal::ZERO,
            dec!(0.05),
            dec!(0.000000001),
        );
        assert!(case.validate().is_empty());
        let err = calculate_time_to_freedom(&case).unwrap_err();
        assert!(!err.is_client_error());
        assert_eq!(err.to_string(), "Arithmetic overflow in freedom number");
    }

    #[test]
    fn test_portfolio_growth_past_decimal_range() {
        let case = input(
            dec!(70000000000000000000000000),
            dec!(10000000000000000000000000000),
            Decimal::ZERO,
            Decimal::ONE,
            dec!(0.001),
        );
        let err = calculate_time_to_freedom(&case).unwrap_err();
        assert_eq!(err.to_string(), "Arithmetic overflow in future value");
    }
}
