use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationRule, Violation};
use crate::types::{Money, Percent};
use crate::validation::within;

const MIN_AGE: i32 = 18;
const MAX_AGE: i32 = 100;
const MIN_YEAR: i32 = 1980;
const MAX_YEAR: i32 = 2100;
const MAX_DURATION_YEARS: i32 = 50;

/// Ceiling for every percentage-point rate on the form.
const MAX_RATE_PCT: Percent = dec!(20);

/// Loan-vs-invest scenario inputs. Rates are percentage points (8.0 = 8%).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorInput {
    pub age: i32,
    pub graduation_year: i32,
    pub current_year: i32,
    pub loan_duration_years: i32,
    /// Lump sum invested at the start of the projection.
    pub investment_amount: Money,
    pub investment_growth_high: Percent,
    pub investment_growth_low: Percent,
    pub investment_growth_average: Percent,
    /// Validated but not used by the projection.
    pub investment_amount_growth: Percent,
    pub pre_tax_income: Money,
    pub salary_growth_optimistic: Percent,
    pub salary_growth_pessimistic: Percent,
    pub initial_loan_balance: Money,
    pub loan_interest_current: Percent,
    pub loan_interest_high: Percent,
    pub loan_interest_low: Percent,
}

impl CalculatorInput {
    /// Calendar year in which the remaining balance is written off.
    pub fn loan_end_year(&self) -> i32 {
        self.graduation_year + self.loan_duration_years
    }

    pub fn years_remaining(&self) -> i32 {
        self.loan_end_year() - self.current_year
    }

    /// Every violated rule, in reporting order. Empty means safe to project.
    pub fn validate(&self) -> Vec<Violation> {
        let mut errors = Vec::new();
        let mut push = |field: &str, rule: ValidationRule, message: String| {
            errors.push(Violation::new(field, rule, message));
        };
        let pct_ok = |v: Percent| within(v, Percent::ZERO, MAX_RATE_PCT);

        if !within(self.age, MIN_AGE, MAX_AGE) {
            push("age", ValidationRule::Range, "Age must be between 18 and 100".into());
        }
        if !within(self.current_year, MIN_YEAR, MAX_YEAR) {
            push(
                "current_year",
                ValidationRule::Range,
                "Current year must be between 1980 and 2100".into(),
            );
        }
        let max_graduation = self.current_year + 10;
        if !within(self.graduation_year, MIN_YEAR, max_graduation) {
            push(
                "graduation_year",
                ValidationRule::Range,
                format!("Graduation year must be between 1980 and {max_graduation}"),
            );
        }
        if !within(self.loan_duration_years, 1, MAX_DURATION_YEARS) {
            push(
                "loan_duration_years",
                ValidationRule::Range,
                "Loan duration must be between 1 and 50 years".into(),
            );
        }

        // Investment growth
        let (low, avg, high) = (
            self.investment_growth_low,
            self.investment_growth_average,
            self.investment_growth_high,
        );
        if low > high {
            push(
                "investment_growth_low",
                ValidationRule::Ordering,
                format!("Investment growth low ({low}%) cannot exceed high ({high}%)"),
            );
        }
        for (field, label, value) in [
            ("investment_growth_low", "Investment growth low", low),
            ("investment_growth_high", "Investment growth high", high),
            ("investment_growth_average", "Investment growth average", avg),
        ] {
            if !pct_ok(value) {
                push(field, ValidationRule::Range, format!("{label} must be between 0% and 20%"));
            }
        }
        if !(low <= avg && avg <= high) {
            push(
                "investment_growth_average",
                ValidationRule::Ordering,
                format!(
                    "Investment growth average ({avg}%) must be between low ({low}%) and high ({high}%)"
                ),
            );
        }

        // Loan interest
        let (low, cur, high) = (
            self.loan_interest_low,
            self.loan_interest_current,
            self.loan_interest_high,
        );
        if !(low <= cur && cur <= high) {
            push(
                "loan_interest_current",
                ValidationRule::Ordering,
                format!("Loan interest current ({cur}%) must be between low ({low}%) and high ({high}%)"),
            );
        }
        for (field, label, value) in [
            ("loan_interest_low", "Loan interest low", low),
            ("loan_interest_current", "Loan interest current", cur),
            ("loan_interest_high", "Loan interest high", high),
        ] {
            if !pct_ok(value) {
                push(field, ValidationRule::Range, format!("{label} must be between 0% and 20%"));
            }
        }

        for (field, label, value) in [
            ("investment_amount", "Investment amount", self.investment_amount),
            ("pre_tax_income", "Pre-tax income", self.pre_tax_income),
            ("initial_loan_balance", "Initial loan balance", self.initial_loan_balance),
        ] {
            if value < Money::ZERO {
                push(field, ValidationRule::NonNegative, format!("{label} cannot be negative"));
            }
        }

        for (field, label, value) in [
            ("investment_amount_growth", "Investment amount growth", self.investment_amount_growth),
            ("salary_growth_optimistic", "Salary growth optimistic", self.salary_growth_optimistic),
            ("salary_growth_pessimistic", "Salary growth pessimistic", self.salary_growth_pessimistic),
        ] {
            if !pct_ok(value) {
                push(field, ValidationRule::Range, format!("{label} must be between 0% and 20%"));
            }
        }
        if self.salary_growth_pessimistic > self.salary_growth_optimistic {
            push(
                "salary_growth_pessimistic",
                ValidationRule::Ordering,
                format!(
                    "Salary growth pessimistic ({}%) cannot exceed optimistic ({}%)",
                    self.salary_growth_pessimistic, self.salary_growth_optimistic
                ),
            );
        }

        // Cross-field consistency
        if self.graduation_year + self.age < self.current_year {
            push(
                "graduation_year",
                ValidationRule::Consistency,
                "Invalid combination: graduation year and age don't align with current year".into(),
            );
        }
        let forgiveness_age = self.age + self.years_remaining();
        if forgiveness_age > MAX_AGE {
            push(
                "loan_duration_years",
                ValidationRule::Consistency,
                format!(
                    "Loan would not be forgiven until age {forgiveness_age}, which exceeds maximum age of 100"
                ),
            );
        }
        if self.graduation_year > self.current_year {
            push(
                "graduation_year",
                ValidationRule::Consistency,
                format!(
                    "Graduation year ({}) is in the future. This calculator is for graduates only.",
                    self.graduation_year
                ),
            );
        }
        if low > high {
            push(
                "loan_interest_low",
                ValidationRule::Ordering,
                format!("Loan interest low ({low}%) cannot exceed high ({high}%)"),
            );
        }

        errors
    }
}
