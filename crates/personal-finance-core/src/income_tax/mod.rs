//! UK take-home pay: income tax, employee National Insurance and student
//! loan deductions for one tax year.

pub mod bands;

use std::time::Instant;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

pub use bands::BandBreakdown;
use bands::{apply_bands, ni_bands, tapered_allowance};

use crate::config::TaxConfig;
use crate::error::{overflow, PersonalFinanceError, ValidationRule, Violation};
use crate::serialize;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::validation::{check_membership, check_non_negative, into_result, within};
use crate::PersonalFinanceResult;

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayFrequency {
    Annual,
    Monthly,
    Weekly,
}

impl PayFrequency {
    pub const TAGS: [&'static str; 3] = ["annual", "monthly", "weekly"];

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "annual" => Some(Self::Annual),
            "monthly" => Some(Self::Monthly),
            "weekly" => Some(Self::Weekly),
            _ => None,
        }
    }

    /// Pay periods per year.
    pub fn periods(self) -> Decimal {
        match self {
            Self::Annual => Decimal::ONE,
            Self::Monthly => dec!(12),
            Self::Weekly => dec!(52),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PensionContributionType {
    None,
    Percentage,
    Amount,
}

impl PensionContributionType {
    pub const TAGS: [&'static str; 3] = ["none", "percentage", "amount"];

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "none" => Some(Self::None),
            "percentage" => Some(Self::Percentage),
            "amount" => Some(Self::Amount),
            _ => None,
        }
    }
}

pub const JURISDICTIONS: [&str; 2] = ["england_wales_ni", "scotland"];
pub const NI_CATEGORIES: [&str; 7] = ["A", "B", "C", "H", "J", "M", "Z"];
pub const STUDENT_LOAN_PLANS: [&str; 6] =
    ["none", "plan_1", "plan_2", "plan_4", "plan_5", "postgraduate"];

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

fn default_pension_type() -> String {
    "none".into()
}

/// Tagged fields stay as strings so an unknown tag is reported as a
/// validation failure rather than a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxCalculationInput {
    /// Gross pay per `pay_frequency` period.
    pub gross_income: Money,
    #[serde(default)]
    pub bonus_annual: Money,
    pub pay_frequency: String,
    pub tax_jurisdiction: String,
    pub ni_category: String,
    pub student_loan_plan: String,
    #[serde(default = "default_pension_type")]
    pub pension_contribution_type: String,
    /// Percent of gross (0-100) or a fixed annual amount.
    #[serde(default)]
    pub pension_contribution_value: Decimal,
    #[serde(default)]
    pub other_pretax_deductions: Money,
    pub tax_year: String,
}

impl TaxCalculationInput {
    pub fn validate(&self) -> Vec<Violation> {
        let mut errors = Vec::new();

        check_non_negative(&mut errors, "gross_income", "Gross income", self.gross_income);
        check_membership(
            &mut errors,
            "pay_frequency",
            "Pay frequency",
            &self.pay_frequency,
            &PayFrequency::TAGS,
        );
        check_membership(
            &mut errors,
            "tax_jurisdiction",
            "Tax jurisdiction",
            &self.tax_jurisdiction,
            &JURISDICTIONS,
        );
        check_membership(&mut errors, "ni_category", "NI category", &self.ni_category, &NI_CATEGORIES);
        check_membership(
            &mut errors,
            "student_loan_plan",
            "Student loan plan",
            &self.student_loan_plan,
            &STUDENT_LOAN_PLANS,
        );

        match PensionContributionType::from_tag(&self.pension_contribution_type) {
            None => check_membership(
                &mut errors,
                "pension_contribution_type",
                "Pension contribution type",
                &self.pension_contribution_type,
                &PensionContributionType::TAGS,
            ),
            Some(PensionContributionType::Percentage)
                if !within(self.pension_contribution_value, Decimal::ZERO, dec!(100)) =>
            {
                errors.push(Violation::new(
                    "pension_contribution_value",
                    ValidationRule::Range,
                    "Pension contribution percentage must be between 0 and 100",
                ));
            }
            Some(PensionContributionType::Amount) if self.pension_contribution_value < Decimal::ZERO => {
                errors.push(Violation::new(
                    "pension_contribution_value",
                    ValidationRule::NonNegative,
                    "Pension contribution amount cannot be negative",
                ));
            }
            Some(_) => {}
        }

        check_non_negative(&mut errors, "bonus_annual", "Bonus annual", self.bonus_annual);
        check_non_negative(
            &mut errors,
            "other_pretax_deductions",
            "Other pre-tax deductions",
            self.other_pretax_deductions,
        );
        errors
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct IncomeTaxResult {
    pub tax_year: String,
    #[serde(serialize_with = "serialize::money")]
    pub gross_annual: Money,
    #[serde(serialize_with = "serialize::money")]
    pub pension_contribution: Money,
    #[serde(serialize_with = "serialize::money")]
    pub other_pretax_deductions: Money,
    #[serde(serialize_with = "serialize::money")]
    pub adjusted_income: Money,
    #[serde(serialize_with = "serialize::money")]
    pub personal_allowance: Money,
    #[serde(serialize_with = "serialize::money")]
    pub taxable_income: Money,
    #[serde(serialize_with = "serialize::money")]
    pub income_tax_annual: Money,
    pub income_tax_bands: Vec<BandBreakdown>,
    #[serde(serialize_with = "serialize::money")]
    pub ni_annual: Money,
    pub ni_bands: Vec<BandBreakdown>,
    #[serde(serialize_with = "serialize::money")]
    pub student_loan_annual: Money,
    #[serde(serialize_with = "serialize::money")]
    pub total_deductions: Money,
    #[serde(serialize_with = "serialize::rate")]
    pub effective_deduction_rate: Rate,
    #[serde(serialize_with = "serialize::money")]
    pub net_annual: Money,
    #[serde(serialize_with = "serialize::money")]
    pub net_monthly: Money,
    #[serde(serialize_with = "serialize::money")]
    pub net_weekly: Money,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

pub fn calculate_income_tax(
    input: &TaxCalculationInput,
    config: &TaxConfig,
) -> PersonalFinanceResult<ComputationOutput<IncomeTaxResult>> {
    let start = Instant::now();
    into_result("income_tax", input.validate())?;

    let cfg = config.tax_year(&input.tax_year)?;
    let frequency = PayFrequency::from_tag(&input.pay_frequency).ok_or_else(|| {
        PersonalFinanceError::InvalidInput {
            field: "pay_frequency".into(),
            reason: format!("unrecognised tag '{}'", input.pay_frequency),
        }
    })?;
    let pension_type = PensionContributionType::from_tag(&input.pension_contribution_type)
        .ok_or_else(|| PersonalFinanceError::InvalidInput {
            field: "pension_contribution_type".into(),
            reason: format!("unrecognised tag '{}'", input.pension_contribution_type),
        })?;

    info!(
        tax_year = %input.tax_year,
        jurisdiction = %input.tax_jurisdiction,
        frequency = %input.pay_frequency,
        "starting income tax calculation"
    );

    let gross_annual = input
        .gross_income
        .checked_mul(frequency.periods())
        .and_then(|annual| annual.checked_add(input.bonus_annual))
        .ok_or_else(|| overflow("gross annual income"))?;

    let pension_contribution = match pension_type {
        PensionContributionType::None => Decimal::ZERO,
        PensionContributionType::Percentage => {
            gross_annual * (input.pension_contribution_value / dec!(100))
        }
        PensionContributionType::Amount => input.pension_contribution_value,
    }
    .min(gross_annual);

    let adjusted_income =
        (gross_annual - pension_contribution - input.other_pretax_deductions).max(Decimal::ZERO);

    let personal_allowance = tapered_allowance(adjusted_income, cfg);
    let taxable_income = (adjusted_income - personal_allowance).max(Decimal::ZERO);
    let (income_tax_annual, income_tax_bands) =
        apply_bands(taxable_income, cfg.bands(&input.tax_jurisdiction)?);

    let ni_rates = cfg.ni.category(&input.ni_category)?;
    let (ni_annual, ni_band_rows) = apply_bands(adjusted_income, &ni_bands(&cfg.ni.thresholds, ni_rates));

    let student_loan_annual = if input.student_loan_plan == "none" {
        Decimal::ZERO
    } else {
        let plan = cfg.student_loan_plan(&input.student_loan_plan)?;
        (adjusted_income - plan.threshold).max(Decimal::ZERO) * plan.rate
    };

    let total_deductions = income_tax_annual
        .checked_add(ni_annual)
        .and_then(|sum| sum.checked_add(student_loan_annual))
        .ok_or_else(|| overflow("total deductions"))?;
    let net_annual = (gross_annual - pension_contribution)
        .checked_sub(input.other_pretax_deductions)
        .and_then(|net| net.checked_sub(total_deductions))
        .ok_or_else(|| overflow("net annual pay"))?;
    let effective_deduction_rate = if gross_annual.is_zero() {
        Decimal::ZERO
    } else {
        total_deductions / gross_annual
    };

    let output = IncomeTaxResult {
        tax_year: input.tax_year.clone(),
        gross_annual,
        pension_contribution,
        other_pretax_deductions: input.other_pretax_deductions,
        adjusted_income,
        personal_allowance,
        taxable_income,
        income_tax_annual,
        income_tax_bands,
        ni_annual,
        ni_bands: ni_band_rows,
        student_loan_annual,
        total_deductions,
        effective_deduction_rate,
        net_annual,
        net_monthly: net_annual / dec!(12),
        net_weekly: net_annual / dec!(52),
    };

    let mut warnings = Vec::new();
    if net_annual < Decimal::ZERO {
        warnings.push("Deductions exceed gross pay; net pay is negative".to_string());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "UK PAYE: tapered personal allowance, banded income tax, employee Class 1 NI, student loan",
        &json!({
            "tax_year": input.tax_year,
            "jurisdiction": input.tax_jurisdiction,
            "ni_category": input.ni_category,
            "student_loan_plan": input.student_loan_plan,
            "ni_and_student_loan_basis": "adjusted income after pension and pre-tax deductions",
        }),
        warnings,
        elapsed,
        output,
    ))
}
