use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::input::CalculatorInput;
use super::steps::{statutory_repayment, step_investment, step_loan_balance};
use crate::config::TaxConfig;
use crate::error::overflow;
use crate::serialize;
use crate::types::{Money, Percent, Rate};
use crate::PersonalFinanceResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One internally consistent set of economic assumptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioType {
    Optimistic,
    Pessimistic,
    Realistic,
}

impl ScenarioType {
    pub const ALL: [ScenarioType; 3] = [
        ScenarioType::Optimistic,
        ScenarioType::Pessimistic,
        ScenarioType::Realistic,
    ];
}

impl std::fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ScenarioType::Optimistic => "optimistic",
            ScenarioType::Pessimistic => "pessimistic",
            ScenarioType::Realistic => "realistic",
        };
        f.write_str(label)
    }
}

/// Effective rates for one scenario, in percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioRates {
    pub investment: Percent,
    pub loan: Percent,
    pub salary_growth: Percent,
}

impl ScenarioRates {
    /// Optimistic pairs high growth with low interest, pessimistic the
    /// reverse. Realistic takes the average/current inputs for growth and
    /// interest but derives salary growth as the midpoint.
    pub fn select(input: &CalculatorInput, scenario: ScenarioType) -> Self {
        match scenario {
            ScenarioType::Optimistic => Self {
                investment: input.investment_growth_high,
                loan: input.loan_interest_low,
                salary_growth: input.salary_growth_optimistic,
            },
            ScenarioType::Pessimistic => Self {
                investment: input.investment_growth_low,
                loan: input.loan_interest_high,
                salary_growth: input.salary_growth_pessimistic,
            },
            ScenarioType::Realistic => Self {
                investment: input.investment_growth_average,
                loan: input.loan_interest_current,
                salary_growth: (input.salary_growth_optimistic + input.salary_growth_pessimistic)
                    / dec!(2),
            },
        }
    }
}

/// Statutory repayment terms applied identically in every scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepaymentPlan {
    pub threshold: Money,
    pub rate: Rate,
}

impl RepaymentPlan {
    pub fn from_config(config: &TaxConfig) -> Self {
        let plan = config.payoff_plan();
        Self {
            threshold: plan.repayment_threshold_2023,
            rate: plan.repayment_rate,
        }
    }
}

/// Start-of-year state plus the year's flows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyProjection {
    pub year: i32,
    #[serde(serialize_with = "serialize::money")]
    pub loan_balance: Money,
    #[serde(serialize_with = "serialize::money")]
    pub investment_value: Money,
    #[serde(serialize_with = "serialize::money")]
    pub annual_repayment: Money,
    #[serde(serialize_with = "serialize::money")]
    pub interest_accrued: Money,
    #[serde(serialize_with = "serialize::money")]
    pub investment_growth: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioProjection {
    pub scenario_type: ScenarioType,
    #[serde(serialize_with = "serialize::rate")]
    pub investment_growth_rate: Percent,
    #[serde(serialize_with = "serialize::rate")]
    pub loan_interest_rate: Percent,
    #[serde(serialize_with = "serialize::rate")]
    pub salary_growth_rate: Percent,
    pub yearly_data: Vec<YearlyProjection>,
    /// Sum of every annual repayment.
    #[serde(serialize_with = "serialize::money")]
    pub total_loan_cost: Money,
    #[serde(serialize_with = "serialize::money")]
    pub final_investment_value: Money,
    /// First year the grown investment exceeds cumulative repayments.
    pub crossover_year: Option<i32>,
    /// `final_investment_value - total_loan_cost`.
    #[serde(serialize_with = "serialize::money")]
    pub net_benefit: Money,
    /// Balance left after the last simulated year.
    #[serde(serialize_with = "serialize::money")]
    pub closing_loan_balance: Money,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Run one scenario from `current_year` through `loan_end_year` inclusive.
///
/// The investment compounds from the initial lump sum only; no annual
/// contribution is added. An inverted horizon yields an empty projection.
///
/// The projection stops early once the balance reaches exactly zero. With
/// 28 decimal places a small residual balance can round to zero years before
/// it would on paper, so `yearly_data.len()` is not the loan horizon; use
/// [`CalculatorInput::loan_end_year`] for that.
///
/// Fails with an overflow error when a balance, income or investment value
/// leaves the `Decimal` range.
pub fn project_scenario(
    input: &CalculatorInput,
    scenario: ScenarioType,
    plan: &RepaymentPlan,
) -> PersonalFinanceResult<ScenarioProjection> {
    let rates = ScenarioRates::select(input, scenario);
    let salary_multiplier = Decimal::ONE + rates.salary_growth / dec!(100);

    let mut loan_balance = input.initial_loan_balance;
    let mut investment_value = input.investment_amount;
    let mut income = input.pre_tax_income;
    let mut total_loan_cost = Decimal::ZERO;
    let mut crossover_year = None;

    let horizon = (input.loan_end_year() - input.current_year + 1).max(0) as usize;
    let mut yearly_data = Vec::with_capacity(horizon);

    for year in input.current_year..=input.loan_end_year() {
        let annual_repayment = statutory_repayment(income, loan_balance, plan.threshold, plan.rate)?;
        let (new_balance, interest_accrued) =
            step_loan_balance(loan_balance, annual_repayment, rates.loan)?;
        let (new_investment, investment_growth) = step_investment(investment_value, rates.investment)?;

        total_loan_cost = total_loan_cost
            .checked_add(annual_repayment)
            .ok_or_else(|| overflow("cumulative loan cost"))?;
        if crossover_year.is_none() && new_investment > total_loan_cost {
            crossover_year = Some(year);
        }

        yearly_data.push(YearlyProjection {
            year,
            loan_balance,
            investment_value,
            annual_repayment,
            interest_accrued,
            investment_growth,
        });

        loan_balance = new_balance;
        investment_value = new_investment;

        if loan_balance.is_zero() {
            break;
        }
        income = income
            .checked_mul(salary_multiplier)
            .ok_or_else(|| overflow("salary growth"))?;
    }

    Ok(ScenarioProjection {
        scenario_type: scenario,
        investment_growth_rate: rates.investment,
        loan_interest_rate: rates.loan,
        salary_growth_rate: rates.salary_growth,
        yearly_data,
        total_loan_cost,
        final_investment_value: investment_value,
        crossover_year,
        net_benefit: investment_value - total_loan_cost,
        closing_loan_balance: loan_balance,
    })
}
