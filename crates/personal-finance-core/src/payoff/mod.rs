//! Student loan: pay it off early, or invest instead?
//!
//! Validates a [`CalculatorInput`], projects the loan and a lump-sum
//! investment year by year under three scenarios, then recommends a strategy
//! from the realistic outcome and the optimistic/pessimistic spread.

pub mod input;
pub mod projection;
pub mod recommendation;
pub mod steps;

use std::time::Instant;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

pub use input::CalculatorInput;
pub use projection::{
    project_scenario, RepaymentPlan, ScenarioProjection, ScenarioRates, ScenarioType,
    YearlyProjection,
};
pub use recommendation::{generate_recommendation, Confidence, Decision, PayoffRecommendation};
pub use steps::{statutory_repayment, step_investment, step_loan_balance};

use crate::config::TaxConfig;
use crate::types::{with_metadata, ComputationOutput};
use crate::validation::into_result;
use crate::PersonalFinanceResult;

/// All three projections plus the recommendation.
#[derive(Debug, Clone, Serialize)]
pub struct CalculationResult {
    pub optimistic: ScenarioProjection,
    pub pessimistic: ScenarioProjection,
    pub realistic: ScenarioProjection,
    pub recommendation: PayoffRecommendation,
    pub calculated_at: DateTime<Utc>,
}

/// Validate, project every scenario, and recommend.
///
/// Any validation failure aborts before a single year is projected.
pub fn calculate_payoff_scenarios(
    input: &CalculatorInput,
    config: &TaxConfig,
) -> PersonalFinanceResult<ComputationOutput<CalculationResult>> {
    let start = Instant::now();
    into_result("payoff", input.validate())?;

    info!(
        age = input.age,
        duration = input.loan_duration_years,
        scenarios = ScenarioType::ALL.len(),
        "starting payoff calculation"
    );

    let plan = RepaymentPlan::from_config(config);
    let [optimistic, pessimistic, realistic] =
        ScenarioType::ALL.map(|scenario| project_scenario(input, scenario, &plan));
    let (optimistic, pessimistic, realistic) = (optimistic?, pessimistic?, realistic?);

    let mut warnings: Vec<String> = Vec::new();
    for projection in [&optimistic, &pessimistic, &realistic] {
        debug!(
            scenario = %projection.scenario_type,
            years = projection.yearly_data.len(),
            total_loan_cost = %projection.total_loan_cost,
            crossover_year = ?projection.crossover_year,
            "scenario projected"
        );
        if projection.closing_loan_balance > Decimal::ZERO {
            warnings.push(format!(
                "{} scenario: loan is not cleared by {}; the remaining balance is written off",
                projection.scenario_type,
                input.loan_end_year()
            ));
        }
    }
    if realistic.crossover_year.is_none() {
        warnings.push(
            "Realistic scenario: the investment never overtakes cumulative loan repayments".into(),
        );
    }
    if realistic.total_loan_cost.is_zero() {
        warnings.push(
            "No loan repayments are projected; confidence cannot be measured and is reported as low"
                .into(),
        );
    }

    let recommendation = generate_recommendation(&optimistic, &pessimistic, &realistic)?;
    info!(
        decision = ?recommendation.decision,
        confidence = ?recommendation.confidence,
        "payoff calculation completed"
    );

    let output = CalculationResult {
        optimistic,
        pessimistic,
        realistic,
        recommendation,
        calculated_at: Utc::now(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Loan payoff vs invest: three-scenario annual projection with statutory repayment",
        &json!({
            "repayment_threshold": plan.threshold.to_string(),
            "repayment_rate": plan.rate.to_string(),
            "projection_years": format!("{}..={}", input.current_year, input.loan_end_year()),
            "annual_contributions": "none; the initial investment compounds alone",
        }),
        warnings,
        elapsed,
        output,
    ))
}
