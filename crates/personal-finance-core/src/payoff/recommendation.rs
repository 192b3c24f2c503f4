use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::projection::ScenarioProjection;
use crate::error::overflow;
use crate::serialize::{self, currency_text, percent_text};
use crate::types::{Money, Percent};
use crate::PersonalFinanceResult;

/// Variance above this share of loan cost (percentage points) is low confidence.
const LOW_CONFIDENCE_VARIANCE_PCT: Percent = dec!(5);
/// Variance above this share of loan cost is medium confidence.
const MEDIUM_CONFIDENCE_VARIANCE_PCT: Percent = dec!(2);
/// Net benefit below this fraction of loan cost is a wash.
const NEUTRAL_FRACTION: Decimal = dec!(0.02);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    PayOffEarly,
    Invest,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoffRecommendation {
    pub decision: Decision,
    pub confidence: Confidence,
    pub rationale: String,
    /// Realistic net benefit; positive favours investing.
    #[serde(serialize_with = "serialize::money")]
    pub net_benefit_amount: Money,
    pub crossover_year: Option<i32>,
    /// Optimistic/pessimistic spread as a share of realistic loan cost.
    /// `None` when no repayments are projected.
    #[serde(serialize_with = "serialize::optional_rate")]
    pub variance_pct: Option<Percent>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Compare the three scenarios and decide between paying off and investing.
///
/// With a zero realistic loan cost the variance is undefined and confidence
/// falls to `Low`; a zero net benefit on top of that is `Neutral`.
pub fn generate_recommendation(
    optimistic: &ScenarioProjection,
    pessimistic: &ScenarioProjection,
    realistic: &ScenarioProjection,
) -> PersonalFinanceResult<PayoffRecommendation> {
    let loan_cost = realistic.total_loan_cost;
    let benefit = realistic.net_benefit;

    let variance_pct = if loan_cost.is_zero() {
        None
    } else {
        let spread = optimistic
            .net_benefit
            .checked_sub(pessimistic.net_benefit)
            .and_then(|spread| share_of(spread, loan_cost))
            .ok_or_else(|| overflow("scenario variance"))?;
        Some(spread.abs())
    };

    let confidence = match variance_pct {
        None => Confidence::Low,
        Some(v) if v > LOW_CONFIDENCE_VARIANCE_PCT => Confidence::Low,
        Some(v) if v > MEDIUM_CONFIDENCE_VARIANCE_PCT => Confidence::Medium,
        Some(_) => Confidence::High,
    };

    let decision = if benefit.abs() < loan_cost * NEUTRAL_FRACTION
        || (loan_cost.is_zero() && benefit.is_zero())
    {
        Decision::Neutral
    } else if benefit > Decimal::ZERO {
        Decision::Invest
    } else {
        Decision::PayOffEarly
    };

    let mut rationale = rationale_for(decision, benefit, loan_cost)?;
    match confidence {
        Confidence::Low => rationale.push_str(
            " However, there is significant uncertainty in these projections due to variable market conditions and interest rates.",
        ),
        Confidence::Medium => {
            rationale.push_str(" There is moderate uncertainty in these projections.")
        }
        Confidence::High => {}
    }

    Ok(PayoffRecommendation {
        decision,
        confidence,
        rationale,
        net_benefit_amount: benefit,
        crossover_year: realistic.crossover_year,
        variance_pct,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `amount` as percentage points of `loan_cost`; `None` past the `Decimal` range.
fn share_of(amount: Money, loan_cost: Money) -> Option<Percent> {
    amount.checked_div(loan_cost)?.checked_mul(dec!(100))
}

fn rationale_for(decision: Decision, benefit: Money, loan_cost: Money) -> PersonalFinanceResult<String> {
    let share = if loan_cost.is_zero() {
        "(no loan repayments are projected)".to_string()
    } else {
        let pct = share_of(benefit.abs(), loan_cost).ok_or_else(|| overflow("net benefit share"))?;
        format!("({}% of your total loan cost)", percent_text(pct))
    };

    let text = match decision {
        Decision::Neutral => "The financial difference between paying off early and investing is minimal \
            (less than 2% of your total loan cost). Either strategy works well. \
            Consider your risk tolerance and liquidity needs."
            .to_string(),
        Decision::Invest => format!(
            "Investing is the better strategy. You could save approximately {} {} \
             by investing rather than paying off early. \
             Your investment returns are projected to outpace your loan interest costs.",
            currency_text(benefit),
            share
        ),
        Decision::PayOffEarly => format!(
            "Paying off your loan early is the better strategy. You could save approximately {} {} \
             by paying off early rather than investing. \
             Your loan interest costs exceed projected investment returns.",
            currency_text(benefit.abs()),
            share
        ),
    };
    Ok(text)
}
