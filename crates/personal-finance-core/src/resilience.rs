//! Financial resilience index: a 0-100 blend of savings depth, income
//! stability, debt load and insurance coverage.

use std::time::Instant;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::error::{PersonalFinanceError, Violation};
use crate::serialize;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::validation::{check_non_negative, check_score, into_result};
use crate::PersonalFinanceResult;

/// Liquid savings that earn a full savings sub-score.
pub const SAVINGS_BENCHMARK: Money = dec!(10000);

const SAVINGS_WEIGHT: Decimal = dec!(0.30);
const STABILITY_WEIGHT: Decimal = dec!(0.30);
const DEBT_WEIGHT: Decimal = dec!(0.20);
const INSURANCE_WEIGHT: Decimal = dec!(0.20);

/// Sub-scores below this are reported as weak points.
const WEAK_POINT_THRESHOLD: Decimal = dec!(50);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResilienceScoreInput {
    pub savings: Money,
    /// Self-assessed, 0-100.
    pub income_stability: i64,
    pub debt_load: Money,
    /// Self-assessed, 0-100.
    pub insurance_coverage: i64,
}

impl ResilienceScoreInput {
    pub fn validate(&self) -> Vec<Violation> {
        let mut errors = Vec::new();
        check_non_negative(&mut errors, "savings", "Savings", self.savings);
        check_non_negative(&mut errors, "debt_load", "Debt load", self.debt_load);
        check_score(&mut errors, "income_stability", "Income stability", self.income_stability);
        check_score(&mut errors, "insurance_coverage", "Insurance coverage", self.insurance_coverage);
        errors
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResilienceBand {
    Strong,
    Moderate,
    Fragile,
}

impl ResilienceBand {
    fn from_index(index: u32) -> Self {
        match index {
            75.. => ResilienceBand::Strong,
            50..=74 => ResilienceBand::Moderate,
            _ => ResilienceBand::Fragile,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ResilienceBand::Strong => "strong",
            ResilienceBand::Moderate => "moderate",
            ResilienceBand::Fragile => "fragile",
        }
    }
}

/// Each component on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResilienceSubScores {
    #[serde(serialize_with = "serialize::rate")]
    pub savings: Decimal,
    #[serde(serialize_with = "serialize::rate")]
    pub income_stability: Decimal,
    #[serde(serialize_with = "serialize::rate")]
    pub debt_load: Decimal,
    #[serde(serialize_with = "serialize::rate")]
    pub insurance_coverage: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResilienceScoreResult {
    pub resilience_index: u32,
    pub sub_scores: ResilienceSubScores,
    pub weak_points: Vec<String>,
    pub band: ResilienceBand,
    pub summary: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn clamp_score(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO).min(dec!(100))
}

/// Debt as a percentage of savings. All debt and no savings is 100; a ratio
/// past the `Decimal` range saturates, which still scores zero.
fn debt_ratio(debt: Money, savings: Money) -> Decimal {
    if savings.is_zero() {
        if debt.is_zero() {
            Decimal::ZERO
        } else {
            dec!(100)
        }
    } else {
        debt.checked_div(savings)
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .unwrap_or(Decimal::MAX)
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

pub fn calculate_resilience_score(
    input: &ResilienceScoreInput,
) -> PersonalFinanceResult<ComputationOutput<ResilienceScoreResult>> {
    let start = Instant::now();
    into_result("resilience", input.validate())?;

    let sub_scores = ResilienceSubScores {
        savings: clamp_score(input.savings / SAVINGS_BENCHMARK * dec!(100)),
        income_stability: clamp_score(Decimal::from(input.income_stability)),
        debt_load: clamp_score(dec!(100) - debt_ratio(input.debt_load, input.savings)),
        insurance_coverage: clamp_score(Decimal::from(input.insurance_coverage)),
    };

    let blended = SAVINGS_WEIGHT * sub_scores.savings
        + STABILITY_WEIGHT * sub_scores.income_stability
        + DEBT_WEIGHT * sub_scores.debt_load
        + INSURANCE_WEIGHT * sub_scores.insurance_coverage;
    let resilience_index = blended
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .ok_or_else(|| PersonalFinanceError::InvalidInput {
            field: "resilience_index".into(),
            reason: format!("blended score {blended} is outside 0-100"),
        })?;

    let weak_points: Vec<String> = [
        ("savings", sub_scores.savings),
        ("income_stability", sub_scores.income_stability),
        ("debt_load", sub_scores.debt_load),
        ("insurance_coverage", sub_scores.insurance_coverage),
    ]
    .into_iter()
    .filter(|(_, score)| *score < WEAK_POINT_THRESHOLD)
    .map(|(name, _)| name.to_string())
    .collect();

    let band = ResilienceBand::from_index(resilience_index);
    let mut summary = format!(
        "Your financial resilience is {} ({resilience_index}/100).",
        band.label()
    );
    if !weak_points.is_empty() {
        summary.push_str(&format!(
            " Areas to strengthen: {}.",
            weak_points
                .iter()
                .map(|p| p.replace('_', " "))
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    info!(resilience_index, band = band.label(), "resilience score computed");

    let output = ResilienceScoreResult {
        resilience_index,
        sub_scores,
        weak_points,
        band,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Resilience index: weighted blend of savings, income stability, inverted debt ratio and insurance",
        &json!({
            "savings_benchmark": SAVINGS_BENCHMARK.to_string(),
            "weights": { "savings": "0.30", "income_stability": "0.30", "debt_load": "0.20", "insurance_coverage": "0.20" },
            "weak_point_threshold": 50,
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(savings: Money, stability: i64, debt: Money, insurance: i64) -> ResilienceScoreResult {
        calculate_resilience_score(&ResilienceScoreInput {
            savings,
            income_stability: stability,
            debt_load: debt,
            insurance_coverage: insurance,
        })
        .unwrap()
        .result
    }

    // ---------------------------------------------------------------
    // 1. Blend and bands
    // ---------------------------------------------------------------
    #[test]
    fn test_moderate_profile() {
        let r = score(dec!(5000), 80, dec!(1000), 60);
        assert_eq!(r.sub_scores.savings, dec!(50));
        assert_eq!(r.sub_scores.debt_load, dec!(80));
        assert_eq!(r.resilience_index, 67);
        assert_eq!(r.band, ResilienceBand::Moderate);
        assert!(r.weak_points.is_empty());
    }

    #[test]
    fn test_strong_profile_clamped() {
        let r = score(dec!(20000), 100, Decimal::ZERO, 100);
        assert_eq!(r.sub_scores.savings, dec!(100));
        assert_eq!(r.resilience_index, 100);
        assert_eq!(r.band, ResilienceBand::Strong);
    }

    #[test]
    fn test_fragile_profile_weak_points() {
        let r = score(Decimal::ZERO, 40, dec!(500), 100);
        assert_eq!(r.sub_scores.debt_load, Decimal::ZERO);
        assert_eq!(r.resilience_index, 32);
        assert_eq!(r.band, ResilienceBand::Fragile);
        assert_eq!(r.weak_points, vec!["savings", "income_stability", "debt_load"]);
        assert!(r.summary.ends_with("Areas to strengthen: savings, income stability, debt load."));
    }

    #[test]
    fn test_heavy_debt_clamps_at_zero() {
        let r = score(dec!(1000), 50, dec!(5000), 50);
        assert_eq!(r.sub_scores.debt_load, Decimal::ZERO);
    }

    #[test]
    fn test_debt_ratio_past_decimal_range_scores_zero() {
        let r = score(dec!(0.0000000000000000000000000001), 50, dec!(100000000000000000000), 50);
        assert_eq!(r.sub_scores.debt_load, Decimal::ZERO);
        assert_eq!(r.resilience_index, 25);
    }

    // ---------------------------------------------------------------
    // 2. Rounding is half-up
    // ---------------------------------------------------------------
    #[test]
    fn test_half_rounds_up() {
        // 0.3*10 + 0.3*45 + 0.2*100 + 0.2*0 = 36.5
        let r = score(dec!(1000), 45, Decimal::ZERO, 0);
        assert_eq!(r.resilience_index, 37);
    }

    #[test]
    fn test_no_savings_no_debt() {
        let r = score(Decimal::ZERO, 0, Decimal::ZERO, 0);
        assert_eq!(r.sub_scores.debt_load, dec!(100));
        assert_eq!(r.resilience_index, 20);
    }

    // ---------------------------------------------------------------
    // 3. Validation
    // ---------------------------------------------------------------
    #[test]
    fn test_validation_messages() {
        let input = ResilienceScoreInput {
            savings: dec!(-1),
            income_stability: 120,
            debt_load: dec!(-1),
            insurance_coverage: -5,
        };
        let messages: Vec<String> = input.validate().into_iter().map(|v| v.message).collect();
        assert_eq!(
            messages,
            vec![
                "Savings: Value cannot be negative".to_string(),
                "Debt load: Value cannot be negative".to_string(),
                "Income stability: Score must be between 0 and 100".to_string(),
                "Insurance coverage: Score must be between 0 and 100".to_string(),
            ]
        );
    }
}
