use personal_finance_core::emergency_fund::{calculate_emergency_fund, EmergencyFundInput};
use personal_finance_core::freedom::{calculate_time_to_freedom, TimeToFreedomInput};
use personal_finance_core::resilience::{calculate_resilience_score, ResilienceScoreInput};
use personal_finance_core::serialize::to_json;

use super::{read_payload, CommandResult, InputArgs};

pub fn run_emergency_fund(args: &InputArgs) -> CommandResult {
    let input: EmergencyFundInput = read_payload(args)?;
    to_json(&calculate_emergency_fund(&input)?)
}

pub fn run_resilience_score(args: &InputArgs) -> CommandResult {
    let input: ResilienceScoreInput = read_payload(args)?;
    to_json(&calculate_resilience_score(&input)?)
}

pub fn run_time_to_freedom(args: &InputArgs) -> CommandResult {
    let input: TimeToFreedomInput = read_payload(args)?;
    to_json(&calculate_time_to_freedom(&input)?)
}
