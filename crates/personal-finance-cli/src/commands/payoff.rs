use personal_finance_core::payoff::{calculate_payoff_scenarios, CalculatorInput};
use personal_finance_core::serialize::to_json;
use personal_finance_core::TaxConfig;

use super::{read_payload, CommandResult, InputArgs};

pub fn run_payoff(args: &InputArgs, config: &TaxConfig) -> CommandResult {
    let input: CalculatorInput = read_payload(args)?;
    let output = calculate_payoff_scenarios(&input, config)?;
    to_json(&output)
}
