use personal_finance_core::income_tax::{calculate_income_tax, TaxCalculationInput};
use personal_finance_core::serialize::to_json;
use personal_finance_core::TaxConfig;

use super::{read_payload, CommandResult, InputArgs};

pub fn run_income_tax(args: &InputArgs, config: &TaxConfig) -> CommandResult {
    let input: TaxCalculationInput = read_payload(args)?;
    let output = calculate_income_tax(&input, config)?;
    to_json(&output)
}
