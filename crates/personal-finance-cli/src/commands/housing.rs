use personal_finance_core::rent_vs_buy::{calculate_rent_vs_buy, RentVsBuyInput};
use personal_finance_core::serialize::to_json;

use super::{read_payload, CommandResult, InputArgs};

pub fn run_rent_vs_buy(args: &InputArgs) -> CommandResult {
    let input: RentVsBuyInput = read_payload(args)?;
    let output = calculate_rent_vs_buy(&input)?;
    to_json(&output)
}
