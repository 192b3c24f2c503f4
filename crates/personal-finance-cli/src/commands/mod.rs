pub mod health;
pub mod housing;
pub mod payoff;
pub mod payroll;
pub mod planning;

use clap::Args;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use personal_finance_core::serialize::parse_input;
use personal_finance_core::{PersonalFinanceError, PersonalFinanceResult};

use crate::input;

/// Where a calculator reads its JSON document from.
#[derive(Args)]
pub struct InputArgs {
    /// Path to JSON input file (reads piped stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

pub type CommandResult = PersonalFinanceResult<Value>;

/// Read the raw document and coerce it into the calculator's input type.
pub(crate) fn read_payload<T: DeserializeOwned>(args: &InputArgs) -> PersonalFinanceResult<T> {
    let raw = if let Some(ref path) = args.input {
        input::file::read_json_value(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err(PersonalFinanceError::MalformedInput(
            "no input provided; pass --input FILE or pipe JSON on stdin".into(),
        ));
    };
    parse_input(raw)
}

/// `{"errors": [...]}`, the body printed for any failed command.
pub fn error_body(err: &PersonalFinanceError) -> Value {
    json!({ "errors": err.messages() })
}

/// 2 for problems the caller can fix, 1 for configuration or computation faults.
pub fn exit_code(err: &PersonalFinanceError) -> i32 {
    if err.is_client_error() {
        2
    } else {
        1
    }
}
