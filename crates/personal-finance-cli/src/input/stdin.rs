use serde_json::Value;
use std::io::{self, Read};

use personal_finance_core::{PersonalFinanceError, PersonalFinanceResult};

/// JSON piped on stdin, or `None` when stdin is a terminal or empty.
pub fn read_stdin() -> PersonalFinanceResult<Option<Value>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| PersonalFinanceError::MalformedInput(format!("Failed to read stdin: {e}")))?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| PersonalFinanceError::MalformedInput(format!("Failed to parse stdin: {e}")))
}
