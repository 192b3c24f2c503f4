use serde_json::Value;

/// Fields that answer each calculator's headline question, in priority order.
const PRIORITY_KEYS: [&str; 7] = [
    "resilience_index",
    "years_to_freedom",
    "net_annual",
    "savings_gap",
    "break_even_year",
    "status",
    "summary",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_text(value));
}

/// The payoff decision, else the first non-null priority field, else the
/// first field of the result.
pub fn minimal_text(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(decision) = result_obj.pointer("/recommendation/decision") {
        return format_minimal(decision);
    }

    if let Value::Object(map) = result_obj {
        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    return format_minimal(val);
                }
            }
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    format_minimal(result_obj)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payoff_prints_decision() {
        let out = json!({ "result": { "recommendation": { "decision": "invest" }, "realistic": {} } });
        assert_eq!(minimal_text(&out), "invest");
    }

    #[test]
    fn test_null_priority_falls_through() {
        let out = json!({ "result": { "years_to_freedom": null, "summary": "Not reached." } });
        assert_eq!(minimal_text(&out), "Not reached.");
    }

    #[test]
    fn test_health_has_no_envelope() {
        assert_eq!(minimal_text(&json!({ "status": "healthy" })), "healthy");
    }
}
