use colored::Colorize;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Format output as tables using the tabled crate.
///
/// Scalars of the result go in one field/value table; every nested object
/// (a scenario, a recommendation) and every list of rows (a yearly series,
/// a band breakdown) gets its own titled table after it.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_section(None, map);
            }
        }
        Value::Array(arr) => print_rows(None, arr),
        _ => println!("{value}"),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_section(None, res_map),
        other => println!("{other}"),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow().bold());
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}

fn print_section(title: Option<&str>, map: &Map<String, Value>) {
    if let Some(title) = title {
        println!("\n{}", title.bold());
    }

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if !is_nested(val) {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
    }
    println!("{}", Table::from(builder));

    for (key, val) in map {
        let heading = match title {
            Some(t) => format!("{t} / {key}"),
            None => key.clone(),
        };
        match val {
            Value::Object(inner) => print_section(Some(&heading), inner),
            Value::Array(rows) if is_row_list(rows) => print_rows(Some(&heading), rows),
            _ => {}
        }
    }
}

fn print_rows(title: Option<&str>, arr: &[Value]) {
    if let Some(title) = title {
        println!("\n{}", title.bold());
    }
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            println!("{}", format_value(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}

fn is_row_list(arr: &[Value]) -> bool {
    arr.first().is_some_and(Value::is_object)
}

fn is_nested(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(arr) => is_row_list(arr),
        _ => false,
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_values_kept_out_of_scalar_table() {
        assert!(is_nested(&json!({ "decision": "invest" })));
        assert!(is_nested(&json!([{ "year": 1 }])));
        assert!(!is_nested(&json!(["savings", "debt_load"])));
        assert!(!is_nested(&json!([])));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&Value::Null), "-");
        assert_eq!(format_value(&json!(["savings", "debt_load"])), "savings, debt_load");
        assert_eq!(format_value(&json!(1593.45)), "1593.45");
    }
}
