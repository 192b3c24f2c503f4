use serde_json::{Map, Value};
use std::io;

/// Year-by-year series a calculator returns at the top of its result.
const SERIES_KEYS: [&str; 2] = ["graph_series", "timeline_series"];

/// Payoff scenarios, each carrying its own `yearly_data`.
const SCENARIO_KEYS: [&str; 3] = ["optimistic", "pessimistic", "realistic"];

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(value, stdout.lock()) {
        eprintln!("CSV output error: {e}");
    }
}

/// The primary series as rows when the result has one, otherwise a
/// two-column `field,value` listing.
pub fn write_csv<W: io::Write>(value: &Value, out: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            if let Some(rows) = series_rows(map) {
                write_rows(&mut wtr, &rows)?;
            } else {
                wtr.write_record(["field", "value"])?;
                for (key, val) in map {
                    wtr.write_record([key.as_str(), &format_csv_value(val)])?;
                }
            }
        }
        Value::Array(arr) => {
            let rows: Vec<Map<String, Value>> =
                arr.iter().filter_map(|v| v.as_object().cloned()).collect();
            write_rows(&mut wtr, &rows)?;
        }
        other => wtr.write_record([format_csv_value(other)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn series_rows(result: &Map<String, Value>) -> Option<Vec<Map<String, Value>>> {
    for key in SERIES_KEYS {
        if let Some(Value::Array(series)) = result.get(key) {
            return Some(series.iter().filter_map(|v| v.as_object().cloned()).collect());
        }
    }

    let mut rows = Vec::new();
    for scenario in SCENARIO_KEYS {
        let Some(Value::Array(years)) = result.get(scenario).and_then(|s| s.get("yearly_data")) else {
            continue;
        };
        for year in years.iter().filter_map(Value::as_object) {
            let mut row = Map::new();
            row.insert("scenario".into(), Value::String(scenario.into()));
            row.extend(year.clone());
            rows.push(row);
        }
    }
    (!rows.is_empty()).then_some(rows)
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Map<String, Value>]) -> csv::Result<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    // Scenario label leads; the rest keep their map order.
    let mut headers: Vec<&str> = Vec::with_capacity(first.len());
    if first.contains_key("scenario") {
        headers.push("scenario");
    }
    headers.extend(first.keys().map(String::as_str).filter(|k| *k != "scenario"));
    wtr.write_record(&headers)?;

    for row in rows {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(*h).map(format_csv_value).unwrap_or_default())
            .collect();
        wtr.write_record(&record)?;
    }
    Ok(())
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
