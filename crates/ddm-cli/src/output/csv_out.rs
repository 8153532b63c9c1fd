use serde_json::Value;
use std::io;

use super::split_periods;

/// Write CSV to stdout: one row per period when the result has a period
/// table, otherwise `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match split_periods(value) {
        (Some(rows), _) => {
            if let Some(Value::Object(first)) = rows.first() {
                let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
                let _ = wtr.write_record(&headers);
                for row in rows.iter().filter_map(|r| r.as_object()) {
                    let cells: Vec<String> = headers
                        .iter()
                        .map(|h| row.get(*h).map(format_csv_value).unwrap_or_default())
                        .collect();
                    let _ = wtr.write_record(&cells);
                }
            }
        }
        (None, scalars) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in scalars {
                let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
            }
        }
    }

    let _ = wtr.flush();
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
