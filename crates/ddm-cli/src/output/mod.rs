pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Split a result object into its per-period rows and its scalar fields.
///
/// Accepts either a computation envelope (`{"result": {...}}`) or a bare object.
pub fn split_periods(value: &Value) -> (Option<&Vec<Value>>, Vec<(&String, &Value)>) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            let periods = map.get("periods").and_then(|p| p.as_array());
            let scalars = map.iter().filter(|(k, _)| k.as_str() != "periods").collect();
            (periods, scalars)
        }
        _ => (None, Vec::new()),
    }
}
