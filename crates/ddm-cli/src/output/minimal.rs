use serde_json::Value;

use super::split_periods;

/// Headline figure for each command, in priority order.
const HEADLINE_KEYS: [&str; 7] = [
    "intrinsic_value",
    "total_present_value",
    "leading_pe",
    "sustainable_growth",
    "present_value",
    "discount_factor",
    "terminal_value",
];

/// Print just the headline value, or one rate per line for a bare curve.
pub fn print_minimal(value: &Value) {
    let (periods, scalars) = split_periods(value);

    for key in HEADLINE_KEYS {
        if let Some((_, val)) = scalars.iter().find(|(k, v)| k.as_str() == key && !v.is_null()) {
            println!("{}", format_minimal(val));
            return;
        }
    }

    if let Some(rows) = periods {
        for row in rows {
            if let Some(rate) = row.get("rate") {
                println!("{}", format_minimal(rate));
            }
        }
        return;
    }

    if let Some((key, val)) = scalars.first() {
        println!("{}: {}", key, format_minimal(val));
    }
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
