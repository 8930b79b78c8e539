use serde_json::Value;

use super::{flatten, format_value};

/// Print just the key answer value from the output.
///
/// Looks for well-known fields in priority order (nested ones by their
/// dotted path), then falls back to the first scalar in the result.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "state.installment",
        "final_state.installment",
        "installment",
        "saving",
        "state.principal",
    ];

    if let Value::Object(map) = result_obj {
        let flat = flatten(map);

        for key in &priority_keys {
            if let Some((_, val)) = flat.iter().find(|(k, _)| k == key) {
                if !val.is_null() {
                    println!("{}", format_value(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = flat.iter().find(|(_, v)| !v.is_array()) {
            println!("{}: {}", key, format_value(val));
            return;
        }
    }

    println!("{}", format_value(result_obj));
}
