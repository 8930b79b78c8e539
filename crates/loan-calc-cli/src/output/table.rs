use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten, format_value};

/// Format output as tables using the tabled crate.
///
/// Scalars (including nested objects such as `state`) go into one
/// Field/Value table; every array of objects (`offers`, `steps`) gets a
/// table of its own underneath.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => {
                print_object(result);
                print_footer(map);
            }
            _ => print_object(map),
        },
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut sections = Vec::new();

    for (key, val) in flatten(map) {
        match val {
            Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
                sections.push((key, items));
            }
            other => {
                builder.push_record([key, format_array_or_scalar(&other)]);
            }
        }
    }

    println!("{}", Table::from(builder));

    for (title, items) in sections {
        println!("\n{}:", title);
        print_array_table(&items);
    }
}

fn print_footer(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                println!("  - {}", format_value(w));
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = flatten(first).into_iter().map(|(k, _)| k).collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let flat = flatten(map);
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        flat.iter()
                            .find(|(k, _)| k == h)
                            .map(|(_, v)| format_array_or_scalar(v))
                            .unwrap_or_default()
                    })
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_array_or_scalar(value: &Value) -> String {
    match value {
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        other => format_value(other),
    }
}
