use serde_json::Value;
use std::time::Instant;

use loan_calc_core::{with_metadata, CollateralCategory, LoanEngine};

pub fn run_categories(engine: &LoanEngine) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let table = engine.table();

    let categories: Vec<Value> = CollateralCategory::ALL
        .iter()
        .map(|&category| {
            let terms = table.terms(category);
            serde_json::json!({
                "category": category,
                "annual_rate": terms.annual_rate,
                "min_principal": terms.amount_bounds.min,
                "max_principal": terms.amount_bounds.max,
                "min_term_years": terms.term_bounds.min,
                "max_term_years": terms.term_bounds.max,
            })
        })
        .collect();

    let config = engine.config();
    let output = with_metadata(
        "Collateral category table",
        &config.defaults,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        serde_json::json!({
            "categories": categories,
            "payment_bounds": config.payment_bounds,
        }),
    );
    Ok(serde_json::to_value(output)?)
}
