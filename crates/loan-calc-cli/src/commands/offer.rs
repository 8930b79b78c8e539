use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use loan_calc_core::offer::{self, CapacityInput, QuoteInput};
use loan_calc_core::{with_metadata, CollateralCategory, LoanEngine};

use super::CategoryArg;
use crate::input;

/// Arguments for pricing a loan
#[derive(Args)]
pub struct QuoteArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Collateral category
    #[arg(long, value_enum, default_value = "unsecured")]
    pub category: CategoryArg,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Term in years
    #[arg(long, alias = "years")]
    pub term_years: Option<Decimal>,
}

/// Arguments for sizing a loan from a monthly payment
#[derive(Args)]
pub struct CapacityArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Collateral category
    #[arg(long, value_enum, default_value = "unsecured")]
    pub category: CategoryArg,

    /// Affordable monthly installment
    #[arg(long, alias = "payment")]
    pub installment: Option<Decimal>,

    /// Term in years
    #[arg(long, alias = "years")]
    pub term_years: Option<Decimal>,
}

/// Arguments for comparing categories
#[derive(Args)]
pub struct CompareArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Decimal,

    /// Term in years
    #[arg(long, alias = "years")]
    pub term_years: Decimal,

    /// Category to compare from
    #[arg(long, value_enum, default_value = "unsecured")]
    pub from: CategoryArg,

    /// Category to compare to (all categories when omitted)
    #[arg(long, value_enum)]
    pub to: Option<CategoryArg>,
}

pub fn run_quote(args: QuoteArgs, engine: &LoanEngine) -> Result<Value, Box<dyn std::error::Error>> {
    let quote_input: QuoteInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if args.principal.is_none() && args.term_years.is_none() {
        input::stdin::read_stdin()?
            .ok_or("--principal and --term-years are required (or provide --input)")?
    } else {
        QuoteInput {
            category: args.category.into(),
            principal: args.principal
                .ok_or("--principal is required (or provide --input)")?,
            term_years: args.term_years
                .ok_or("--term-years is required (or provide --input)")?,
        }
    };

    let result = offer::quote_offer(engine, &quote_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_capacity(args: CapacityArgs, engine: &LoanEngine) -> Result<Value, Box<dyn std::error::Error>> {
    let capacity_input: CapacityInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if args.installment.is_none() && args.term_years.is_none() {
        input::stdin::read_stdin()?
            .ok_or("--installment and --term-years are required (or provide --input)")?
    } else {
        CapacityInput {
            category: args.category.into(),
            installment: args.installment
                .ok_or("--installment is required (or provide --input)")?,
            term_years: args.term_years
                .ok_or("--term-years is required (or provide --input)")?,
        }
    };

    let result = offer::borrowing_capacity(engine, &capacity_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(args: CompareArgs, engine: &LoanEngine) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let from: CollateralCategory = args.from.into();
    let state = engine.quote(from, args.principal, args.term_years)?;

    let result = match args.to {
        Some(to) => {
            let to: CollateralCategory = to.into();
            let saving = engine.comparative_saving(&state, from, to)?;
            serde_json::json!({
                "from": from,
                "to": to,
                "principal": args.principal,
                "term_years": args.term_years,
                "saving": saving,
            })
        }
        None => serde_json::json!({
            "principal": args.principal,
            "term_years": args.term_years,
            "offers": engine.compare_offers(&state)?,
        }),
    };

    let output = with_metadata(
        "Installment difference at equal principal and term",
        &serde_json::json!({ "baseline": from }),
        Vec::new(),
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}
