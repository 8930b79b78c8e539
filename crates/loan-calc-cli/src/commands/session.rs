use clap::Args;
use serde_json::Value;

use loan_calc_core::session::{self, SessionInput};
use loan_calc_core::LoanEngine;

use crate::input;

/// Arguments for replaying an edit session
#[derive(Args)]
pub struct SessionArgs {
    /// Path to JSON file with `edits` (and optional `initial_state`)
    #[arg(long)]
    pub input: Option<String>,

    /// Leave the final principal and term uncommitted
    #[arg(long)]
    pub no_commit: bool,
}

pub fn run_session(args: SessionArgs, engine: &LoanEngine) -> Result<Value, Box<dyn std::error::Error>> {
    let mut session_input: SessionInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else {
        input::stdin::read_stdin()?
            .ok_or("Session replay requires --input or JSON on stdin")?
    };

    if args.no_commit {
        session_input.commit_on_finish = false;
    }

    let result = session::replay_session(engine, &session_input)?;
    Ok(serde_json::to_value(result)?)
}
