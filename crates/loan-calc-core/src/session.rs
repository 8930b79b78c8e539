//! Edit sessions: one engine, one explicitly owned state, a stream of edits.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::warn;

use crate::analytics::AnalyticsRecord;
use crate::category::CollateralCategory;
use crate::engine::{LoanEngine, OfferComparison};
use crate::state::LoanState;
use crate::types::{with_metadata, ComputationOutput, Money, Years};
use crate::LoanCalcResult;

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

/// One user-facing event, as the presentation layer reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LoanEdit {
    SetCategory { category: CollateralCategory },
    SetPrincipal { value: Money },
    SetTermYears { value: Years },
    SetInstallment { value: Money },
    CommitPrincipal,
    CommitTermYears,
    CommitInstallment,
}

impl LoanEngine {
    /// Dispatch an edit to the matching operation.
    pub fn apply(&self, state: &LoanState, edit: &LoanEdit) -> LoanCalcResult<LoanState> {
        match edit {
            LoanEdit::SetCategory { category } => self.set_category(state, *category),
            LoanEdit::SetPrincipal { value } => self.set_principal(state, *value),
            LoanEdit::SetTermYears { value } => self.set_term_years(state, *value),
            LoanEdit::SetInstallment { value } => self.set_installment(state, *value),
            LoanEdit::CommitPrincipal => self.commit_principal(state),
            LoanEdit::CommitTermYears => self.commit_term_years(state),
            LoanEdit::CommitInstallment => self.commit_installment(state),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoanSession {
    engine: LoanEngine,
    state: LoanState,
}

impl LoanSession {
    /// Start from the engine's configured defaults.
    pub fn open(engine: LoanEngine) -> LoanCalcResult<Self> {
        let state = engine.open()?;
        Ok(LoanSession { engine, state })
    }

    /// Continue from a state produced earlier.
    pub fn resume(engine: LoanEngine, state: LoanState) -> Self {
        LoanSession { engine, state }
    }

    pub fn engine(&self) -> &LoanEngine {
        &self.engine
    }

    pub fn state(&self) -> &LoanState {
        &self.state
    }

    /// Apply an edit. On error the current state is left untouched.
    pub fn apply(&mut self, edit: &LoanEdit) -> LoanCalcResult<&LoanState> {
        self.state = self.engine.apply(&self.state, edit)?;
        Ok(&self.state)
    }

    /// Apply an edit, logging and discarding a rejection.
    pub fn apply_or_keep(&mut self, edit: &LoanEdit) -> &LoanState {
        if let Err(e) = self.apply(edit) {
            warn!(?edit, error = %e, "edit rejected, keeping previous state");
        }
        &self.state
    }

    pub fn analytics_record(&self) -> LoanCalcResult<AnalyticsRecord> {
        AnalyticsRecord::from_state(&self.state)
    }
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

/// A recorded list of edits to run against a fresh or resumed session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInput {
    /// Resume from this state instead of the configured defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_state: Option<LoanState>,
    pub edits: Vec<LoanEdit>,
    /// Commit principal and term after the last edit.
    #[serde(default = "default_true")]
    pub commit_on_finish: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStep {
    pub index: usize,
    pub edit: LoanEdit,
    pub accepted: bool,
    pub state: LoanState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOutput {
    pub steps: Vec<SessionStep>,
    pub final_state: LoanState,
    pub settled: bool,
    pub offers: Vec<OfferComparison>,
    pub analytics: AnalyticsRecord,
}

/// Replay edits in order. Rejected edits are reported as warnings and leave
/// the state as it was.
pub fn replay_session(
    engine: &LoanEngine,
    input: &SessionInput,
) -> LoanCalcResult<ComputationOutput<SessionOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let mut session = match input.initial_state {
        Some(state) => LoanSession::resume(engine.clone(), state),
        None => LoanSession::open(engine.clone())?,
    };

    let mut steps = Vec::with_capacity(input.edits.len());
    for (index, edit) in input.edits.iter().enumerate() {
        let (accepted, rejection) = match session.apply(edit) {
            Ok(_) => (true, None),
            Err(e) => {
                warn!(index, ?edit, error = %e, "edit rejected during replay");
                warnings.push(format!("Edit {index} rejected: {e}"));
                (false, Some(e.to_string()))
            }
        };
        steps.push(SessionStep {
            index,
            edit: edit.clone(),
            accepted,
            state: *session.state(),
            rejection,
        });
    }

    if input.commit_on_finish {
        session.apply(&LoanEdit::CommitPrincipal)?;
        session.apply(&LoanEdit::CommitTermYears)?;
    }

    let final_state = *session.state();
    let settled = engine.is_settled(&final_state);
    if !settled {
        warnings.push(
            "Final principal or term lies outside the category bounds; commit before submitting"
                .into(),
        );
    }

    let output = SessionOutput {
        steps,
        final_state,
        settled,
        offers: engine.compare_offers(&final_state)?,
        analytics: AnalyticsRecord::from_state(&final_state)?,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "periods_per_year": crate::annuity::PERIODS_PER_YEAR.to_string(),
        "commit_on_finish": input.commit_on_finish,
        "edits": input.edits.len(),
    });

    Ok(with_metadata(
        "Annuity reconciliation of principal, term and installment",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_edit_json_shape() {
        let edit: LoanEdit =
            serde_json::from_str(r#"{ "op": "set_principal", "value": "250000" }"#).unwrap();
        assert_eq!(edit, LoanEdit::SetPrincipal { value: dec!(250_000) });

        let edit: LoanEdit = serde_json::from_str(r#"{ "op": "commit_term_years" }"#).unwrap();
        assert_eq!(edit, LoanEdit::CommitTermYears);

        let edit: LoanEdit =
            serde_json::from_str(r#"{ "op": "set_category", "category": "vehicle" }"#).unwrap();
        assert_eq!(
            edit,
            LoanEdit::SetCategory {
                category: CollateralCategory::Vehicle
            }
        );
    }

    #[test]
    fn test_apply_rejection_keeps_state() {
        let mut session = LoanSession::open(LoanEngine::default()).unwrap();
        let before = *session.state();
        assert!(session
            .apply(&LoanEdit::SetTermYears { value: dec!(0) })
            .is_err());
        assert_eq!(*session.state(), before);

        let kept = *session.apply_or_keep(&LoanEdit::SetTermYears { value: dec!(-2) });
        assert_eq!(kept, before);
    }

    #[test]
    fn test_replay_reports_rejections() {
        let input = SessionInput {
            initial_state: None,
            edits: vec![
                LoanEdit::SetPrincipal { value: dec!(1_000_000) },
                LoanEdit::SetTermYears { value: dec!(0) },
                LoanEdit::SetTermYears { value: dec!(20) },
            ],
            commit_on_finish: true,
        };
        let output = replay_session(&LoanEngine::default(), &input).unwrap();
        let result = &output.result;

        assert_eq!(result.steps.len(), 3);
        assert!(result.steps[0].accepted);
        assert!(!result.steps[1].accepted);
        assert_eq!(result.steps[1].state, result.steps[0].state);
        assert_eq!(result.steps[2].state.term_years(), dec!(20));
        assert_eq!(result.final_state.term_years(), dec!(5));
        assert!(result.settled);
        assert_eq!(output.warnings.len(), 1);
    }

    #[test]
    fn test_replay_without_commit_warns() {
        let input = SessionInput {
            initial_state: None,
            edits: vec![LoanEdit::SetPrincipal { value: dec!(10) }],
            commit_on_finish: false,
        };
        let output = replay_session(&LoanEngine::default(), &input).unwrap();
        assert!(!output.result.settled);
        assert_eq!(output.warnings.len(), 1);
    }
}
