use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use loan_calc_core::analytics::AnalyticsRecord;
use loan_calc_core::numeric::decimal_from_f64;
use loan_calc_core::offer::{CapacityInput, QuoteInput};
use loan_calc_core::session::LoanEdit;
use loan_calc_core::{EngineConfig, LoanEngine, LoanState};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Engine from an optional JSON config, built-in table otherwise.
fn engine_from(config: Option<EngineConfig>) -> NapiResult<LoanEngine> {
    match config {
        Some(config) => LoanEngine::new(config).map_err(to_napi_error),
        None => Ok(LoanEngine::default()),
    }
}

fn parse_config(config_json: Option<String>) -> NapiResult<Option<EngineConfig>> {
    config_json
        .map(|json| EngineConfig::from_json_str(&json).map_err(to_napi_error))
        .transpose()
}

fn state_to_json(state: &LoanState) -> NapiResult<String> {
    serde_json::to_string(state).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

#[napi]
pub fn open_session(config_json: Option<String>) -> NapiResult<String> {
    let engine = engine_from(parse_config(config_json)?)?;
    let state = engine.open().map_err(to_napi_error)?;
    state_to_json(&state)
}

#[derive(Deserialize)]
struct EditBindingInput {
    #[serde(default)]
    config: Option<EngineConfig>,
    state: LoanState,
    edit: LoanEdit,
}

/// Apply one edit. A rejected edit surfaces as an error and the caller keeps
/// the state it passed in.
#[napi]
pub fn apply_loan_edit(input_json: String) -> NapiResult<String> {
    let input: EditBindingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let engine = engine_from(input.config)?;
    let state = engine.apply(&input.state, &input.edit).map_err(to_napi_error)?;
    state_to_json(&state)
}

// ---------------------------------------------------------------------------
// Raw slider / text-field edits
// ---------------------------------------------------------------------------

fn apply_raw(
    state_json: &str,
    config_json: Option<String>,
    field: &str,
    value: f64,
    to_edit: fn(rust_decimal::Decimal) -> LoanEdit,
) -> NapiResult<String> {
    let engine = engine_from(parse_config(config_json)?)?;
    let state: LoanState = serde_json::from_str(state_json).map_err(to_napi_error)?;
    let value = decimal_from_f64(field, value).map_err(to_napi_error)?;
    let next = engine.apply(&state, &to_edit(value)).map_err(to_napi_error)?;
    state_to_json(&next)
}

#[napi]
pub fn set_principal(state_json: String, value: f64, config_json: Option<String>) -> NapiResult<String> {
    apply_raw(&state_json, config_json, "principal", value, |value| {
        LoanEdit::SetPrincipal { value }
    })
}

#[napi]
pub fn set_term_years(state_json: String, value: f64, config_json: Option<String>) -> NapiResult<String> {
    apply_raw(&state_json, config_json, "term_years", value, |value| {
        LoanEdit::SetTermYears { value }
    })
}

#[napi]
pub fn set_installment(state_json: String, value: f64, config_json: Option<String>) -> NapiResult<String> {
    apply_raw(&state_json, config_json, "installment", value, |value| {
        LoanEdit::SetInstallment { value }
    })
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct QuoteBindingInput {
    #[serde(default)]
    config: Option<EngineConfig>,
    #[serde(flatten)]
    input: QuoteInput,
}

#[napi]
pub fn quote_offer(input_json: String) -> NapiResult<String> {
    let binding_input: QuoteBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let engine = engine_from(binding_input.config)?;
    let output = loan_calc_core::offer::quote_offer(&engine, &binding_input.input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct CapacityBindingInput {
    #[serde(default)]
    config: Option<EngineConfig>,
    #[serde(flatten)]
    input: CapacityInput,
}

#[napi]
pub fn borrowing_capacity(input_json: String) -> NapiResult<String> {
    let binding_input: CapacityBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let engine = engine_from(binding_input.config)?;
    let output = loan_calc_core::offer::borrowing_capacity(&engine, &binding_input.input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_offers(state_json: String, config_json: Option<String>) -> NapiResult<String> {
    let engine = engine_from(parse_config(config_json)?)?;
    let state: LoanState = serde_json::from_str(&state_json).map_err(to_napi_error)?;
    let offers = engine.compare_offers(&state).map_err(to_napi_error)?;
    serde_json::to_string(&offers).map_err(to_napi_error)
}

#[napi]
pub fn analytics_record(state_json: String) -> NapiResult<String> {
    let state: LoanState = serde_json::from_str(&state_json).map_err(to_napi_error)?;
    let record = AnalyticsRecord::from_state(&state).map_err(to_napi_error)?;
    serde_json::to_string(&record).map_err(to_napi_error)
}
