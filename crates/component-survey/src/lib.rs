use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

use survey_spec::{
    AnswerValue, DashboardSummary, Field, ReportError, ResponseDetail, ResponseRecord,
    ResponseStore, Selection, SubmissionClient, SurveyConfig, SurveyError, SurveyProgress,
    SurveySpec, TableFilter, answers_schema, build_render_payload, export_file_name, export_rows,
    find_row, parse_submission, render_dashboard_text, render_detail_text,
    render_json_ui as survey_render_json_ui, render_text as survey_render_text,
    response_detail as build_response_detail, rows, section_required_fields, specialty_options,
    summarize, validate,
};

#[derive(Debug, Error)]
enum ComponentError {
    #[error("failed to parse {0}: {1}")]
    Parse(&'static str, #[source] serde_json::Error),
    #[error("survey '{0}' is not available")]
    SurveyUnavailable(String),
    #[error("json encode error: {0}")]
    JsonEncode(#[source] serde_json::Error),
    #[error("unknown question '{0}'")]
    UnknownQuestion(String),
    #[error("'{0}' expects {1}")]
    AnswerShape(Field, &'static str),
    #[error("no response with key '{0}'")]
    UnknownResponse(String),
    #[error("Please select at least one doctor to export.")]
    EmptySelection,
    #[error(transparent)]
    Survey(#[from] SurveyError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

fn load_config(config_json: &str) -> Result<SurveyConfig, ComponentError> {
    Ok(SurveyConfig::from_json(config_json)?)
}

fn ensure_survey(
    survey_id: &str,
    config_json: &str,
) -> Result<(SurveySpec, SurveyConfig), ComponentError> {
    let config = load_config(config_json)?;
    let spec = config.load_survey()?;
    if spec.id != survey_id {
        Err(ComponentError::SurveyUnavailable(survey_id.to_string()))
    } else {
        Ok((spec, config))
    }
}

fn parse_state(state_json: &str) -> Result<SurveyProgress, ComponentError> {
    if state_json.trim().is_empty() {
        return Ok(SurveyProgress::new());
    }
    serde_json::from_str(state_json).map_err(|err| ComponentError::Parse("state", err))
}

fn parse_field(question_id: &str) -> Result<Field, ComponentError> {
    question_id
        .parse()
        .map_err(|_| ComponentError::UnknownQuestion(question_id.to_string()))
}

/// Multi-select keys take a list of tokens; every other key takes a string.
fn check_shape(field: Field, value: &AnswerValue) -> Result<(), ComponentError> {
    match (field.is_multi(), value) {
        (true, AnswerValue::Multi(_)) | (false, AnswerValue::Text(_)) => Ok(()),
        (true, AnswerValue::Text(_)) => {
            Err(ComponentError::AnswerShape(field, "a list of strings"))
        }
        (false, AnswerValue::Multi(_)) => Err(ComponentError::AnswerShape(field, "a string")),
    }
}

fn encode_state(progress: &SurveyProgress) -> Result<Value, ComponentError> {
    serde_json::to_value(progress).map_err(ComponentError::JsonEncode)
}

fn respond(result: Result<Value, ComponentError>) -> String {
    match result {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|error| {
            json!({"error": format!("json encode: {}", error)}).to_string()
        }),
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

fn respond_string(result: Result<String, ComponentError>) -> String {
    match result {
        Ok(value) => value,
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

/// `{"success": false, ...}` envelope used by the submit and fetch endpoints.
fn failure_envelope(err: &ComponentError) -> Value {
    let mut body = json!({ "success": false, "error": err.to_string() });
    if let ComponentError::Survey(survey_err) = err {
        body["code"] = json!(survey_err.code());
        match survey_err {
            SurveyError::MalformedInput { details, .. } if !details.is_empty() => {
                body["details"] = json!(details);
            }
            SurveyError::MissingField(missing) => {
                body["field"] = json!(missing.field.as_str());
            }
            _ => {}
        }
    }
    body
}

fn envelope(result: Result<Value, ComponentError>) -> String {
    respond(Ok(result.unwrap_or_else(|err| failure_envelope(&err))))
}

pub fn describe(survey_id: &str, config_json: &str) -> String {
    respond(ensure_survey(survey_id, config_json).and_then(|(spec, _)| {
        serde_json::to_value(spec).map_err(ComponentError::JsonEncode)
    }))
}

pub fn get_answer_schema(survey_id: &str, config_json: &str) -> String {
    respond(ensure_survey(survey_id, config_json).map(|(spec, _)| answers_schema(&spec)))
}

/// Wizard state plus its rendered section, the shape every wizard call returns.
fn wizard_response(
    spec: &SurveySpec,
    progress: &SurveyProgress,
    error: Option<String>,
) -> Result<Value, ComponentError> {
    let failed = error.is_some();
    let payload = build_render_payload(spec, progress, error);
    Ok(json!({
        "status": if failed { "error" } else { payload.status.as_str() },
        "section": progress.current_section().as_str(),
        "state": encode_state(progress)?,
        "ui": survey_render_json_ui(&payload),
    }))
}

pub fn start(survey_id: &str, config_json: &str) -> String {
    respond(
        ensure_survey(survey_id, config_json)
            .and_then(|(spec, _)| wizard_response(&spec, &SurveyProgress::new(), None)),
    )
}

pub fn render_text(survey_id: &str, config_json: &str, state_json: &str) -> String {
    respond_string(ensure_survey(survey_id, config_json).and_then(|(spec, _)| {
        let progress = parse_state(state_json)?;
        Ok(survey_render_text(&build_render_payload(&spec, &progress, None)))
    }))
}

pub fn render_json_ui(survey_id: &str, config_json: &str, state_json: &str) -> String {
    respond(ensure_survey(survey_id, config_json).and_then(|(spec, _)| {
        let progress = parse_state(state_json)?;
        Ok(survey_render_json_ui(&build_render_payload(
            &spec, &progress, None,
        )))
    }))
}

/// Replaces one answer. `value_json` is a JSON string or a JSON array of strings.
pub fn set_answer(state_json: &str, question_id: &str, value_json: &str) -> String {
    respond(apply_answer(state_json, question_id, value_json))
}

fn apply_answer(
    state_json: &str,
    question_id: &str,
    value_json: &str,
) -> Result<Value, ComponentError> {
    let mut progress = parse_state(state_json)?;
    let field = parse_field(question_id)?;
    let value = serde_json::from_str::<AnswerValue>(value_json)
        .map_err(|err| ComponentError::Parse("answer value", err))?;
    check_shape(field, &value)?;
    progress.set_answer(field, value);
    Ok(json!({ "state": encode_state(&progress)? }))
}

pub fn toggle_option(state_json: &str, question_id: &str, option: &str, included: bool) -> String {
    respond(parse_state(state_json).and_then(|mut progress| {
        let field = parse_field(question_id)?;
        if !field.is_multi() {
            return Err(ComponentError::AnswerShape(field, "a string"));
        }
        progress.toggle_multi_value(field, option, included);
        Ok(json!({ "state": encode_state(&progress)? }))
    }))
}

/// Moves to the next section.
///
/// From a final section this only reports `ready_to_submit`; persisting goes through
/// [`submit_state`]. With `validate_each_step` the current section's required answers are
/// checked first and a failure leaves the state where it was.
pub fn next(survey_id: &str, config_json: &str, state_json: &str) -> String {
    respond(ensure_survey(survey_id, config_json).and_then(|(spec, config)| {
        let mut progress = parse_state(state_json)?;
        if progress.is_submitted() || progress.current_section().is_final() {
            return wizard_response(&spec, &progress, None);
        }
        if config.validate_each_step {
            let required = section_required_fields(&spec, &progress);
            if let Err(missing) = validate(progress.answers(), &required) {
                return wizard_response(&spec, &progress, Some(missing.to_string()));
            }
        }
        progress.advance();
        wizard_response(&spec, &progress, None)
    }))
}

pub fn previous(survey_id: &str, config_json: &str, state_json: &str) -> String {
    respond(ensure_survey(survey_id, config_json).and_then(|(spec, _)| {
        let mut progress = parse_state(state_json)?;
        progress.retreat();
        wizard_response(&spec, &progress, None)
    }))
}

/// Submits the wizard state: gate, intake check, persist, then mark submitted.
pub fn submit_state<S: ResponseStore>(store: &mut S, state_json: &str) -> String {
    let mut progress = match parse_state(state_json) {
        Ok(progress) => progress,
        Err(err) => return respond(Ok(failure_envelope(&err))),
    };
    let mut client = SubmissionClient::new(store);
    let outcome = client
        .submit(&mut progress)
        .map_err(ComponentError::from)
        .map(|meta| json!({ "success": true, "id": meta.id }));
    let mut body = outcome.unwrap_or_else(|err| failure_envelope(&err));
    match encode_state(&progress) {
        Ok(state) => body["state"] = state,
        Err(err) => return respond(Err(err)),
    }
    respond(Ok(body))
}

/// Submit endpoint: accepts a raw answer document and appends it to the store.
pub fn submit_survey<S: ResponseStore>(store: &mut S, body: &str) -> String {
    envelope(store_submission(store, body))
}

fn store_submission<S: ResponseStore>(store: &mut S, body: &str) -> Result<Value, ComponentError> {
    let document = parse_submission(body)?;
    let meta = store.insert(&document).map_err(|err| {
        tracing::warn!(error = %err, "failed to store survey");
        SurveyError::Persistence(err)
    })?;
    tracing::info!(id = %meta.id, "survey stored");
    Ok(json!({ "success": true, "id": meta.id }))
}

fn fetch_records<S: ResponseStore>(store: &S) -> Result<Vec<ResponseRecord>, ComponentError> {
    store.fetch_all().map_err(|err| {
        tracing::warn!(error = %err, "failed to fetch responses");
        ComponentError::Survey(SurveyError::Fetch(err))
    })
}

/// Fetch endpoint: every stored response, unpaginated.
pub fn fetch_responses<S: ResponseStore>(store: &S) -> String {
    envelope(fetch_records(store).map(|records| {
        let data = records
            .iter()
            .map(ResponseRecord::to_value)
            .collect::<Vec<_>>();
        json!({ "success": true, "data": data })
    }))
}

fn load_summary<S: ResponseStore>(
    store: &S,
    config_json: &str,
) -> Result<(SurveyConfig, Option<DashboardSummary>), ComponentError> {
    let config = load_config(config_json)?;
    let spec = config.load_survey()?;
    let records = fetch_records(store)?;
    let summary = summarize(&records, &spec, &config);
    Ok((config, summary))
}

/// Dashboard charts; `summary` is null when no responses are stored.
pub fn dashboard<S: ResponseStore>(store: &S, config_json: &str) -> String {
    respond(load_summary(store, config_json).and_then(|(config, summary)| {
        Ok(json!({
            "theme": { "dark": config.theme.dark },
            "summary": serde_json::to_value(summary).map_err(ComponentError::JsonEncode)?,
        }))
    }))
}

pub fn dashboard_text<S: ResponseStore>(store: &S, config_json: &str) -> String {
    respond_string(
        load_summary(store, config_json).and_then(|(_, summary)| match summary {
            Some(summary) => Ok(render_dashboard_text(&summary)?),
            None => Ok("No survey responses yet.".to_string()),
        }),
    )
}

/// Table request: the filter inputs plus an optional selection of row keys.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TableRequest {
    filter: TableFilter,
    selection: Option<Selection>,
}

fn parse_table_request(request_json: &str) -> Result<TableRequest, ComponentError> {
    if request_json.trim().is_empty() {
        return Ok(TableRequest::default());
    }
    serde_json::from_str(request_json).map_err(|err| ComponentError::Parse("table request", err))
}

pub fn filter_table<S: ResponseStore>(store: &S, request_json: &str) -> String {
    respond(table_view(store, request_json))
}

fn table_view<S: ResponseStore>(store: &S, request_json: &str) -> Result<Value, ComponentError> {
    let request = parse_table_request(request_json)?;
    let records = fetch_records(store)?;
    let all = rows(&records);
    let filtered = request.filter.apply_rows(&all);
    let selection = request.selection.unwrap_or_default();
    let table = filtered
        .iter()
        .map(|row| {
            json!({
                "key": row.key,
                "selected": selection.contains(&row.key),
                "record": row.record.to_value(),
            })
        })
        .collect::<Vec<_>>();
    let all_selected =
        !filtered.is_empty() && filtered.iter().all(|row| selection.contains(&row.key));
    Ok(json!({
        "total": all.len(),
        "matched": filtered.len(),
        "selected": selection.len(),
        "all_selected": all_selected,
        "specialties": specialty_options(&records),
        "rows": table,
    }))
}

/// CSV of the filtered rows, or of the selected rows among them when a selection is given.
pub fn export_csv<S: ResponseStore>(store: &S, request_json: &str) -> String {
    respond(export_view(store, request_json))
}

fn export_view<S: ResponseStore>(store: &S, request_json: &str) -> Result<Value, ComponentError> {
    let request = parse_table_request(request_json)?;
    let records = fetch_records(store)?;
    let all = rows(&records);
    let filtered = request.filter.apply_rows(&all);
    let (chosen, file_name) = match &request.selection {
        Some(selection) => {
            let chosen = selection.selected(&filtered);
            if chosen.is_empty() {
                return Err(ComponentError::EmptySelection);
            }
            let name = export_file_name(Some(chosen.len()));
            (chosen, name)
        }
        None => (
            filtered.iter().map(|row| row.record).collect(),
            export_file_name(None),
        ),
    };
    let csv = export_rows(chosen.iter().copied());
    Ok(json!({
        "file_name": file_name,
        "rows": chosen.len(),
        "csv": csv,
    }))
}

fn load_detail<S: ResponseStore>(
    store: &S,
    config_json: &str,
    key: &str,
) -> Result<ResponseDetail, ComponentError> {
    let config = load_config(config_json)?;
    let spec = config.load_survey()?;
    let records = fetch_records(store)?;
    let all = rows(&records);
    let row =
        find_row(&all, key).ok_or_else(|| ComponentError::UnknownResponse(key.to_string()))?;
    Ok(build_response_detail(&spec, &row))
}

/// Every answer of the response with row key `key`, labelled and grouped by section.
pub fn response_detail<S: ResponseStore>(store: &S, config_json: &str, key: &str) -> String {
    respond(
        load_detail(store, config_json, key)
            .and_then(|detail| serde_json::to_value(detail).map_err(ComponentError::JsonEncode)),
    )
}

pub fn response_detail_text<S: ResponseStore>(store: &S, config_json: &str, key: &str) -> String {
    respond_string(load_detail(store, config_json, key).map(|detail| render_detail_text(&detail)))
}
