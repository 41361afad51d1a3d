mod wizard;

use clap::{Args, Parser, Subcommand, ValueEnum};
use component_survey::{
    dashboard, dashboard_text, export_csv, fetch_responses, filter_table, get_answer_schema,
    next as survey_next, previous as survey_previous, render_json_ui, response_detail,
    response_detail_text, set_answer, start, submit_state, submit_survey, toggle_option,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use survey_spec::{
    AnswerSet, Field, JsonlStore, RenderStatus, SectionId, SurveyConfig, SurveyProgress,
    SurveySpec, check_minimum, required_fields, validate,
};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use wizard::{
    AnswerParseError, PromptContext, QuestionKind, Verbosity, WizardPayload, WizardPresenter,
    WizardQuestion,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const STORE_ENV: &str = "THYROID_SURVEY_STORE";
const DEFAULT_STORE: &str = "thyroid-survey-responses.jsonl";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Thyroid MWA survey wizard and dashboard",
    long_about = "Runs the microwave ablation survey in a text shell, stores responses and summarizes them"
)]
struct Cli {
    /// Path to a JSON configuration file.
    #[arg(long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Response store file (JSON lines); overrides the config file and THYROID_SURVEY_STORE.
    #[arg(long, global = true, value_name = "STORE")]
    store: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RenderMode {
    Text,
    Json,
}

#[derive(Args, Serialize, Debug, Clone)]
struct FilterArgs {
    /// Case-insensitive search over doctor name, hospital and specialty.
    #[arg(long, default_value = "")]
    search: String,
    /// Exact specialty token, or "all".
    #[arg(long, default_value = "all")]
    specialty: String,
    /// Exact MWA experience answer, or "all".
    #[arg(long, default_value = "all")]
    experience: String,
}

#[derive(Subcommand)]
enum Command {
    /// Fill in the survey section by section and submit it to the store.
    Wizard {
        /// Optional JSON file containing initial answers.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
        /// Show verbose output (status, required answers, choice labels).
        #[arg(long, alias = "debug")]
        verbose: bool,
        /// Also emit answer JSON after submission.
        #[arg(long)]
        answers_json: bool,
        /// Render output mode for the wizard display.
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
    },
    /// Check an answers file against the submission gate and the intake check.
    Validate {
        /// Path to the answers JSON file.
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
        /// Section the answers are submitted from; derived from familiarWithMWA when omitted.
        #[arg(long, value_parser = parse_section)]
        section: Option<SectionId>,
    },
    /// Append an answers document to the store, as the submit endpoint does.
    Submit {
        /// Path to the answers JSON file.
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
    },
    /// Print every stored response.
    Responses,
    /// Summarize stored responses.
    Dashboard {
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
    },
    /// List stored responses, filtered and with selection markers.
    Table {
        #[command(flatten)]
        filter: FilterArgs,
        /// Row keys to mark as selected.
        #[arg(long = "select", value_name = "KEY")]
        select: Vec<String>,
    },
    /// Show every answer of one stored response.
    Show {
        /// Row key as listed by `table`: the stored id, or `row-<n>`.
        #[arg(long, value_name = "KEY")]
        key: String,
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
    },
    /// Write the filtered (or selected) responses as CSV.
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        /// Export only these row keys among the filtered rows.
        #[arg(long = "select", value_name = "KEY")]
        select: Vec<String>,
        /// Output file; defaults to the standard download name in the current directory.
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        /// Print the CSV instead of writing a file.
        #[arg(long, conflicts_with = "out")]
        stdout: bool,
    },
    /// Print the JSON schema of an answers document.
    Schema {
        /// Print the schema of the survey definition format instead.
        #[arg(long)]
        definition: bool,
    },
}

/// Resolved configuration shared by every command.
struct CliContext {
    config_json: String,
    spec: SurveySpec,
    store_path: PathBuf,
}

impl CliContext {
    fn load(config_path: Option<&Path>, store_flag: Option<PathBuf>) -> CliResult<Self> {
        let config_json = match config_path {
            Some(path) => fs::read_to_string(path)
                .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?,
            None => String::new(),
        };
        let config = SurveyConfig::from_json(&config_json)?;
        let spec = config.load_survey()?;
        let store_path = store_flag
            .or_else(|| env::var_os(STORE_ENV).map(PathBuf::from))
            .or_else(|| config.store_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE));
        tracing::debug!(store = %store_path.display(), survey = %spec.id, "cli context loaded");
        Ok(Self {
            config_json,
            spec,
            store_path,
        })
    }

    fn store(&self) -> JsonlStore {
        JsonlStore::new(&self.store_path)
    }
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let ctx = CliContext::load(cli.config.as_deref(), cli.store)?;
    match cli.command {
        Command::Wizard {
            answers,
            verbose,
            answers_json,
            format,
        } => run_wizard(&ctx, answers, verbose, answers_json, format),
        Command::Validate { answers, section } => run_validate(answers, section),
        Command::Submit { answers } => run_submit(&ctx, answers),
        Command::Responses => run_responses(&ctx),
        Command::Dashboard { format } => run_dashboard(&ctx, format),
        Command::Table { filter, select } => run_table(&ctx, filter, select),
        Command::Show { key, format } => run_show(&ctx, &key, format),
        Command::Export {
            filter,
            select,
            out,
            stdout,
        } => run_export(&ctx, filter, select, out, stdout),
        Command::Schema { definition } => run_schema(&ctx, definition),
    }
}

fn parse_section(raw: &str) -> Result<SectionId, String> {
    SectionId::ALL
        .into_iter()
        .find(|section| section.as_str().eq_ignore_ascii_case(raw))
        .ok_or_else(|| {
            let known = SectionId::ALL
                .iter()
                .map(SectionId::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            format!("unknown section '{}'; expected one of: {}", raw, known)
        })
}

/// What the respondent asked for while answering a section.
enum SectionOutcome {
    Answered(String),
    Back(String),
}

fn run_wizard(
    ctx: &CliContext,
    answers_path: Option<PathBuf>,
    verbose: bool,
    answers_json: bool,
    format: RenderMode,
) -> CliResult<()> {
    let survey_id = ctx.spec.id.as_str();
    let mut state = match answers_path {
        Some(path) => {
            let contents = fs::read_to_string(path)?;
            let answers: AnswerSet = serde_json::from_str(&contents)?;
            serde_json::to_string(&SurveyProgress::with_answers(answers))?
        }
        None => parse_component_result(&start(survey_id, &ctx.config_json))?["state"].to_string(),
    };

    let mut store = ctx.store();
    let mut presenter = WizardPresenter::new(Verbosity::from_verbose(verbose), answers_json);

    loop {
        let ui_raw = render_json_ui(survey_id, &ctx.config_json, &state);
        let ui = parse_component_result(&ui_raw)?;
        print_render_output(format, &ui_raw);
        let payload =
            WizardPayload::from_json(&ui).map_err(|err| format!("wizard UI error: {}", err))?;
        presenter.show_header(&payload);
        presenter.show_section(&payload);

        state = match ask_section(&payload, state, &presenter)? {
            SectionOutcome::Back(state) => {
                let response = parse_component_result(&survey_previous(
                    survey_id,
                    &ctx.config_json,
                    &state,
                ))?;
                response["state"].to_string()
            }
            SectionOutcome::Answered(state) if payload.status == RenderStatus::ReadyToSubmit => {
                match submit_with_retries(ctx, &mut store, state, &presenter)? {
                    Some(state) => state,
                    None => break,
                }
            }
            SectionOutcome::Answered(state) => {
                let response =
                    parse_component_result(&survey_next(survey_id, &ctx.config_json, &state))?;
                if response["status"] == "error"
                    && let Some(message) = response["ui"]["error"].as_str()
                {
                    presenter.show_error(message);
                }
                response["state"].to_string()
            }
        };
    }

    Ok(())
}

/// Submits the state, re-asking any question the gate reports as missing.
///
/// Returns `None` once the response is stored, or the state to keep editing.
fn submit_with_retries(
    ctx: &CliContext,
    store: &mut JsonlStore,
    mut state: String,
    presenter: &WizardPresenter,
) -> CliResult<Option<String>> {
    loop {
        let response: Value = serde_json::from_str(&submit_state(store, &state))?;
        if response["success"] == true {
            let progress: SurveyProgress = serde_json::from_value(response["state"].clone())?;
            let id = response["id"].as_str().unwrap_or_default();
            presenter.show_completion(progress.answers(), id);
            return Ok(None);
        }

        let message = response["error"].as_str().unwrap_or("submission failed");
        presenter.show_error(message);
        let Some(field) = response["field"]
            .as_str()
            .and_then(|field| field.parse::<Field>().ok())
        else {
            return Err(message.to_string().into());
        };
        let question = ctx
            .spec
            .question(field)
            .ok_or_else(|| format!("question '{}' is not part of the survey", field))?;
        let question = WizardQuestion::from_spec(question, None);
        let prompt = PromptContext::new(&question, 1, 1);
        match prompt_question(&prompt, &question, presenter, false)? {
            Some(PromptAnswer::Value(value)) => {
                state = apply_answer(&state, &question, &value)?;
            }
            Some(PromptAnswer::Back) => return Ok(Some(state)),
            None => {}
        }
    }
}

fn ask_section(
    payload: &WizardPayload,
    mut state: String,
    presenter: &WizardPresenter,
) -> CliResult<SectionOutcome> {
    let total = payload.questions.len();
    for (index, question) in payload.questions.iter().enumerate() {
        let prompt = PromptContext::new(question, index + 1, total);
        match prompt_question(&prompt, question, presenter, payload.can_go_back)? {
            Some(PromptAnswer::Value(value)) => {
                state = apply_answer(&state, question, &value)?;
            }
            Some(PromptAnswer::Back) => return Ok(SectionOutcome::Back(state)),
            None => {}
        }
    }
    Ok(SectionOutcome::Answered(state))
}

fn apply_answer(state: &str, question: &WizardQuestion, value: &Value) -> CliResult<String> {
    let response = match (question.kind, value) {
        (QuestionKind::MultiChoice, Value::Array(selected)) => {
            let mut state = state.to_string();
            for (token, _) in &question.choices {
                let included = selected.iter().any(|item| item.as_str() == Some(token.as_str()));
                let toggled =
                    parse_component_result(&toggle_option(&state, &question.id, token, included))?;
                state = toggled["state"].to_string();
            }
            return Ok(state);
        }
        _ => set_answer(state, &question.id, &serde_json::to_string(value)?),
    };
    Ok(parse_component_result(&response)?["state"].to_string())
}

fn parse_component_result(response: &str) -> CliResult<Value> {
    let value: Value = serde_json::from_str(response)?;
    if let Some(error) = value.get("error").and_then(Value::as_str) {
        Err(error.into())
    } else {
        Ok(value)
    }
}

enum PromptAnswer {
    Value(Value),
    Back,
}

/// Reads one answer; `None` keeps the current value.
fn prompt_question(
    prompt: &PromptContext,
    question: &WizardQuestion,
    presenter: &WizardPresenter,
    can_go_back: bool,
) -> CliResult<Option<PromptAnswer>> {
    loop {
        presenter.show_prompt(prompt);
        print!("> ");
        io::stdout().flush()?;
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Err("input closed before the survey was submitted".into());
        }

        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("exit") {
            return Err("wizard aborted by user".into());
        }
        if trimmed.eq_ignore_ascii_case("back") {
            if can_go_back {
                return Ok(Some(PromptAnswer::Back));
            }
            presenter.show_error("Already at the first section.");
            continue;
        }
        if trimmed.is_empty() {
            return Ok(None);
        }

        match parse_answer(question, trimmed) {
            Ok(value) => return Ok(Some(PromptAnswer::Value(value))),
            Err(err) => presenter.show_parse_error(&err),
        }
    }
}

fn parse_answer(question: &WizardQuestion, raw: &str) -> Result<Value, AnswerParseError> {
    match question.kind {
        QuestionKind::Text => Ok(Value::String(raw.to_string())),
        QuestionKind::Choice => parse_choice(question, raw),
        QuestionKind::MultiChoice => parse_multi_choice(question, raw),
    }
}

fn parse_choice(question: &WizardQuestion, raw: &str) -> Result<Value, AnswerParseError> {
    let allowed = question.tokens();
    if allowed.is_empty() {
        return Err(AnswerParseError::new(
            "Choices are not defined for this question.",
            None,
        ));
    }
    if let Some(choice) = allowed.iter().find(|choice| choice.eq_ignore_ascii_case(raw)) {
        Ok(Value::String(choice.to_string()))
    } else {
        Err(AnswerParseError::new(
            format!("Choose one of: {}.", allowed.join(", ")),
            Some(format!("allowed values: {}", allowed.join(", "))),
        ))
    }
}

fn parse_multi_choice(question: &WizardQuestion, raw: &str) -> Result<Value, AnswerParseError> {
    let mut selected: Vec<Value> = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let Value::String(choice) = parse_choice(question, part)? else {
            continue;
        };
        if !selected.iter().any(|existing| existing.as_str() == Some(choice.as_str())) {
            selected.push(Value::String(choice));
        }
    }
    Ok(Value::Array(selected))
}

fn print_render_output(mode: RenderMode, ui: &str) {
    match mode {
        RenderMode::Text => {}
        RenderMode::Json => println!("JSON UI:\n{}", ui),
    }
}

fn run_validate(answers_path: PathBuf, section: Option<SectionId>) -> CliResult<()> {
    let contents = fs::read_to_string(answers_path)?;
    let document: Value = serde_json::from_str(&contents)?;
    let minimum = check_minimum(&document);
    let answers: AnswerSet = serde_json::from_value(document)?;
    let section = section.unwrap_or(if answers.text(Field::FamiliarWithMwa) == "no" {
        SectionId::MwaConsent
    } else {
        SectionId::Consent
    });
    let gate = validate(&answers, &required_fields(&answers, section));

    let valid = minimum.is_ok() && gate.is_ok();
    println!(
        "Validation result: {}",
        if valid { "valid" } else { "invalid" }
    );
    if let Err(missing) = &gate {
        eprintln!("{}", missing);
    }
    if let Err(survey_spec::SurveyError::MalformedInput { message, details }) = &minimum {
        eprintln!("{}:", message);
        for issue in details {
            eprintln!("  {}: {}", issue.field, issue.message);
        }
    }

    if valid {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

/// Text renderers answer with plain text, or with an `{"error": ...}` document on failure.
fn text_or_error(text: String) -> CliResult<String> {
    if let Ok(value) = serde_json::from_str::<Value>(&text)
        && let Some(error) = value.get("error").and_then(Value::as_str)
    {
        return Err(error.into());
    }
    Ok(text)
}

fn print_envelope(response: &str) -> CliResult<Value> {
    let value: Value = serde_json::from_str(response)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    if value["success"] == false {
        let message = value["error"].as_str().unwrap_or("request failed");
        return Err(message.to_string().into());
    }
    Ok(value)
}

fn run_submit(ctx: &CliContext, answers_path: PathBuf) -> CliResult<()> {
    let body = fs::read_to_string(answers_path)?;
    let mut store = ctx.store();
    print_envelope(&submit_survey(&mut store, &body))?;
    Ok(())
}

fn run_responses(ctx: &CliContext) -> CliResult<()> {
    print_envelope(&fetch_responses(&ctx.store()))?;
    Ok(())
}

fn run_dashboard(ctx: &CliContext, format: RenderMode) -> CliResult<()> {
    let store = ctx.store();
    match format {
        RenderMode::Text => {
            println!("{}", text_or_error(dashboard_text(&store, &ctx.config_json))?);
        }
        RenderMode::Json => {
            let value = parse_component_result(&dashboard(&store, &ctx.config_json))?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

fn run_show(ctx: &CliContext, key: &str, format: RenderMode) -> CliResult<()> {
    let store = ctx.store();
    match format {
        RenderMode::Text => {
            let text = response_detail_text(&store, &ctx.config_json, key);
            println!("{}", text_or_error(text)?);
        }
        RenderMode::Json => {
            let value =
                parse_component_result(&response_detail(&store, &ctx.config_json, key))?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

fn table_request(filter: &FilterArgs, select: &[String]) -> Value {
    if select.is_empty() {
        json!({ "filter": filter })
    } else {
        json!({ "filter": filter, "selection": select })
    }
}

fn run_table(ctx: &CliContext, filter: FilterArgs, select: Vec<String>) -> CliResult<()> {
    let request = table_request(&filter, &select).to_string();
    let table = parse_component_result(&filter_table(&ctx.store(), &request))?;
    println!(
        "Showing {} of {} responses ({} selected)",
        table["matched"], table["total"], table["selected"]
    );
    for row in table["rows"].as_array().into_iter().flatten() {
        let record = &row["record"];
        let marker = if row["selected"] == true { "[x]" } else { "[ ]" };
        let cell = |key: &str| record[key].as_str().unwrap_or("").to_string();
        println!(
            "{} {} | {} | {} | {} | {}",
            marker,
            row["key"].as_str().unwrap_or_default(),
            cell("doctorName"),
            cell("hospitalName"),
            cell("specialty"),
            cell("mwaExperience"),
        );
    }
    Ok(())
}

fn run_export(
    ctx: &CliContext,
    filter: FilterArgs,
    select: Vec<String>,
    out: Option<PathBuf>,
    stdout: bool,
) -> CliResult<()> {
    let request = table_request(&filter, &select).to_string();
    let export = parse_component_result(&export_csv(&ctx.store(), &request))?;
    let csv = export["csv"].as_str().unwrap_or_default();
    if stdout {
        println!("{}", csv);
        return Ok(());
    }
    let target = out.unwrap_or_else(|| {
        PathBuf::from(export["file_name"].as_str().unwrap_or("thyroid-survey-responses.csv"))
    });
    fs::write(&target, csv)?;
    println!("Exported {} rows to {}", export["rows"], target.display());
    Ok(())
}

fn run_schema(ctx: &CliContext, definition: bool) -> CliResult<()> {
    let schema = if definition {
        SurveySpec::definition_schema()
    } else {
        parse_component_result(&get_answer_schema(&ctx.spec.id, &ctx.config_json))?
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice_question(kind: QuestionKind) -> WizardQuestion {
        let spec = SurveySpec::builtin().expect("builtin");
        let field = match kind {
            QuestionKind::MultiChoice => Field::Complications,
            _ => Field::Specialty,
        };
        let question = spec.question(field).expect("question");
        WizardQuestion::from_spec(question, None)
    }

    #[test]
    fn choice_answers_are_case_insensitive() {
        let question = choice_question(QuestionKind::Choice);
        assert_eq!(
            parse_answer(&question, "ENT").expect("choice"),
            Value::String("ent".into())
        );
        let err = parse_answer(&question, "dentist").expect_err("unknown choice");
        assert!(err.user_message.starts_with("Choose one of: endocrinologist"));
    }

    #[test]
    fn multi_choice_answers_are_deduplicated() {
        let question = choice_question(QuestionKind::MultiChoice);
        assert_eq!(
            parse_answer(&question, "pain, Bleeding, pain").expect("multi"),
            json!(["pain", "bleeding"])
        );
        assert!(parse_answer(&question, "pain, headache").is_err());
    }

    #[test]
    fn section_names_parse_case_insensitively() {
        assert_eq!(parse_section("mwaconsent"), Ok(SectionId::MwaConsent));
        assert!(parse_section("E").is_err());
    }

    #[test]
    fn table_request_omits_empty_selection() {
        let filter = FilterArgs {
            search: "smith".into(),
            specialty: "all".into(),
            experience: "all".into(),
        };
        let request = table_request(&filter, &[]);
        assert!(request.get("selection").is_none());
        let request = table_request(&filter, &["row-0".to_string()]);
        assert_eq!(request["selection"], json!(["row-0"]));
        assert_eq!(request["filter"]["search"], "smith");
    }
}
