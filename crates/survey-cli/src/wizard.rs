use std::fmt::Write;

use serde_json::Value;
use survey_spec::{AnswerSet, QuestionSpec, QuestionType, RenderStatus};

/// Controls which bits of state the wizard prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: section headings and prompts only.
    Clean,
    /// Verbose output: status, progress, required markers and choice labels.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Prints the survey one section at a time.
pub struct WizardPresenter {
    verbosity: Verbosity,
    header_printed: bool,
    show_answers_json: bool,
}

impl WizardPresenter {
    pub fn new(verbosity: Verbosity, show_answers_json: bool) -> Self {
        Self {
            verbosity,
            header_printed: false,
            show_answers_json,
        }
    }

    pub fn show_header(&mut self, payload: &WizardPayload) {
        if self.header_printed {
            return;
        }
        println!("Survey: {}", payload.survey_title);
        println!("Type 'back' to return to the previous section or 'exit' to quit.");
        self.header_printed = true;
    }

    pub fn show_section(&self, payload: &WizardPayload) {
        println!();
        println!(
            "{} ({}/{})",
            payload.section_title, payload.progress.step, payload.progress.total
        );
        if let Some(intro) = &payload.intro {
            println!("{}", intro);
        }
        if self.verbosity.is_verbose() {
            println!("Status: {}", payload.status.as_str());
            let required = payload
                .questions
                .iter()
                .filter(|question| question.required)
                .map(|question| question.id.as_str())
                .collect::<Vec<_>>();
            if !required.is_empty() {
                println!("Required: {}", required.join(", "));
            }
        }
    }

    pub fn show_prompt(&self, prompt: &PromptContext) {
        let mut line = format!("{}/{} {}", prompt.index, prompt.total, prompt.title);
        if prompt.required {
            line.push_str(" *");
        }
        if let Some(hint) = &prompt.hint {
            line.push(' ');
            line.push_str(hint);
        }
        println!("{}", line);
        if let Some(description) = &prompt.description {
            println!("{}", description);
        }
        if let Some(current) = &prompt.current {
            println!("Current: {}", current);
        }
        if self.verbosity.is_verbose() && !prompt.choices.is_empty() {
            let labelled = prompt
                .choices
                .iter()
                .map(|(value, label)| format!("{} = {}", value, label))
                .collect::<Vec<_>>();
            println!("Choices: {}", labelled.join("; "));
        }
    }

    pub fn show_parse_error(&self, error: &AnswerParseError) {
        eprintln!("Invalid answer: {}", error.user_message);
        if let Some(debug) = &error.debug_message {
            eprintln!("  Expected: {}", debug);
        }
    }

    pub fn show_error(&self, message: &str) {
        eprintln!("{}", message);
    }

    pub fn show_completion(&self, answers: &AnswerSet, id: &str) {
        println!("Thank you! Your survey response has been submitted successfully.");
        println!("Response id: {}", id);
        match answers.to_cbor() {
            Ok(bytes) => {
                println!("Answers (CBOR hex): {}", encode_hex(&bytes));
            }
            Err(err) => {
                eprintln!("Failed to serialize answers to CBOR: {}", err);
            }
        }
        if self.show_answers_json {
            match answers.to_json_pretty() {
                Ok(pretty) => println!("{}", pretty),
                Err(err) => {
                    eprintln!("Failed to serialize answers to JSON: {}", err);
                }
            }
        }
    }
}

/// Section payload extracted from the component's JSON UI.
pub struct WizardPayload {
    pub survey_title: String,
    pub section_title: String,
    pub intro: Option<String>,
    pub status: RenderStatus,
    pub progress: SectionProgress,
    pub can_go_back: bool,
    pub questions: Vec<WizardQuestion>,
}

impl WizardPayload {
    pub fn from_json(json: &Value) -> Result<Self, String> {
        let survey_title = json
            .get("survey_title")
            .and_then(Value::as_str)
            .ok_or_else(|| "wizard payload missing survey_title".to_string())?
            .to_string();
        let section_title = json
            .get("section_title")
            .and_then(Value::as_str)
            .ok_or_else(|| "wizard payload missing section_title".to_string())?
            .to_string();
        let intro = json
            .get("intro")
            .and_then(Value::as_str)
            .map(|value| value.to_string());
        let status = RenderStatus::from_label(
            json.get("status")
                .and_then(Value::as_str)
                .unwrap_or("in_progress"),
        );
        let progress = json
            .get("progress")
            .and_then(Value::as_object)
            .ok_or_else(|| "wizard payload missing progress".to_string())?;
        let step = progress.get("step").and_then(Value::as_u64).unwrap_or(1) as usize;
        let total = progress.get("total").and_then(Value::as_u64).unwrap_or(0) as usize;
        let can_go_back = json
            .get("can_go_back")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let questions = json
            .get("questions")
            .and_then(Value::as_array)
            .ok_or_else(|| "wizard payload missing questions".to_string())?
            .iter()
            .map(WizardQuestion::from_json)
            .collect::<Result<_, _>>()?;
        Ok(Self {
            survey_title,
            section_title,
            intro,
            status,
            progress: SectionProgress { step, total },
            can_go_back,
            questions,
        })
    }
}

/// Position of the section on the respondent's branch.
pub struct SectionProgress {
    pub step: usize,
    pub total: usize,
}

/// Minimal view of a question used for rendering prompts.
pub struct WizardQuestion {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: QuestionKind,
    pub required: bool,
    pub choices: Vec<(String, String)>,
    pub current: Option<String>,
}

impl WizardQuestion {
    fn from_json(value: &Value) -> Result<Self, String> {
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| "question missing id".to_string())?
            .to_string();
        let title = value
            .get("title")
            .and_then(Value::as_str)
            .ok_or_else(|| format!("question '{}' missing title", id))?
            .to_string();
        let description = value
            .get("description")
            .and_then(Value::as_str)
            .map(|value| value.to_string());
        let required = value
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let kind =
            QuestionKind::from_label(value.get("type").and_then(Value::as_str).unwrap_or("text"));
        let choices = value
            .get("choices")
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(|choice| {
                        let token = choice.get("value").and_then(Value::as_str)?;
                        let label = choice.get("label").and_then(Value::as_str).unwrap_or(token);
                        Some((token.to_string(), label.to_string()))
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        let current = value.get("current_value").and_then(describe_current);
        Ok(Self {
            id,
            title,
            description,
            kind,
            required,
            choices,
            current,
        })
    }

    /// Builds a prompt for a question outside the rendered section, e.g. one the gate flagged.
    pub fn from_spec(question: &QuestionSpec, current: Option<String>) -> Self {
        Self {
            id: question.id.as_str().to_string(),
            title: question.title.clone(),
            description: question.description.clone(),
            kind: QuestionKind::from_type(question.kind),
            required: true,
            choices: question
                .choices
                .iter()
                .map(|choice| (choice.value.clone(), choice.label.clone()))
                .collect(),
            current,
        }
    }

    pub fn tokens(&self) -> Vec<&str> {
        self.choices.iter().map(|(value, _)| value.as_str()).collect()
    }
}

fn describe_current(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Array(items) if !items.is_empty() => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        _ => None,
    }
}

/// Context used to format a single prompt.
pub struct PromptContext {
    pub index: usize,
    pub total: usize,
    pub title: String,
    pub description: Option<String>,
    pub required: bool,
    pub hint: Option<String>,
    pub choices: Vec<(String, String)>,
    pub current: Option<String>,
}

impl PromptContext {
    pub fn new(question: &WizardQuestion, index: usize, total: usize) -> Self {
        Self {
            index: index.max(1),
            total,
            title: question.title.clone(),
            description: question.description.clone(),
            required: question.required,
            hint: question.kind.hint(&question.tokens()),
            choices: question.choices.clone(),
            current: question.current.clone(),
        }
    }
}

/// Supported kinds for question prompts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum QuestionKind {
    Text,
    Choice,
    MultiChoice,
}

impl QuestionKind {
    fn from_label(label: &str) -> Self {
        match label {
            "choice" => QuestionKind::Choice,
            "multi_choice" => QuestionKind::MultiChoice,
            _ => QuestionKind::Text,
        }
    }

    fn from_type(kind: QuestionType) -> Self {
        match kind {
            QuestionType::Text => QuestionKind::Text,
            QuestionType::Choice => QuestionKind::Choice,
            QuestionType::MultiChoice => QuestionKind::MultiChoice,
        }
    }

    fn hint(&self, tokens: &[&str]) -> Option<String> {
        match self {
            QuestionKind::Choice if !tokens.is_empty() => Some(format!("({})", tokens.join("/"))),
            QuestionKind::MultiChoice if !tokens.is_empty() => {
                Some(format!("(comma-separated: {})", tokens.join(", ")))
            }
            _ => None,
        }
    }
}

/// Error produced when parsing answers from the user.
#[derive(Debug)]
pub struct AnswerParseError {
    pub user_message: String,
    pub debug_message: Option<String>,
}

impl AnswerParseError {
    pub fn new(user_message: impl Into<String>, debug_message: Option<String>) -> Self {
        Self {
            user_message: user_message.into(),
            debug_message,
        }
    }
}

fn encode_hex(bytes: &[u8]) -> String {
    let mut encoded = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(&mut encoded, "{:02x}", byte);
    }
    encoded
}
