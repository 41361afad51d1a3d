use serde_json::{Map, Value, json};

use crate::{
    answers::AnswerValue,
    progress::{SurveyProgress, previous_section},
    spec::{QuestionType, SectionId, SurveySpec},
    validate::required_fields_for,
};

/// Status labels returned by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// More sections follow the current one.
    InProgress,
    /// The current section submits the survey.
    ReadyToSubmit,
    /// The survey has been handed off.
    Submitted,
}

impl RenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::InProgress => "in_progress",
            RenderStatus::ReadyToSubmit => "ready_to_submit",
            RenderStatus::Submitted => "submitted",
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "ready_to_submit" => RenderStatus::ReadyToSubmit,
            "submitted" => RenderStatus::Submitted,
            _ => RenderStatus::InProgress,
        }
    }
}

/// Position of the current section on its branch.
#[derive(Debug, Clone)]
pub struct RenderProgress {
    pub step: usize,
    pub total: usize,
}

/// Describes a single question for render outputs.
#[derive(Debug, Clone)]
pub struct RenderQuestion {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: QuestionType,
    pub required: bool,
    pub current_value: Value,
    pub choices: Vec<(String, String)>,
}

/// Collected payload used by both text and JSON renderers.
#[derive(Debug, Clone)]
pub struct RenderPayload {
    pub survey_id: String,
    pub survey_title: String,
    pub section: SectionId,
    pub section_title: String,
    pub intro: Option<String>,
    pub status: RenderStatus,
    pub progress: RenderProgress,
    pub can_go_back: bool,
    pub questions: Vec<RenderQuestion>,
    pub error: Option<String>,
}

/// Sections on the branch chosen in section A, counting the final one.
fn branch_length(progress: &SurveyProgress) -> usize {
    if progress.answers().text(crate::spec::Field::FamiliarWithMwa) == "no" {
        3
    } else {
        5
    }
}

/// Build the renderer payload for the section the wizard is on.
pub fn build_render_payload(
    spec: &SurveySpec,
    progress: &SurveyProgress,
    error: Option<String>,
) -> RenderPayload {
    let section_id = progress.current_section();
    let section = spec.section(section_id);
    let required = required_fields_for(progress);

    let questions = section
        .map(|section| {
            section
                .questions
                .iter()
                .map(|question| RenderQuestion {
                    id: question.id.as_str().to_string(),
                    title: question.title.clone(),
                    description: question.description.clone(),
                    kind: question.kind,
                    required: required.iter().any(|(field, _)| *field == question.id),
                    current_value: answer_to_value(progress.answers().get(question.id)),
                    choices: question
                        .choices
                        .iter()
                        .map(|choice| (choice.value.clone(), choice.label.clone()))
                        .collect(),
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let status = if progress.is_submitted() {
        RenderStatus::Submitted
    } else if section_id.is_final() {
        RenderStatus::ReadyToSubmit
    } else {
        RenderStatus::InProgress
    };

    RenderPayload {
        survey_id: spec.id.clone(),
        survey_title: spec.title.clone(),
        section: section_id,
        section_title: section
            .map(|section| section.title.clone())
            .unwrap_or_else(|| section_id.as_str().to_string()),
        intro: section.and_then(|section| section.intro.clone()),
        status,
        progress: RenderProgress {
            step: progress.path().len(),
            total: branch_length(progress),
        },
        can_go_back: !progress.is_submitted() && previous_section(section_id).is_some(),
        questions,
        error,
    }
}

fn answer_to_value(answer: &AnswerValue) -> Value {
    match answer {
        AnswerValue::Text(text) => Value::String(text.clone()),
        AnswerValue::Multi(options) => {
            Value::Array(options.iter().cloned().map(Value::String).collect())
        }
    }
}

/// Render the payload as a structured JSON-friendly value.
pub fn render_json_ui(payload: &RenderPayload) -> Value {
    let questions = payload
        .questions
        .iter()
        .map(|question| {
            let mut map = Map::new();
            map.insert("id".into(), Value::String(question.id.clone()));
            map.insert("title".into(), Value::String(question.title.clone()));
            map.insert(
                "description".into(),
                question
                    .description
                    .clone()
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            );
            map.insert(
                "type".into(),
                Value::String(question_type_label(question.kind).to_string()),
            );
            map.insert("required".into(), Value::Bool(question.required));
            map.insert("current_value".into(), question.current_value.clone());
            if !question.choices.is_empty() {
                map.insert(
                    "choices".into(),
                    Value::Array(
                        question
                            .choices
                            .iter()
                            .map(|(value, label)| json!({ "value": value, "label": label }))
                            .collect(),
                    ),
                );
            }
            Value::Object(map)
        })
        .collect::<Vec<_>>();

    json!({
        "survey_id": payload.survey_id,
        "survey_title": payload.survey_title,
        "section": payload.section.as_str(),
        "section_title": payload.section_title,
        "intro": payload.intro,
        "status": payload.status.as_str(),
        "progress": {
            "step": payload.progress.step,
            "total": payload.progress.total,
        },
        "can_go_back": payload.can_go_back,
        "error": payload.error,
        "questions": questions,
    })
}

/// Render the payload as human-friendly text.
pub fn render_text(payload: &RenderPayload) -> String {
    let mut lines = Vec::new();
    lines.push(payload.survey_title.clone());
    if payload.status == RenderStatus::Submitted {
        lines.push("Thank you! Your survey response has been submitted successfully.".into());
        return lines.join("\n");
    }
    lines.push(format!(
        "{} ({}/{})",
        payload.section_title, payload.progress.step, payload.progress.total
    ));
    if let Some(intro) = &payload.intro {
        lines.push(intro.clone());
    }
    if let Some(error) = &payload.error {
        lines.push(format!("Error: {}", error));
    }

    for (index, question) in payload.questions.iter().enumerate() {
        let mut entry = format!("{}. {}", index + 1, question.title);
        if question.required {
            entry.push_str(" *");
        }
        let current = value_to_display(&question.current_value);
        if !current.is_empty() {
            entry.push_str(&format!(" = {}", current));
        }
        lines.push(entry);
        if !question.choices.is_empty() {
            let choices = question
                .choices
                .iter()
                .map(|(value, label)| format!("{} ({})", value, label))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("   options: {}", choices));
        }
    }

    lines.push(match payload.status {
        RenderStatus::ReadyToSubmit => "Next: submit".to_string(),
        _ => "Next: continue".to_string(),
    });
    lines.join("\n")
}

pub fn question_type_label(kind: QuestionType) -> &'static str {
    match kind {
        QuestionType::Text => "text",
        QuestionType::Choice => "choice",
        QuestionType::MultiChoice => "multi_choice",
    }
}

pub fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_to_display)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
