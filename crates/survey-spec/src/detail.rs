use serde::Serialize;

use crate::aggregate::title_case;
use crate::filter::{Row, RowKey};
use crate::record::ResponseRecord;
use crate::spec::{Field, QuestionSpec, QuestionType, SectionId, SurveySpec};

/// Shown for every answer the respondent left blank.
pub const NOT_PROVIDED: &str = "Not provided";

/// One answer of a stored response, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailField {
    pub field: Field,
    pub label: String,
    pub value: String,
    pub provided: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailSection {
    pub id: SectionId,
    pub title: String,
    pub fields: Vec<DetailField>,
}

/// Every answer of one stored response, grouped by the section that asks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseDetail {
    pub key: RowKey,
    pub id: Option<String>,
    pub created_at: Option<String>,
    pub sections: Vec<DetailSection>,
}

/// Row with the given key, if any.
pub fn find_row<'a>(rows: &[Row<'a>], key: &str) -> Option<Row<'a>> {
    rows.iter().find(|row| row.key == key).cloned()
}

/// Labels every answer of `row` with its question title.
///
/// Choice tokens show their option label, or a title-cased token when the survey does not
/// know it. A question shared by both consent screens is listed once.
pub fn response_detail(spec: &SurveySpec, row: &Row<'_>) -> ResponseDetail {
    let mut seen: Vec<Field> = Vec::new();
    let mut sections = Vec::new();
    for id in SectionId::ALL {
        let Some(section) = spec.section(id) else {
            continue;
        };
        let fields = section
            .questions
            .iter()
            .filter(|question| {
                if seen.contains(&question.id) {
                    return false;
                }
                seen.push(question.id);
                true
            })
            .map(|question| detail_field(spec, question, row.record))
            .collect::<Vec<_>>();
        if !fields.is_empty() {
            sections.push(DetailSection {
                id,
                title: section.title.clone(),
                fields,
            });
        }
    }
    ResponseDetail {
        key: row.key.clone(),
        id: row.record.id.clone(),
        created_at: row.record.created_at.clone(),
        sections,
    }
}

fn detail_field(
    spec: &SurveySpec,
    question: &QuestionSpec,
    record: &ResponseRecord,
) -> DetailField {
    let field = question.id;
    let tokens: Vec<&str> = match record.list(field) {
        list if !list.is_empty() => list,
        _ => record.text(field).into_iter().collect(),
    };
    let shown = tokens
        .into_iter()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| match question.kind {
            QuestionType::Text => token.to_string(),
            QuestionType::Choice | QuestionType::MultiChoice => display_token(spec, field, token),
        })
        .collect::<Vec<_>>();
    let provided = !shown.is_empty();
    DetailField {
        field,
        label: question.title.clone(),
        value: if provided {
            shown.join(", ")
        } else {
            NOT_PROVIDED.to_string()
        },
        provided,
    }
}

fn display_token(spec: &SurveySpec, field: Field, token: &str) -> String {
    let label = spec.label_for(field, token);
    if label == token {
        title_case(token)
    } else {
        label.to_string()
    }
}

/// Plain-text detail view.
pub fn render_detail_text(detail: &ResponseDetail) -> String {
    let mut lines = vec!["Response Details".to_string()];
    lines.push(format!("Key: {}", detail.key));
    if let Some(created_at) = &detail.created_at {
        lines.push(format!("Submitted: {}", created_at));
    }
    for section in &detail.sections {
        lines.push(String::new());
        lines.push(section.title.clone());
        for field in &section.fields {
            lines.push(format!("  {}: {}", field.label, field.value));
        }
    }
    lines.join("\n")
}
