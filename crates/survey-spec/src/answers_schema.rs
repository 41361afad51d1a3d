use serde_json::{Map, Value, json};

use crate::record::SCHEMA_VERSION;
use crate::spec::{Field, QuestionType, SurveySpec};
use crate::validate::base_required_fields;

/// JSON Schema of a stored survey document for the given definition.
///
/// Closed questions constrain values to their vocabulary. Only the base fields are listed
/// as required, since the remaining requirements depend on the branch taken.
pub fn generate(spec: &SurveySpec) -> Value {
    let mut properties = Map::new();
    properties.insert(
        "schemaVersion".into(),
        json!({ "type": "integer", "const": SCHEMA_VERSION }),
    );

    for field in Field::ALL {
        let schema = match spec.question(field) {
            Some(question) => {
                question_schema(question.kind, &spec.vocabulary(field), &question.title)
            }
            None if field.is_multi() => json!({ "type": "array", "items": { "type": "string" } }),
            None => json!({ "type": "string" }),
        };
        properties.insert(field.as_str().to_string(), schema);
    }

    let required = base_required_fields()
        .map(|field| Value::String(field.as_str().to_string()))
        .collect::<Vec<_>>();

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": format!("{} answers", spec.title),
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": true,
    })
}

fn question_schema(kind: QuestionType, vocabulary: &[&str], title: &str) -> Value {
    match kind {
        QuestionType::Text => json!({ "type": "string", "title": title }),
        QuestionType::Choice => {
            let mut allowed: Vec<Value> = vocabulary.iter().map(|token| json!(token)).collect();
            // Unanswered questions are stored as empty strings.
            allowed.push(json!(""));
            json!({ "type": "string", "title": title, "enum": allowed })
        }
        QuestionType::MultiChoice => json!({
            "type": "array",
            "title": title,
            "items": { "type": "string", "enum": vocabulary },
            "uniqueItems": true,
        }),
    }
}
