use serde_json::Value;

use crate::error::{FieldIssue, SurveyError};
use crate::record::SurveyDocument;
use crate::validate::base_required_fields;

/// Receiving-side minimum check: the base profile keys must be non-empty strings.
///
/// Runs independently of the client-side gate and reports every failing key.
pub fn check_minimum(document: &Value) -> Result<(), SurveyError> {
    let Some(object) = document.as_object() else {
        return Err(SurveyError::MalformedInput {
            message: "Invalid survey data".into(),
            details: vec![FieldIssue {
                field: String::new(),
                message: "expected a JSON object".into(),
            }],
        });
    };

    let details = base_required_fields()
        .filter_map(|field| {
            let message = match object.get(field.as_str()) {
                Some(Value::String(text)) if !text.is_empty() => return None,
                Some(Value::String(_)) => "must not be empty",
                Some(_) => "expected a string",
                None => "required",
            };
            Some(FieldIssue {
                field: field.as_str().to_string(),
                message: message.to_string(),
            })
        })
        .collect::<Vec<_>>();

    if details.is_empty() {
        Ok(())
    } else {
        Err(SurveyError::MalformedInput {
            message: "Invalid survey data".into(),
            details,
        })
    }
}

/// Parses a submission body into the stored document shape.
pub fn parse_submission(body: &str) -> Result<SurveyDocument, SurveyError> {
    let value: Value =
        serde_json::from_str(body).map_err(|_| SurveyError::malformed("Invalid JSON"))?;
    if let Err(err) = check_minimum(&value) {
        tracing::warn!(error = %err, "survey submission rejected");
        return Err(err);
    }
    serde_json::from_value(value).map_err(|err| SurveyError::MalformedInput {
        message: "Invalid survey data".into(),
        details: vec![FieldIssue {
            field: String::new(),
            message: err.to_string(),
        }],
    })
}
