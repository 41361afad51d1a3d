use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::answers::AnswerSet;
use crate::spec::Field;

/// Version of the stored document layout.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Explicit document written to storage: a versioned answer set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDocument {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(flatten)]
    pub answers: AnswerSet,
}

impl SurveyDocument {
    pub fn new(answers: AnswerSet) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            answers,
        }
    }
}

/// Identity the store assigns to a persisted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMeta {
    #[serde(rename = "_id")]
    pub id: String,
    pub created_at: String,
}

/// A stored response as read back from the store.
///
/// Reads are deliberately loose: any field may be missing or carry an unexpected type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct ResponseRecord {
    pub id: Option<String>,
    pub created_at: Option<String>,
    pub fields: Map<String, Value>,
}

impl ResponseRecord {
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::default();
        };
        let id = fields.remove("_id").and_then(|id| match id {
            Value::String(id) => Some(id),
            Value::Object(object) => object
                .get("$oid")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        });
        let created_at = fields
            .remove("createdAt")
            .and_then(|value| value.as_str().map(str::to_string));
        Self {
            id,
            created_at,
            fields,
        }
    }

    /// Builds a record from answers, mainly for fixtures and previews.
    pub fn from_answers(id: Option<String>, answers: &AnswerSet) -> Self {
        let mut record = Self::from_value(answers.to_value());
        record.id = id;
        record
    }

    /// String value of `field`; `None` when absent or not a string.
    pub fn text(&self, field: Field) -> Option<&str> {
        self.fields.get(field.as_str()).and_then(Value::as_str)
    }

    pub fn text_or_empty(&self, field: Field) -> &str {
        self.text(field).unwrap_or("")
    }

    /// String elements of a list value; non-string elements and non-list values are skipped.
    pub fn list(&self, field: Field) -> Vec<&str> {
        self.fields
            .get(field.as_str())
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(id) = &self.id {
            map.insert("_id".into(), Value::String(id.clone()));
        }
        if let Some(created_at) = &self.created_at {
            map.insert("createdAt".into(), Value::String(created_at.clone()));
        }
        for (key, value) in &self.fields {
            map.insert(key.clone(), value.clone());
        }
        Value::Object(map)
    }
}

impl From<Value> for ResponseRecord {
    fn from(value: Value) -> Self {
        ResponseRecord::from_value(value)
    }
}

impl From<ResponseRecord> for Value {
    fn from(record: ResponseRecord) -> Self {
        record.to_value()
    }
}
