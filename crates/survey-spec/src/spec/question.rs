use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::field::Field;

/// Supported answer widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Free text.
    Text,
    /// Exactly one token out of `choices`.
    Choice,
    /// Any subset of `choices`.
    MultiChoice,
}

/// A selectable token and its display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

/// Question definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionSpec {
    pub id: Field,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ChoiceOption>,
    /// Free-text companion filled in when an "other" style choice is picked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_field: Option<Field>,
}

impl QuestionSpec {
    pub fn label_for(&self, token: &str) -> Option<&str> {
        self.choices
            .iter()
            .find(|choice| choice.value == token)
            .map(|choice| choice.label.as_str())
    }
}
