use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::field::Field;
use crate::spec::question::QuestionSpec;
use crate::spec::section::SectionId;

const BUILTIN_SURVEY: &str = include_str!("../../survey/thyroid_mwa.json");

/// One wizard screen and the questions it shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SectionSpec {
    pub id: SectionId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    pub questions: Vec<QuestionSpec>,
}

/// Top-level survey definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SurveySpec {
    pub id: String,
    pub title: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sections: Vec<SectionSpec>,
}

impl SurveySpec {
    /// The thyroid microwave-ablation questionnaire bundled with the crate.
    pub fn builtin() -> Result<Self, serde_json::Error> {
        serde_json::from_str(BUILTIN_SURVEY)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn section(&self, id: SectionId) -> Option<&SectionSpec> {
        self.sections.iter().find(|section| section.id == id)
    }

    /// First definition of the question; consent questions appear on both consent screens.
    pub fn question(&self, field: Field) -> Option<&QuestionSpec> {
        self.sections
            .iter()
            .flat_map(|section| section.questions.iter())
            .find(|question| question.id == field)
    }

    /// Option tokens in display order; empty for free-text or unknown questions.
    pub fn vocabulary(&self, field: Field) -> Vec<&str> {
        self.question(field)
            .map(|question| {
                question
                    .choices
                    .iter()
                    .map(|choice| choice.value.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn label_for<'a>(&'a self, field: Field, token: &'a str) -> &'a str {
        self.question(field)
            .and_then(|question| question.label_for(token))
            .unwrap_or(token)
    }

    /// JSON schema describing the survey definition format.
    pub fn definition_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(SurveySpec)).unwrap_or_default()
    }
}
