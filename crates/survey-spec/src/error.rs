use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spec::{Field, SectionId};

/// A required question left empty at the pre-submission gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please fill out the required field: {label}")]
pub struct MissingFieldError {
    pub field: Field,
    pub label: String,
}

/// One entry of a structured rejection returned by the intake check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// Failures of the storage collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SurveyError {
    #[error(transparent)]
    MissingField(#[from] MissingFieldError),
    #[error("{message}")]
    MalformedInput {
        message: String,
        details: Vec<FieldIssue>,
    },
    #[error("Failed to save survey")]
    Persistence(#[source] StoreError),
    #[error("Failed to fetch responses")]
    Fetch(#[source] StoreError),
    #[error("section {0} does not submit the survey")]
    NotSubmittable(SectionId),
    #[error("survey definition is invalid: {0}")]
    Spec(#[source] serde_json::Error),
    #[error("failed to load config: {0}")]
    Config(String),
}

impl SurveyError {
    pub fn malformed(message: impl Into<String>) -> Self {
        SurveyError::MalformedInput {
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Stable code used in JSON envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            SurveyError::MissingField(_) => "missing_field",
            SurveyError::MalformedInput { .. } => "malformed_input",
            SurveyError::Persistence(_) => "persistence",
            SurveyError::Fetch(_) => "fetch",
            SurveyError::NotSubmittable(_) => "not_submittable",
            SurveyError::Spec(_) => "spec",
            SurveyError::Config(_) => "config",
        }
    }
}
