use serde::{Deserialize, Serialize};

use crate::answers::{AnswerSet, AnswerValue};
use crate::spec::{Field, SectionId};

/// Outcome of pressing "next" on a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Section(SectionId),
    Submit,
}

/// Transition table of the wizard. Section A is the only fork.
pub fn next_step(from: SectionId, answers: &AnswerSet) -> Step {
    match from {
        SectionId::A if answers.text(Field::FamiliarWithMwa) == "no" => {
            Step::Section(SectionId::MwaInfo)
        }
        SectionId::A => Step::Section(SectionId::B),
        SectionId::B => Step::Section(SectionId::C),
        SectionId::C => Step::Section(SectionId::D),
        SectionId::D => Step::Section(SectionId::Consent),
        SectionId::MwaInfo => Step::Section(SectionId::MwaConsent),
        SectionId::Consent | SectionId::MwaConsent => Step::Submit,
    }
}

pub fn previous_section(from: SectionId) -> Option<SectionId> {
    match from {
        SectionId::A => None,
        SectionId::B => Some(SectionId::A),
        SectionId::C => Some(SectionId::B),
        SectionId::D => Some(SectionId::C),
        SectionId::Consent => Some(SectionId::D),
        SectionId::MwaInfo => Some(SectionId::A),
        SectionId::MwaConsent => Some(SectionId::MwaInfo),
    }
}

/// Mutable wizard state: the answers, the visible section and the terminal flag.
///
/// Navigation never validates; callers run [`crate::validate`] first where it matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SurveyProgress {
    answers: AnswerSet,
    current_section: SectionId,
    #[serde(default)]
    submitted: bool,
}

impl SurveyProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answers(answers: AnswerSet) -> Self {
        Self {
            answers,
            ..Self::default()
        }
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn current_section(&self) -> SectionId {
        self.current_section
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn set_answer(&mut self, field: Field, value: impl Into<AnswerValue>) {
        self.answers.set_answer(field, value);
    }

    pub fn toggle_multi_value(&mut self, field: Field, option: &str, included: bool) {
        self.answers.toggle_multi_value(field, option, included);
    }

    /// Moves to the successor section, or sets the terminal flag from a final section.
    pub fn advance(&mut self) -> Step {
        let step = next_step(self.current_section, &self.answers);
        if self.submitted {
            return step;
        }
        match step {
            Step::Section(next) => {
                tracing::debug!(from = %self.current_section, to = %next, "advance section");
                self.current_section = next;
            }
            Step::Submit => {
                tracing::debug!(from = %self.current_section, "survey submitted");
                self.submitted = true;
            }
        }
        step
    }

    /// Moves back one section; returns the new section, or `None` when already at the start.
    pub fn retreat(&mut self) -> Option<SectionId> {
        if self.submitted {
            return None;
        }
        let previous = previous_section(self.current_section)?;
        tracing::debug!(from = %self.current_section, to = %previous, "retreat section");
        self.current_section = previous;
        Some(previous)
    }

    /// Sections visited so far on the current branch, ending with the current one.
    pub fn path(&self) -> Vec<SectionId> {
        let mut path = vec![self.current_section];
        let mut cursor = self.current_section;
        while let Some(previous) = previous_section(cursor) {
            path.push(previous);
            cursor = previous;
        }
        path.reverse();
        path
    }
}
