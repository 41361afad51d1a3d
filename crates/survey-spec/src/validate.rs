use crate::answers::AnswerSet;
use crate::error::MissingFieldError;
use crate::progress::SurveyProgress;
use crate::spec::{Field, SectionId, SurveySpec};

/// Required keys with their labels, in the order the gate checks them.
pub type RequiredFields = Vec<(Field, &'static str)>;

const BASE_REQUIRED: [(Field, &str); 7] = [
    (Field::DoctorName, "Doctor's Name"),
    (Field::HospitalName, "Hospital/Institution"),
    (Field::Specialty, "Specialty"),
    (Field::YearsOfPractice, "Years of Clinical Practice"),
    (Field::PracticeSetting, "Practice Setting"),
    (Field::ManagedThyroidPatients, "Managed Thyroid Patients"),
    (Field::FamiliarWithMwa, "Familiar with MWA"),
];

const AWARENESS_REQUIRED: [(Field, &str); 4] = [
    (Field::LearnedAboutMwa, "How did you learn about MWA"),
    (Field::MwaIndications, "MWA Indications"),
    (Field::MwaComparison, "MWA Comparison"),
    (Field::Contraindications, "Contraindications"),
];

/// The seven base keys, also enforced by the intake check.
pub fn base_required_fields() -> impl Iterator<Item = Field> {
    BASE_REQUIRED.iter().map(|(field, _)| *field)
}

/// Required keys for the current answers and section.
///
/// Only `Consent` adds the consent answer; `MWAConsent` does not.
pub fn required_fields_for(progress: &SurveyProgress) -> RequiredFields {
    required_fields(progress.answers(), progress.current_section())
}

pub fn required_fields(answers: &AnswerSet, section: SectionId) -> RequiredFields {
    let mut required: RequiredFields = BASE_REQUIRED.to_vec();
    if answers.text(Field::FamiliarWithMwa) == "yes" {
        required.extend(AWARENESS_REQUIRED);
    }
    if section == SectionId::Consent {
        required.push((Field::ReceiveUpdates, "Consent"));
    }
    required
}

/// Required keys asked on the current section only; used for per-step validation.
pub fn section_required_fields(spec: &SurveySpec, progress: &SurveyProgress) -> RequiredFields {
    let Some(section) = spec.section(progress.current_section()) else {
        return Vec::new();
    };
    required_fields_for(progress)
        .into_iter()
        .filter(|(field, _)| section.questions.iter().any(|question| question.id == *field))
        .collect()
}

/// Fails on the first required key whose value is empty.
pub fn validate(answers: &AnswerSet, required: &[(Field, &str)]) -> Result<(), MissingFieldError> {
    match required.iter().find(|(field, _)| answers.is_empty_value(*field)) {
        Some((field, label)) => {
            tracing::warn!(field = %field, "required answer missing");
            Err(MissingFieldError {
                field: *field,
                label: (*label).to_string(),
            })
        }
        None => Ok(()),
    }
}
