use survey_spec::{
    AnswerSet, Field, SectionId, SurveyError, SurveySpec, answers_schema, check_minimum,
    required_fields, validate,
};

fn filled(familiar: &str) -> AnswerSet {
    let mut answers = AnswerSet::new();
    answers.set_answer(Field::DoctorName, "Dr. A");
    answers.set_answer(Field::HospitalName, "General");
    answers.set_answer(Field::Specialty, "ent");
    answers.set_answer(Field::YearsOfPractice, "5-10");
    answers.set_answer(Field::PracticeSetting, "private");
    answers.set_answer(Field::ManagedThyroidPatients, "yes");
    answers.set_answer(Field::FamiliarWithMwa, familiar);
    answers
}

#[test]
fn first_missing_field_is_reported() {
    let mut answers = filled("no");
    answers.set_answer(Field::HospitalName, "");
    answers.set_answer(Field::PracticeSetting, "");
    let required = required_fields(&answers, SectionId::MwaConsent);
    let err = validate(&answers, &required).expect_err("missing");
    assert_eq!(err.field, Field::HospitalName);
    assert_eq!(
        err.to_string(),
        "Please fill out the required field: Hospital/Institution"
    );
}

#[test]
fn awareness_fields_required_only_when_familiar() {
    let answers = filled("no");
    let required = required_fields(&answers, SectionId::MwaConsent);
    assert_eq!(required.len(), 7);
    assert!(validate(&answers, &required).is_ok());

    let answers = filled("yes");
    let required = required_fields(&answers, SectionId::D);
    assert_eq!(required.len(), 11);
    let err = validate(&answers, &required).expect_err("awareness missing");
    assert_eq!(err.field, Field::LearnedAboutMwa);
}

#[test]
fn empty_multi_select_counts_as_missing() {
    let mut answers = filled("yes");
    answers.set_answer(Field::LearnedAboutMwa, "conference");
    answers.toggle_multi_value(Field::MwaIndications, "benign", true);
    answers.toggle_multi_value(Field::MwaIndications, "benign", false);
    let required = required_fields(&answers, SectionId::D);
    let err = validate(&answers, &required).expect_err("indications missing");
    assert_eq!(err.field, Field::MwaIndications);
    assert_eq!(err.label, "MWA Indications");
}

#[test]
fn consent_answer_required_only_on_consent_section() {
    let mut answers = filled("yes");
    answers.set_answer(Field::LearnedAboutMwa, "conference");
    answers.toggle_multi_value(Field::MwaIndications, "benign", true);
    answers.set_answer(Field::MwaComparison, "more-effective");
    answers.set_answer(Field::Contraindications, "None");

    let err = validate(&answers, &required_fields(&answers, SectionId::Consent))
        .expect_err("consent missing");
    assert_eq!(err.label, "Consent");

    let answers = filled("no");
    assert!(validate(&answers, &required_fields(&answers, SectionId::MwaConsent)).is_ok());
}

#[test]
fn receiving_side_check_accepts_gate_output() {
    let answers = filled("no");
    assert!(check_minimum(&answers.to_value()).is_ok());

    let err = check_minimum(&AnswerSet::new().to_value()).expect_err("empty");
    match err {
        SurveyError::MalformedInput { details, .. } => assert_eq!(details.len(), 7),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn schema_marks_base_fields_required() {
    let spec = SurveySpec::builtin().expect("builtin");
    let schema = answers_schema(&spec);
    let required = schema["required"].as_array().expect("required");
    assert!(required.iter().any(|value| value == "familiarWithMWA"));
    assert!(!required.iter().any(|value| value == "receiveUpdates"));
}
