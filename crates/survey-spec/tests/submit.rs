use survey_spec::{
    AnswerSet, Field, JsonlStore, MemoryStore, ResponseStore, SectionId, SubmissionClient,
    SurveyError, SurveyProgress,
};

fn base_answers(familiar: &str) -> AnswerSet {
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

fn at_mwa_consent() -> SurveyProgress {
    let mut progress = SurveyProgress::with_answers(base_answers("no"));
    progress.advance();
    progress.advance();
    assert_eq!(progress.current_section(), SectionId::MwaConsent);
    progress
}

#[test]
fn short_branch_submission_is_persisted() {
    let mut client = SubmissionClient::new(MemoryStore::new());
    let mut progress = at_mwa_consent();
    progress.set_answer(Field::MwaInterest, "maybe");

    let meta = client.submit(&mut progress).expect("submit");
    assert!(progress.is_submitted());
    assert_eq!(client.store().len(), 1);

    let records = client.fetch().expect("fetch");
    assert_eq!(records[0].id.as_deref(), Some(meta.id.as_str()));
    assert_eq!(records[0].text(Field::MwaInterest), Some("maybe"));
}

#[test]
fn submission_only_from_final_sections() {
    let mut client = SubmissionClient::new(MemoryStore::new());
    let mut progress = SurveyProgress::with_answers(base_answers("no"));
    let err = client.submit(&mut progress).expect_err("section A");
    assert!(matches!(err, SurveyError::NotSubmittable(SectionId::A)));
    assert!(client.store().is_empty());
}

#[test]
fn gate_failure_leaves_state_untouched() {
    let mut client = SubmissionClient::new(MemoryStore::new());
    let mut progress = SurveyProgress::with_answers(base_answers("yes"));
    for _ in 0..4 {
        progress.advance();
    }
    let before = progress.clone();
    let err = client.submit(&mut progress).expect_err("awareness missing");
    assert_eq!(err.code(), "missing_field");
    assert_eq!(
        err.to_string(),
        "Please fill out the required field: How did you learn about MWA"
    );
    assert_eq!(progress, before);
    assert!(client.store().is_empty());
}

#[test]
fn second_submission_is_rejected() {
    let mut client = SubmissionClient::new(MemoryStore::new());
    let mut progress = at_mwa_consent();
    client.submit(&mut progress).expect("first submit");
    let err = client.submit(&mut progress).expect_err("second submit");
    assert_eq!(err.to_string(), "Survey already submitted");
    assert_eq!(client.into_store().len(), 1);
}

#[test]
fn storage_failure_is_reported_and_retryable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut client = SubmissionClient::new(JsonlStore::new(dir.path()));
    let mut progress = at_mwa_consent();
    let err = client.submit(&mut progress).expect_err("directory is not a file");
    assert_eq!(err.to_string(), "Failed to save survey");
    assert!(!progress.is_submitted());
}

#[test]
fn fetch_failure_maps_to_fetch_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("responses.jsonl");
    std::fs::write(&path, "garbage\n").expect("write");
    let client = SubmissionClient::new(JsonlStore::new(&path));
    let err = client.fetch().expect_err("corrupt");
    assert_eq!(err.to_string(), "Failed to fetch responses");
}

#[test]
fn jsonl_store_accumulates_submissions() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("responses.jsonl");
    let mut client = SubmissionClient::new(JsonlStore::new(&path));
    for name in ["Dr. A", "Dr. B"] {
        let mut progress = at_mwa_consent();
        progress.set_answer(Field::DoctorName, name);
        client.submit(&mut progress).expect("submit");
    }
    let records = JsonlStore::new(&path).fetch_all().expect("fetch");
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].text(Field::DoctorName), Some("Dr. B"));
}
