use survey_spec::{
    Field, RenderStatus, SectionId, SurveyProgress, SurveySpec, build_render_payload,
    render_json_ui, render_text,
};

fn spec() -> SurveySpec {
    SurveySpec::builtin().expect("builtin survey")
}

#[test]
fn first_section_renders_profile_questions() {
    let spec = spec();
    let progress = SurveyProgress::new();
    let payload = build_render_payload(&spec, &progress, None);

    assert_eq!(payload.section, SectionId::A);
    assert_eq!(payload.status, RenderStatus::InProgress);
    assert!(!payload.can_go_back);
    assert_eq!(payload.progress.step, 1);
    assert_eq!(payload.progress.total, 5);

    let doctor = payload
        .questions
        .iter()
        .find(|question| question.id == "doctorName")
        .expect("doctor question");
    assert!(doctor.required);
    let other = payload
        .questions
        .iter()
        .find(|question| question.id == "specialtyOther")
        .expect("specialty other");
    assert!(!other.required);
}

#[test]
fn json_ui_exposes_choices_and_values() {
    let spec = spec();
    let mut progress = SurveyProgress::new();
    progress.set_answer(Field::Specialty, "ent");
    let payload = build_render_payload(&spec, &progress, Some("Please fill out".into()));

    let ui = render_json_ui(&payload);
    assert_eq!(ui["section"], "A");
    assert_eq!(ui["status"], "in_progress");
    assert_eq!(ui["error"], "Please fill out");
    let questions = ui["questions"].as_array().expect("questions array");
    let specialty = questions
        .iter()
        .find(|question| question["id"] == "specialty")
        .expect("specialty");
    assert_eq!(specialty["current_value"], "ent");
    assert_eq!(specialty["type"], "choice");
    assert_eq!(specialty["choices"][1]["value"], "ent");
}

#[test]
fn short_branch_reports_its_own_length() {
    let spec = spec();
    let mut progress = SurveyProgress::new();
    progress.set_answer(Field::FamiliarWithMwa, "no");
    progress.advance();
    let payload = build_render_payload(&spec, &progress, None);
    assert_eq!(payload.section, SectionId::MwaInfo);
    assert_eq!(payload.progress.step, 2);
    assert_eq!(payload.progress.total, 3);
    assert!(payload.can_go_back);

    progress.advance();
    let payload = build_render_payload(&spec, &progress, None);
    assert_eq!(payload.status, RenderStatus::ReadyToSubmit);
    let consent = payload
        .questions
        .iter()
        .find(|question| question.id == "receiveUpdates")
        .expect("consent question");
    assert!(!consent.required);
}

#[test]
fn consent_section_requires_consent_answer() {
    let spec = spec();
    let mut progress = SurveyProgress::new();
    progress.set_answer(Field::FamiliarWithMwa, "yes");
    for _ in 0..4 {
        progress.advance();
    }
    let payload = build_render_payload(&spec, &progress, None);
    assert_eq!(payload.section, SectionId::Consent);
    let consent = payload
        .questions
        .iter()
        .find(|question| question.id == "receiveUpdates")
        .expect("consent question");
    assert!(consent.required);

    let text = render_text(&payload);
    assert!(text.contains("Next: submit"));
}

#[test]
fn submitted_state_renders_thank_you() {
    let spec = spec();
    let mut progress = SurveyProgress::new();
    progress.set_answer(Field::FamiliarWithMwa, "no");
    for _ in 0..3 {
        progress.advance();
    }
    let payload = build_render_payload(&spec, &progress, None);
    assert_eq!(payload.status, RenderStatus::Submitted);
    assert!(!payload.can_go_back);
    assert!(render_text(&payload).contains("Thank you"));
}
