use serde_json::Value;

use survey_spec::{
    Field, NOT_PROVIDED, ResponseDetail, ResponseRecord, SectionId, SurveySpec, find_row,
    render_detail_text, response_detail, rows,
};

fn fixture_records() -> Vec<ResponseRecord> {
    let values: Vec<Value> =
        serde_json::from_str(include_str!("fixtures/responses.json")).expect("fixture");
    values.into_iter().map(ResponseRecord::from_value).collect()
}

fn detail_for(key: &str) -> ResponseDetail {
    let spec = SurveySpec::builtin().expect("builtin");
    let records = fixture_records();
    let all = rows(&records);
    let row = find_row(&all, key).expect("row");
    response_detail(&spec, &row)
}

fn value_of(detail: &ResponseDetail, field: Field) -> String {
    detail
        .sections
        .iter()
        .flat_map(|section| section.fields.iter())
        .find(|entry| entry.field == field)
        .map(|entry| entry.value.clone())
        .expect("field listed")
}

#[test]
fn labels_choices_and_joins_multi_selects() {
    let detail = detail_for("650000000000000000000001");
    assert_eq!(detail.id.as_deref(), Some("650000000000000000000001"));
    assert_eq!(value_of(&detail, Field::DoctorName), "Dr. Smith");
    assert_eq!(value_of(&detail, Field::Specialty), "Endocrinologist");
    assert_eq!(value_of(&detail, Field::YearsOfPractice), "10-20 years");
    assert_eq!(
        value_of(&detail, Field::MwaIndications),
        "Benign thyroid nodules, Recurrent thyroid cysts"
    );
    assert_eq!(value_of(&detail, Field::ProcedureCount), "25");
}

#[test]
fn blank_answers_read_not_provided() {
    let detail = detail_for("row-2");
    assert_eq!(value_of(&detail, Field::MwaInterest), NOT_PROVIDED);
    assert_eq!(value_of(&detail, Field::Complications), NOT_PROVIDED);
    let entry = detail.sections[0]
        .fields
        .iter()
        .find(|entry| entry.field == Field::SpecialtyOther)
        .expect("specialtyOther");
    assert!(!entry.provided);
}

#[test]
fn legacy_string_on_a_multi_select_is_still_shown() {
    let detail = detail_for("row-3");
    assert_eq!(value_of(&detail, Field::MwaIndications), "Benign thyroid nodules");
    assert_eq!(value_of(&detail, Field::Specialty), NOT_PROVIDED);
}

#[test]
fn every_question_is_listed_once_in_section_order() {
    let detail = detail_for("2");
    let order: Vec<SectionId> = detail.sections.iter().map(|section| section.id).collect();
    assert_eq!(
        order,
        vec![
            SectionId::A,
            SectionId::B,
            SectionId::C,
            SectionId::D,
            SectionId::Consent,
            SectionId::MwaInfo,
        ]
    );
    let listed: usize = detail.sections.iter().map(|section| section.fields.len()).sum();
    assert_eq!(listed, Field::ALL.len());
}

#[test]
fn unknown_tokens_are_title_cased() {
    let spec = SurveySpec::builtin().expect("builtin");
    let records = vec![ResponseRecord::from_value(serde_json::json!({
        "_id": "x",
        "specialty": "nuclear-medicine"
    }))];
    let all = rows(&records);
    let detail = response_detail(&spec, &all[0]);
    assert_eq!(value_of(&detail, Field::Specialty), "Nuclear Medicine");
    assert!(find_row(&all, "missing").is_none());
}

#[test]
fn text_view_lists_sections_and_answers() {
    let text = render_detail_text(&detail_for("2"));
    assert!(text.starts_with("Response Details\nKey: 2"));
    assert!(text.contains("Section B: Awareness & Knowledge"));
    assert!(text.contains("  Doctor's Name: Dr. Jones"));
    assert!(text.contains("  Specialty: ENT Specialist"));
}
