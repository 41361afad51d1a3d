use serde_json::Value;

use survey_spec::{
    EXPORT_HEADERS, ResponseRecord, Selection, TableFilter, export_file_name, export_rows, rows,
    specialty_options,
};

fn fixture_records() -> Vec<ResponseRecord> {
    let values: Vec<Value> =
        serde_json::from_str(include_str!("fixtures/responses.json")).expect("fixture");
    values.into_iter().map(ResponseRecord::from_value).collect()
}

fn names(records: &[&ResponseRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.text_or_empty(survey_spec::Field::DoctorName).to_string())
        .collect()
}

#[test]
fn search_is_case_insensitive_substring() {
    let records = fixture_records();
    let filter = TableFilter::new("dr. smith", "all", "all");
    assert_eq!(
        names(&filter.apply(&records)),
        vec!["Dr. Smith".to_string(), "dr. smithers".to_string()]
    );
}

#[test]
fn search_covers_hospital_and_specialty() {
    let records = fixture_records();
    assert_eq!(
        names(&TableFilter::new("SMITHFIELD", "all", "all").apply(&records)),
        vec!["Dr. Jones".to_string()]
    );
    assert_eq!(
        names(&TableFilter::new("surg", "all", "all").apply(&records)),
        vec!["dr. smithers".to_string()]
    );
}

#[test]
fn dropdown_filters_match_exactly() {
    let records = fixture_records();
    assert_eq!(
        names(&TableFilter::new("", "ent", "all").apply(&records)),
        vec!["Dr. Jones".to_string()]
    );
    assert_eq!(
        names(&TableFilter::new("", "all", "yes").apply(&records)),
        vec!["Dr. Smith".to_string()]
    );
    assert!(TableFilter::new("", "en", "all").apply(&records).is_empty());
    assert_eq!(TableFilter::default().apply(&records).len(), records.len());
}

#[test]
fn specialty_options_are_distinct() {
    let records = fixture_records();
    assert_eq!(
        specialty_options(&records),
        vec!["endocrinologist", "ent", "surgeon"]
    );
}

#[test]
fn row_keys_use_ids_or_full_list_position() {
    let records = fixture_records();
    let all = rows(&records);
    let keys: Vec<&str> = all.iter().map(|row| row.key.as_str()).collect();
    assert_eq!(keys, vec!["650000000000000000000001", "2", "row-2", "row-3"]);

    let filtered = TableFilter::new("regional", "all", "all").apply_rows(&all);
    assert_eq!(filtered[0].key, "row-2");
}

#[test]
fn select_all_replaces_selection_with_filtered_rows() {
    let records = fixture_records();
    let all = rows(&records);
    let mut selection = Selection::new();
    selection.toggle("2", true);

    let filtered = TableFilter::new("dr. smith", "all", "all").apply_rows(&all);
    selection.select_all(&filtered, true);
    assert_eq!(selection.len(), 2);
    assert!(!selection.contains("2"));
    assert!(selection.contains("row-2"));

    selection.select_all(&filtered, false);
    assert!(selection.is_empty());
}

#[test]
fn export_selected_rows() {
    let records = fixture_records();
    let all = rows(&records);
    let mut selection = Selection::new();
    selection.toggle("650000000000000000000001", true);
    selection.toggle("row-3", true);
    selection.toggle("row-3", false);
    selection.toggle("2", true);

    let chosen = selection.selected(&all);
    let csv = export_rows(chosen.iter().copied());
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], EXPORT_HEADERS.join(","));
    assert!(lines[1].starts_with("\"Dr. Smith\",\"City General\",\"endocrinologist\""));
    assert!(lines[1].contains("\"benign; cysts\""));
    assert!(lines[1].ends_with("\"Promising, \"\"needs\"\" more data\""));
    assert!(lines[2].contains("\"\",\"benign\",\"\",\"\""));
    assert_eq!(
        export_file_name(Some(selection.len())),
        "selected-doctors-survey-2.csv"
    );
}

#[test]
fn export_with_no_rows_is_header_only() {
    let csv = export_rows(std::iter::empty::<&ResponseRecord>());
    assert_eq!(csv, EXPORT_HEADERS.join(","));
}
