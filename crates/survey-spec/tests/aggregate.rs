use serde_json::{Value, json};

use survey_spec::aggregate::Bucket;
use survey_spec::{
    ChartKind, Denominator, Field, OptionCounts, ResponseRecord, SurveyConfig, SurveySpec,
    count_by_option, render_dashboard_text, shares_with_placeholder, summarize, to_percentages,
};

fn fixture_records() -> Vec<ResponseRecord> {
    let values: Vec<Value> =
        serde_json::from_str(include_str!("fixtures/responses.json")).expect("fixture");
    values.into_iter().map(ResponseRecord::from_value).collect()
}

fn experience_records(yes: usize, no: usize) -> Vec<ResponseRecord> {
    std::iter::repeat_n("yes", yes)
        .chain(std::iter::repeat_n("no", no))
        .map(|answer| ResponseRecord::from_value(json!({ "mwaExperience": answer })))
        .collect()
}

#[test]
fn counts_and_percentages_of_total_records() {
    let records = experience_records(4, 6);
    let counts = count_by_option(&records, Field::MwaExperience, &["yes", "no"]);
    assert_eq!(counts.count("yes"), 4);
    assert_eq!(counts.count("no"), 6);

    let shares = to_percentages(&counts, Denominator::TotalRecords);
    let percents: Vec<i64> = shares.iter().map(|share| share.percent).collect();
    assert_eq!(percents, vec![40, 60]);
}

#[test]
fn aggregation_is_idempotent() {
    let records = fixture_records();
    let spec = SurveySpec::builtin().expect("builtin");
    let config = SurveyConfig::default();
    assert_eq!(
        summarize(&records, &spec, &config),
        summarize(&records, &spec, &config)
    );
}

#[test]
fn multi_select_counts_every_element_and_ignores_scalars() {
    let records = fixture_records();
    let spec = SurveySpec::builtin().expect("builtin");
    let counts = count_by_option(
        &records,
        Field::MwaIndications,
        &spec.vocabulary(Field::MwaIndications),
    );
    assert_eq!(counts.count("benign"), 2);
    assert_eq!(counts.count("cysts"), 1);
    assert_eq!(counts.total_selections(), 3);
}

#[test]
fn non_empty_charts_sum_to_one_hundred() {
    let records = fixture_records();
    let spec = SurveySpec::builtin().expect("builtin");
    let summary = summarize(&records, &spec, &SurveyConfig::default()).expect("summary");
    for chart in &summary.charts {
        let sum: i64 = chart.slices.iter().map(|slice| slice.percent).sum();
        let has_counts = chart.slices.iter().any(|slice| slice.count > 0);
        if has_counts || chart.placeholder {
            assert_eq!(sum, 100, "chart {}", chart.id);
        }
    }
}

#[test]
fn dashboard_headline_and_fallbacks() {
    let records = fixture_records();
    let spec = SurveySpec::builtin().expect("builtin");
    let summary = summarize(&records, &spec, &SurveyConfig::default()).expect("summary");
    assert_eq!(summary.total_responses, 4);
    assert_eq!(summary.mwa_aware, 2);
    assert_eq!(summary.not_aware, 2);
    assert_eq!(summary.awareness_rate, 50);

    let specialty = summary.chart("specialty").expect("specialty chart");
    let other = specialty
        .slices
        .iter()
        .find(|slice| slice.option == "other")
        .expect("missing specialty counted as other");
    assert_eq!(other.count, 1);

    let interest = summary.chart("mwa_interest").expect("interest chart");
    assert!(interest.placeholder);
    assert_eq!(interest.kind, ChartKind::Pie);
    let percents: Vec<i64> = interest.slices.iter().map(|slice| slice.percent).collect();
    assert_eq!(percents, vec![53, 34, 13]);

    let familiarity = summary.chart("mwa_familiarity").expect("familiarity chart");
    assert_eq!(familiarity.slices[0].label, "Yes - Familiar");
}

#[test]
fn answered_interest_question_uses_real_counts() {
    let records = vec![
        ResponseRecord::from_value(json!({ "mwaInterest": "maybe" })),
        ResponseRecord::from_value(json!({ "mwaInterest": "yes" })),
    ];
    let counts = count_by_option(&records, Field::MwaInterest, &["yes", "maybe", "no"]);
    let (shares, placeholder) = shares_with_placeholder(&counts, &[53, 34, 13]);
    assert!(!placeholder);
    let percents: Vec<i64> = shares.iter().map(|share| share.percent).collect();
    assert_eq!(percents, vec![50, 50, 0]);
}

#[test]
fn configured_placeholders_replace_defaults() {
    let spec = SurveySpec::builtin().expect("builtin");
    let mut config = SurveyConfig::default();
    config.placeholders.mwa_attend_cme = vec![10, 20, 70];
    let records = vec![ResponseRecord::from_value(json!({ "familiarWithMWA": "yes" }))];
    let summary = summarize(&records, &spec, &config).expect("summary");
    let chart = summary.chart("mwa_attend_cme").expect("cme chart");
    let percents: Vec<i64> = chart.slices.iter().map(|slice| slice.percent).collect();
    assert_eq!(percents, vec![10, 20, 70]);
}

#[test]
fn empty_input_has_no_summary() {
    let spec = SurveySpec::builtin().expect("builtin");
    assert!(summarize(&[], &spec, &SurveyConfig::default()).is_none());
}

#[test]
fn dashboard_text_lists_every_chart() {
    let records = fixture_records();
    let spec = SurveySpec::builtin().expect("builtin");
    let summary = summarize(&records, &spec, &SurveyConfig::default()).expect("summary");
    let text = render_dashboard_text(&summary).expect("render");
    assert!(text.contains("Total Responses: 4"));
    for chart in &summary.charts {
        assert!(text.contains(&chart.title), "missing {}", chart.title);
    }
}

fn counts_of(values: &[u64]) -> OptionCounts {
    OptionCounts {
        field: Field::MwaIndications,
        records: values.len() as u64,
        buckets: values
            .iter()
            .enumerate()
            .map(|(index, count)| Bucket {
                option: format!("option-{index}"),
                count: *count,
            })
            .collect(),
    }
}

#[test]
fn selection_percentages_always_sum_to_one_hundred() {
    const MAX: u64 = 7;
    for width in 3..=5u32 {
        for code in 0..(MAX + 1).pow(width) {
            let values: Vec<u64> = (0..width)
                .map(|digit| code / (MAX + 1).pow(digit) % (MAX + 1))
                .collect();
            let shares = to_percentages(&counts_of(&values), Denominator::TotalSelections);
            let sum: i64 = shares.iter().map(|share| share.percent).sum();
            if values.iter().sum::<u64>() > 0 {
                assert_eq!(sum, 100, "counts {values:?}");
            } else {
                assert_eq!(sum, 0, "counts {values:?}");
            }
        }
    }
}
