use serde::Serialize;

use crate::config::{SurveyConfig, Theme};
use crate::record::ResponseRecord;
use crate::spec::{Field, SurveySpec};

/// Occurrences of one option token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub option: String,
    pub count: u64,
}

/// Per-option counts of one question across a record list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionCounts {
    pub field: Field,
    /// Number of records inspected, whether or not they answered.
    pub records: u64,
    pub buckets: Vec<Bucket>,
}

impl OptionCounts {
    pub fn total_selections(&self) -> u64 {
        self.buckets.iter().map(|bucket| bucket.count).sum()
    }

    pub fn count(&self, option: &str) -> u64 {
        self.buckets
            .iter()
            .find(|bucket| bucket.option == option)
            .map(|bucket| bucket.count)
            .unwrap_or(0)
    }

    pub fn is_all_zero(&self) -> bool {
        self.buckets.iter().all(|bucket| bucket.count == 0)
    }
}

/// What a percentage is taken of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Denominator {
    /// Every record, including those that left the question blank.
    TotalRecords,
    /// The sum of the counts; used for multi-select questions.
    TotalSelections,
}

/// A bucket with its display percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Share {
    pub option: String,
    pub count: u64,
    pub percent: i64,
}

/// Counts vocabulary tokens for `field`.
///
/// Scalar keys count exact matches; multi-select keys count every matching element, so one
/// record can land in several buckets. Missing, mistyped and unknown values are skipped.
pub fn count_by_option(
    records: &[ResponseRecord],
    field: Field,
    vocabulary: &[&str],
) -> OptionCounts {
    let mut buckets: Vec<Bucket> = vocabulary
        .iter()
        .map(|option| Bucket {
            option: option.to_string(),
            count: 0,
        })
        .collect();

    let mut bump = |token: &str| {
        if let Some(bucket) = buckets.iter_mut().find(|bucket| bucket.option == token) {
            bucket.count += 1;
        }
    };

    for record in records {
        if field.is_multi() {
            record.list(field).into_iter().for_each(&mut bump);
        } else if let Some(token) = record.text(field) {
            bump(token);
        }
    }

    OptionCounts {
        field,
        records: records.len() as u64,
        buckets,
    }
}

/// Rounded percentages of `denominator`, corrected so a non-empty set sums to exactly 100.
///
/// The rounding remainder goes to the first largest entry. A zero denominator yields zeros.
pub fn percentages(counts: &[u64], denominator: u64) -> Vec<i64> {
    if denominator == 0 {
        return vec![0; counts.len()];
    }
    let mut percents: Vec<i64> = counts
        .iter()
        .map(|count| ((*count as f64 / denominator as f64) * 100.0).round() as i64)
        .collect();
    let sum: i64 = percents.iter().sum();
    let has_counts = counts.iter().any(|count| *count > 0);
    if sum != 100 && has_counts {
        let mut largest = 0;
        for (index, percent) in percents.iter().enumerate() {
            if *percent > percents[largest] {
                largest = index;
            }
        }
        percents[largest] += 100 - sum;
    }
    percents
}

pub fn to_percentages(counts: &OptionCounts, mode: Denominator) -> Vec<Share> {
    let denominator = match mode {
        Denominator::TotalRecords => counts.records,
        Denominator::TotalSelections => counts.total_selections(),
    };
    let raw: Vec<u64> = counts.buckets.iter().map(|bucket| bucket.count).collect();
    counts
        .buckets
        .iter()
        .zip(percentages(&raw, denominator))
        .map(|(bucket, percent)| Share {
            option: bucket.option.clone(),
            count: bucket.count,
            percent,
        })
        .collect()
}

/// Percentages for an interest question, substituting the placeholder distribution when nobody
/// answered it. The flag reports whether the placeholder was used.
pub fn shares_with_placeholder(
    counts: &OptionCounts,
    placeholder: &[u32],
) -> (Vec<Share>, bool) {
    if !counts.is_all_zero() {
        return (to_percentages(counts, Denominator::TotalSelections), false);
    }
    let shares = counts
        .buckets
        .iter()
        .enumerate()
        .map(|(index, bucket)| Share {
            option: bucket.option.clone(),
            count: 0,
            percent: placeholder.get(index).copied().map(i64::from).unwrap_or(0),
        })
        .collect();
    (shares, true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slice {
    pub option: String,
    pub label: String,
    pub count: u64,
    pub percent: i64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chart {
    pub id: String,
    pub title: String,
    pub kind: ChartKind,
    /// True when the slices show the configured placeholder distribution.
    pub placeholder: bool,
    pub slices: Vec<Slice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_responses: u64,
    pub mwa_aware: u64,
    pub not_aware: u64,
    pub awareness_rate: i64,
    pub charts: Vec<Chart>,
}

impl DashboardSummary {
    pub fn chart(&self, id: &str) -> Option<&Chart> {
        self.charts.iter().find(|chart| chart.id == id)
    }
}

struct ChartBuilder<'a> {
    spec: &'a SurveySpec,
    theme: &'a Theme,
}

impl ChartBuilder<'_> {
    fn build(
        &self,
        id: &str,
        title: &str,
        kind: ChartKind,
        field: Field,
        shares: Vec<Share>,
        placeholder: bool,
    ) -> Chart {
        let slices = shares
            .into_iter()
            .enumerate()
            .map(|(index, share)| Slice {
                label: self.label(field, &share.option),
                color: self.theme.color(index).to_string(),
                option: share.option,
                count: share.count,
                percent: share.percent,
            })
            .collect();
        Chart {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            placeholder,
            slices,
        }
    }

    fn label(&self, field: Field, token: &str) -> String {
        match self.spec.question(field).and_then(|q| q.label_for(token)) {
            Some(label) => label.to_string(),
            None => title_case(token),
        }
    }

    fn counted(
        &self,
        records: &[ResponseRecord],
        id: &str,
        title: &str,
        kind: ChartKind,
        field: Field,
        mode: Denominator,
    ) -> Chart {
        let vocabulary = self.spec.vocabulary(field);
        let counts = count_by_option(records, field, &vocabulary);
        self.build(id, title, kind, field, to_percentages(&counts, mode), false)
    }

    fn with_placeholder(
        &self,
        records: &[ResponseRecord],
        id: &str,
        title: &str,
        field: Field,
        placeholder: &[u32],
    ) -> Chart {
        let vocabulary = self.spec.vocabulary(field);
        let counts = count_by_option(records, field, &vocabulary);
        let (shares, used) = shares_with_placeholder(&counts, placeholder);
        self.build(id, title, ChartKind::Pie, field, shares, used)
    }
}

/// Specialty buckets: known tokens in catalog order, then unknown ones as first seen.
/// A record without a specialty counts as "other".
fn specialty_counts(records: &[ResponseRecord], spec: &SurveySpec) -> OptionCounts {
    let mut buckets: Vec<Bucket> = Vec::new();
    for record in records {
        let token = record
            .text(Field::Specialty)
            .filter(|token| !token.is_empty())
            .unwrap_or("other");
        match buckets.iter_mut().find(|bucket| bucket.option == token) {
            Some(bucket) => bucket.count += 1,
            None => buckets.push(Bucket {
                option: token.to_string(),
                count: 1,
            }),
        }
    }
    let vocabulary = spec.vocabulary(Field::Specialty);
    buckets.sort_by_key(|bucket| {
        vocabulary
            .iter()
            .position(|token| *token == bucket.option)
            .unwrap_or(vocabulary.len())
    });
    OptionCounts {
        field: Field::Specialty,
        records: records.len() as u64,
        buckets,
    }
}

/// Derives every dashboard chart from the fetched records. `None` when there is nothing to show.
pub fn summarize(
    records: &[ResponseRecord],
    spec: &SurveySpec,
    config: &SurveyConfig,
) -> Option<DashboardSummary> {
    if records.is_empty() {
        return None;
    }
    let builder = ChartBuilder {
        spec,
        theme: &config.theme,
    };

    let total_responses = records.len() as u64;
    let mwa_aware = records
        .iter()
        .filter(|record| record.text(Field::FamiliarWithMwa) == Some("yes"))
        .count() as u64;
    let not_aware = total_responses - mwa_aware;
    let awareness_rate = ((mwa_aware as f64 / total_responses as f64) * 100.0).round() as i64;

    let familiarity = OptionCounts {
        field: Field::FamiliarWithMwa,
        records: total_responses,
        buckets: vec![
            Bucket {
                option: "yes".into(),
                count: mwa_aware,
            },
            Bucket {
                option: "no".into(),
                count: not_aware,
            },
        ],
    };
    let mut familiarity_chart = builder.build(
        "mwa_familiarity",
        "Are you familiar with MWA? (%)",
        ChartKind::Pie,
        Field::FamiliarWithMwa,
        to_percentages(&familiarity, Denominator::TotalRecords),
        false,
    );
    for slice in &mut familiarity_chart.slices {
        slice.label = match slice.option.as_str() {
            "yes" => "Yes - Familiar".into(),
            _ => "No - Not Familiar".into(),
        };
    }

    let specialties = specialty_counts(records, spec);
    let charts = vec![
        builder.build(
            "specialty",
            "Specialty Distribution",
            ChartKind::Pie,
            Field::Specialty,
            to_percentages(&specialties, Denominator::TotalSelections),
            false,
        ),
        builder.counted(
            records,
            "years_of_practice",
            "Years of Practice (%)",
            ChartKind::Bar,
            Field::YearsOfPractice,
            Denominator::TotalRecords,
        ),
        builder.counted(
            records,
            "practice_setting",
            "Practice Setting (%)",
            ChartKind::Pie,
            Field::PracticeSetting,
            Denominator::TotalRecords,
        ),
        familiarity_chart,
        builder.counted(
            records,
            "mwa_comparison",
            "MWA vs Other Thermal Ablation Techniques (%)",
            ChartKind::Bar,
            Field::MwaComparison,
            Denominator::TotalRecords,
        ),
        builder.counted(
            records,
            "mwa_indications",
            "Indications for MWA",
            ChartKind::Bar,
            Field::MwaIndications,
            Denominator::TotalSelections,
        ),
        builder.counted(
            records,
            "observed_outcomes",
            "Patient Outcomes Observed (%)",
            ChartKind::Pie,
            Field::ObservedOutcomes,
            Denominator::TotalSelections,
        ),
        builder.counted(
            records,
            "complications",
            "Complications Encountered (%)",
            ChartKind::Pie,
            Field::Complications,
            Denominator::TotalSelections,
        ),
        builder.with_placeholder(
            records,
            "mwa_interest",
            "Interest in Learning More About MWA",
            Field::MwaInterest,
            &config.placeholders.mwa_interest,
        ),
        builder.with_placeholder(
            records,
            "mwa_attend_cme",
            "CME Workshop Attendance Interest",
            Field::MwaAttendCme,
            &config.placeholders.mwa_attend_cme,
        ),
    ];

    tracing::debug!(
        total = total_responses,
        charts = charts.len(),
        "dashboard summary computed"
    );

    Some(DashboardSummary {
        total_responses,
        mwa_aware,
        not_aware,
        awareness_rate,
        charts,
    })
}

pub(crate) fn title_case(token: &str) -> String {
    token
        .split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
