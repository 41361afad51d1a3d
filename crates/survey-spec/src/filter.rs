use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::record::ResponseRecord;
use crate::spec::Field;

/// Filter value that disables a dropdown filter.
pub const ALL: &str = "all";

/// Stable selection key of a table row.
pub type RowKey = String;

/// A fetched record paired with its selection key.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    pub key: RowKey,
    pub record: &'a ResponseRecord,
}

/// Keys every record by its persisted id, or by `row-<position>` in the full fetched list.
///
/// The position is taken before any filtering, so keys survive re-filtering.
pub fn rows(records: &[ResponseRecord]) -> Vec<Row<'_>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| Row {
            key: record
                .id
                .clone()
                .unwrap_or_else(|| format!("row-{}", index)),
            record,
        })
        .collect()
}

/// Search box plus the specialty and MWA-experience dropdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFilter {
    pub search: String,
    pub specialty: String,
    pub experience: String,
}

impl Default for TableFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            specialty: ALL.into(),
            experience: ALL.into(),
        }
    }
}

impl TableFilter {
    pub fn new(
        search: impl Into<String>,
        specialty: impl Into<String>,
        experience: impl Into<String>,
    ) -> Self {
        Self {
            search: search.into(),
            specialty: specialty.into(),
            experience: experience.into(),
        }
    }

    pub fn matches(&self, record: &ResponseRecord) -> bool {
        let matches_search = self.search.is_empty() || {
            let needle = self.search.to_lowercase();
            [Field::DoctorName, Field::HospitalName, Field::Specialty]
                .iter()
                .filter_map(|field| record.text(*field))
                .any(|value| value.to_lowercase().contains(&needle))
        };
        let matches_specialty =
            self.specialty == ALL || record.text(Field::Specialty) == Some(self.specialty.as_str());
        let matches_experience = self.experience == ALL
            || record.text(Field::MwaExperience) == Some(self.experience.as_str());
        matches_search && matches_specialty && matches_experience
    }

    /// Records passing every filter, in their original order.
    pub fn apply<'a>(&self, records: &'a [ResponseRecord]) -> Vec<&'a ResponseRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }

    pub fn apply_rows<'a>(&self, rows: &[Row<'a>]) -> Vec<Row<'a>> {
        rows.iter()
            .filter(|row| self.matches(row.record))
            .cloned()
            .collect()
    }
}

/// Distinct non-empty specialties in first-seen order.
pub fn specialty_options(records: &[ResponseRecord]) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for specialty in records
        .iter()
        .filter_map(|record| record.text(Field::Specialty))
        .filter(|specialty| !specialty.is_empty())
    {
        if !options.iter().any(|existing| existing == specialty) {
            options.push(specialty.to_string());
        }
    }
    options
}

/// Set of selected row keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    keys: BTreeSet<RowKey>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, key: &str, included: bool) {
        if included {
            self.keys.insert(key.to_string());
        } else {
            self.keys.remove(key);
        }
    }

    /// Selects exactly the given rows, or clears the whole selection.
    pub fn select_all(&mut self, filtered: &[Row<'_>], included: bool) {
        self.keys.clear();
        if included {
            self.keys.extend(filtered.iter().map(|row| row.key.clone()));
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Selected records among `rows`, in row order.
    pub fn selected<'a>(&self, rows: &[Row<'a>]) -> Vec<&'a ResponseRecord> {
        rows.iter()
            .filter(|row| self.contains(&row.key))
            .map(|row| row.record)
            .collect()
    }
}
