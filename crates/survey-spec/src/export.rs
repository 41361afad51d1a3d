use crate::record::ResponseRecord;
use crate::spec::Field;

pub const EXPORT_HEADERS: [&str; 12] = [
    "Doctor Name",
    "Hospital",
    "Specialty",
    "Years of Practice",
    "Practice Setting",
    "Managed Thyroid Patients",
    "Familiar with MWA",
    "MWA Experience",
    "Procedure Count",
    "MWA Indications",
    "Complications",
    "Additional Comments",
];

const EXPORT_COLUMNS: [Field; 12] = [
    Field::DoctorName,
    Field::HospitalName,
    Field::Specialty,
    Field::YearsOfPractice,
    Field::PracticeSetting,
    Field::ManagedThyroidPatients,
    Field::FamiliarWithMwa,
    Field::MwaExperience,
    Field::ProcedureCount,
    Field::MwaIndications,
    Field::Complications,
    Field::AdditionalComments,
];

fn cell(record: &ResponseRecord, field: Field) -> String {
    if field.is_multi() {
        record.list(field).join("; ")
    } else {
        record.text_or_empty(field).to_string()
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Comma-separated export: a fixed header line, then one fully quoted line per record.
pub fn export_rows<'a>(records: impl IntoIterator<Item = &'a ResponseRecord>) -> String {
    let mut lines = vec![EXPORT_HEADERS.join(",")];
    lines.extend(records.into_iter().map(|record| {
        EXPORT_COLUMNS
            .iter()
            .map(|field| quote(&cell(record, *field)))
            .collect::<Vec<_>>()
            .join(",")
    }));
    lines.join("\n")
}

/// Download name: the full table, or a selection of `n` doctors.
pub fn export_file_name(selected: Option<usize>) -> String {
    match selected {
        Some(count) => format!("selected-doctors-survey-{}.csv", count),
        None => "thyroid-survey-responses.csv".to_string(),
    }
}
