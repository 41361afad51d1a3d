#![allow(missing_docs)]

pub mod aggregate;
pub mod answers;
pub mod answers_schema;
pub mod config;
pub mod detail;
pub mod error;
pub mod export;
pub mod filter;
pub mod intake;
pub mod progress;
pub mod record;
pub mod render;
pub mod report;
pub mod spec;
pub mod store;
pub mod submit;
pub mod validate;

pub use aggregate::{
    Chart, ChartKind, DashboardSummary, Denominator, OptionCounts, Share, Slice, count_by_option,
    percentages, shares_with_placeholder, summarize, to_percentages,
};
pub use answers::{AnswerSet, AnswerValue};
pub use answers_schema::generate as answers_schema;
pub use config::{PlaceholderConfig, SurveyConfig, Theme};
pub use detail::{
    DetailField, DetailSection, NOT_PROVIDED, ResponseDetail, find_row, render_detail_text,
    response_detail,
};
pub use error::{FieldIssue, MissingFieldError, StoreError, SurveyError};
pub use export::{EXPORT_HEADERS, export_file_name, export_rows};
pub use filter::{Row, RowKey, Selection, TableFilter, rows, specialty_options};
pub use intake::{check_minimum, parse_submission};
pub use progress::{Step, SurveyProgress, next_step, previous_section};
pub use record::{ResponseRecord, SCHEMA_VERSION, StoredMeta, SurveyDocument};
pub use render::{
    RenderPayload, RenderProgress, RenderQuestion, RenderStatus, build_render_payload,
    render_json_ui, render_text,
};
pub use report::{ReportError, render_dashboard_text};
pub use spec::{Field, QuestionSpec, QuestionType, SectionId, SectionSpec, SurveySpec};
pub use store::{JsonlStore, MemoryStore, ResponseStore};
pub use submit::SubmissionClient;
pub use validate::{
    RequiredFields, required_fields, required_fields_for, section_required_fields, validate,
};
