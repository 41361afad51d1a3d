pub mod field;
pub mod question;
pub mod section;
pub mod survey;

pub use field::{Field, UnknownField};
pub use question::{ChoiceOption, QuestionSpec, QuestionType};
pub use section::SectionId;
pub use survey::{SectionSpec, SurveySpec};
