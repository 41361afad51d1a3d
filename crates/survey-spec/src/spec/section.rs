use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Identifier of one wizard screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum SectionId {
    #[default]
    A,
    B,
    C,
    D,
    Consent,
    #[serde(rename = "MWAInfo")]
    MwaInfo,
    #[serde(rename = "MWAConsent")]
    MwaConsent,
}

impl SectionId {
    pub const ALL: [SectionId; 7] = [
        SectionId::A,
        SectionId::B,
        SectionId::C,
        SectionId::D,
        SectionId::Consent,
        SectionId::MwaInfo,
        SectionId::MwaConsent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::A => "A",
            SectionId::B => "B",
            SectionId::C => "C",
            SectionId::D => "D",
            SectionId::Consent => "Consent",
            SectionId::MwaInfo => "MWAInfo",
            SectionId::MwaConsent => "MWAConsent",
        }
    }

    /// Sections whose "next" action submits the survey.
    pub fn is_final(&self) -> bool {
        matches!(self, SectionId::Consent | SectionId::MwaConsent)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
