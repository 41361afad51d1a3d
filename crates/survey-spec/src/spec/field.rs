use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Question keys of the survey, serialized with their wire names.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    DoctorName,
    HospitalName,
    Specialty,
    SpecialtyOther,
    YearsOfPractice,
    PracticeSetting,
    ManagedThyroidPatients,
    #[serde(rename = "familiarWithMWA")]
    FamiliarWithMwa,
    #[serde(rename = "learnedAboutMWA")]
    LearnedAboutMwa,
    #[serde(rename = "learnedAboutMWAOther")]
    LearnedAboutMwaOther,
    MwaIndications,
    MwaComparison,
    Contraindications,
    MwaExperience,
    ProcedureCount,
    ObservedOutcomes,
    Complications,
    ComplicationsOther,
    MwaViableAlternative,
    AdoptionFactors,
    AttendWorkshop,
    AdditionalComments,
    ReceiveUpdates,
    ContactEmail,
    MwaInterest,
    MwaLearnMethod,
    MwaLearnOther,
    #[serde(rename = "mwaAttendCME")]
    MwaAttendCme,
    MwaConcerns,
    MwaConcernOther,
    MwaReceiveResources,
    MwaResourceEmail,
}

impl Field {
    /// Every key, in form order.
    pub const ALL: [Field; 32] = [
        Field::DoctorName,
        Field::HospitalName,
        Field::Specialty,
        Field::SpecialtyOther,
        Field::YearsOfPractice,
        Field::PracticeSetting,
        Field::ManagedThyroidPatients,
        Field::FamiliarWithMwa,
        Field::LearnedAboutMwa,
        Field::LearnedAboutMwaOther,
        Field::MwaIndications,
        Field::MwaComparison,
        Field::Contraindications,
        Field::MwaExperience,
        Field::ProcedureCount,
        Field::ObservedOutcomes,
        Field::Complications,
        Field::ComplicationsOther,
        Field::MwaViableAlternative,
        Field::AdoptionFactors,
        Field::AttendWorkshop,
        Field::AdditionalComments,
        Field::ReceiveUpdates,
        Field::ContactEmail,
        Field::MwaInterest,
        Field::MwaLearnMethod,
        Field::MwaLearnOther,
        Field::MwaAttendCme,
        Field::MwaConcerns,
        Field::MwaConcernOther,
        Field::MwaReceiveResources,
        Field::MwaResourceEmail,
    ];

    /// Wire name used in stored documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::DoctorName => "doctorName",
            Field::HospitalName => "hospitalName",
            Field::Specialty => "specialty",
            Field::SpecialtyOther => "specialtyOther",
            Field::YearsOfPractice => "yearsOfPractice",
            Field::PracticeSetting => "practiceSetting",
            Field::ManagedThyroidPatients => "managedThyroidPatients",
            Field::FamiliarWithMwa => "familiarWithMWA",
            Field::LearnedAboutMwa => "learnedAboutMWA",
            Field::LearnedAboutMwaOther => "learnedAboutMWAOther",
            Field::MwaIndications => "mwaIndications",
            Field::MwaComparison => "mwaComparison",
            Field::Contraindications => "contraindications",
            Field::MwaExperience => "mwaExperience",
            Field::ProcedureCount => "procedureCount",
            Field::ObservedOutcomes => "observedOutcomes",
            Field::Complications => "complications",
            Field::ComplicationsOther => "complicationsOther",
            Field::MwaViableAlternative => "mwaViableAlternative",
            Field::AdoptionFactors => "adoptionFactors",
            Field::AttendWorkshop => "attendWorkshop",
            Field::AdditionalComments => "additionalComments",
            Field::ReceiveUpdates => "receiveUpdates",
            Field::ContactEmail => "contactEmail",
            Field::MwaInterest => "mwaInterest",
            Field::MwaLearnMethod => "mwaLearnMethod",
            Field::MwaLearnOther => "mwaLearnOther",
            Field::MwaAttendCme => "mwaAttendCME",
            Field::MwaConcerns => "mwaConcerns",
            Field::MwaConcernOther => "mwaConcernOther",
            Field::MwaReceiveResources => "mwaReceiveResources",
            Field::MwaResourceEmail => "mwaResourceEmail",
        }
    }

    /// Multi-select keys hold a list of option tokens instead of a string.
    pub fn is_multi(&self) -> bool {
        matches!(
            self,
            Field::MwaIndications
                | Field::ObservedOutcomes
                | Field::Complications
                | Field::AdoptionFactors
                | Field::MwaLearnMethod
                | Field::MwaConcerns
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown survey field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}
