use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SurveyError;
use crate::spec::SurveySpec;

/// Presentation theme handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub dark: bool,
    /// Chart colors, assigned to slices by position.
    pub palette: Vec<String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            dark: true,
            palette: ["#4160ec", "#63d3e1", "#8f4dfc", "#ff7bac", "#ffe697", "#50e3c2"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Theme {
    pub fn color(&self, index: usize) -> &str {
        if self.palette.is_empty() {
            "#888888"
        } else {
            &self.palette[index % self.palette.len()]
        }
    }
}

/// Illustrative yes/maybe/no percentages shown while an interest question has no answers yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderConfig {
    pub mwa_interest: Vec<u32>,
    pub mwa_attend_cme: Vec<u32>,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            mwa_interest: vec![53, 34, 13],
            mwa_attend_cme: vec![67, 26, 7],
        }
    }
}

/// Runtime configuration; every field has a default so partial files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SurveyConfig {
    /// Alternative survey definition; the bundled questionnaire is used when absent.
    pub survey_spec_path: Option<PathBuf>,
    pub store_path: Option<PathBuf>,
    /// Run the required-field gate on every "next", not only before submission.
    pub validate_each_step: bool,
    pub theme: Theme,
    pub placeholders: PlaceholderConfig,
}

impl SurveyConfig {
    /// Parses a JSON config; blank input yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, SurveyError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json).map_err(|err| SurveyError::Config(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, SurveyError> {
        let contents = fs::read_to_string(path)
            .map_err(|err| SurveyError::Config(format!("{}: {}", path.display(), err)))?;
        Self::from_json(&contents)
    }

    pub fn load_survey(&self) -> Result<SurveySpec, SurveyError> {
        match &self.survey_spec_path {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .map_err(|err| SurveyError::Config(format!("{}: {}", path.display(), err)))?;
                SurveySpec::from_json(&contents).map_err(SurveyError::Spec)
            }
            None => SurveySpec::builtin().map_err(SurveyError::Spec),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config =
            SurveyConfig::from_json(r#"{"validate_each_step": true, "theme": {"dark": false}}"#)
                .expect("config");
        assert!(config.validate_each_step);
        assert!(!config.theme.dark);
        assert_eq!(config.theme.palette.len(), 6);
        assert_eq!(config.placeholders.mwa_interest, vec![53, 34, 13]);
    }

    #[test]
    fn blank_config_is_default() {
        assert_eq!(SurveyConfig::from_json("  ").expect("config"), SurveyConfig::default());
    }

    #[test]
    fn malformed_config_is_reported() {
        let err = SurveyConfig::from_json("{").expect_err("bad json");
        assert_eq!(err.code(), "config");
    }

    #[test]
    fn palette_wraps_around() {
        let theme = Theme::default();
        assert_eq!(theme.color(0), theme.color(6));
    }
}
