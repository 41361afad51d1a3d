use std::collections::BTreeMap;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::spec::{Field, SurveySpec};

/// Value held for one question key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Selected token or free text.
    Text(String),
    /// Selected tokens of a multi-select question.
    Multi(Vec<String>),
}

impl AnswerValue {
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Text(text) => text.is_empty(),
            AnswerValue::Multi(options) => options.is_empty(),
        }
    }

    fn empty_for(field: Field) -> Self {
        if field.is_multi() {
            AnswerValue::Multi(Vec::new())
        } else {
            AnswerValue::Text(String::new())
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(value: Vec<String>) -> Self {
        AnswerValue::Multi(value)
    }
}

/// The answers a respondent builds up before submitting.
///
/// Every [`Field`] is present from construction onwards; values are only ever replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSet {
    values: BTreeMap<Field, AnswerValue>,
}

impl Default for AnswerSet {
    fn default() -> Self {
        Self::new()
    }
}

impl AnswerSet {
    pub fn new() -> Self {
        let values = Field::ALL
            .iter()
            .map(|field| (*field, AnswerValue::empty_for(*field)))
            .collect();
        Self { values }
    }

    pub fn get(&self, field: Field) -> &AnswerValue {
        // Every key is inserted by `new`; the fallback only guards against future variants.
        self.values.get(&field).unwrap_or(&EMPTY_TEXT)
    }

    /// Text answer, or `""` when the key holds a list.
    pub fn text(&self, field: Field) -> &str {
        match self.get(field) {
            AnswerValue::Text(text) => text,
            AnswerValue::Multi(_) => "",
        }
    }

    /// Selected options, or an empty slice when the key holds text.
    pub fn options(&self, field: Field) -> &[String] {
        match self.get(field) {
            AnswerValue::Multi(options) => options,
            AnswerValue::Text(_) => &[],
        }
    }

    pub fn is_empty_value(&self, field: Field) -> bool {
        self.get(field).is_empty()
    }

    /// Replaces the value for `field`. Never validates.
    pub fn set_answer(&mut self, field: Field, value: impl Into<AnswerValue>) {
        self.values.insert(field, value.into());
    }

    /// Adds or removes `option` from a multi-select answer.
    ///
    /// Repeating the same call leaves the set unchanged. Scalar keys are left alone; a
    /// multi-select key currently holding text is treated as an empty selection.
    pub fn toggle_multi_value(&mut self, field: Field, option: &str, included: bool) {
        if !field.is_multi() {
            tracing::debug!(field = %field, "ignoring toggle on a scalar answer");
            return;
        }
        let entry = self
            .values
            .entry(field)
            .or_insert_with(|| AnswerValue::Multi(Vec::new()));
        if matches!(entry, AnswerValue::Text(_)) {
            *entry = AnswerValue::Multi(Vec::new());
        }
        if let AnswerValue::Multi(options) = entry {
            let present = options.iter().any(|existing| existing == option);
            if included && !present {
                options.push(option.to_string());
            } else if !included && present {
                options.retain(|existing| existing != option);
            }
        }
    }

    /// Selected options ordered as the question lists them; unknown tokens trail in insertion
    /// order.
    pub fn display_options<'a>(&'a self, field: Field, spec: &'a SurveySpec) -> Vec<&'a str> {
        let selected = self.options(field);
        let vocabulary = spec.vocabulary(field);
        let mut ordered: Vec<&str> = vocabulary
            .iter()
            .copied()
            .filter(|token| selected.iter().any(|option| option == token))
            .collect();
        ordered.extend(
            selected
                .iter()
                .map(String::as_str)
                .filter(|option| !vocabulary.contains(option)),
        );
        ordered
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &AnswerValue)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }

    pub fn to_value(&self) -> Value {
        let map = Field::ALL
            .iter()
            .map(|field| {
                let value = match self.get(*field) {
                    AnswerValue::Text(text) => Value::String(text.clone()),
                    AnswerValue::Multi(options) => Value::Array(
                        options.iter().cloned().map(Value::String).collect(),
                    ),
                };
                (field.as_str().to_string(), value)
            })
            .collect::<Map<_, _>>();
        Value::Object(map)
    }

    /// Builds an answer set from a JSON object, starting from the all-empty defaults.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, String> {
        let mut answers = AnswerSet::new();
        for (key, value) in map {
            let Ok(field) = key.parse::<Field>() else {
                tracing::debug!(key = %key, "ignoring unknown answer key");
                continue;
            };
            match (field.is_multi(), value) {
                (_, Value::Null) => {}
                (false, Value::String(text)) => answers.set_answer(field, text.as_str()),
                (true, Value::Array(items)) => {
                    let options = items
                        .iter()
                        .map(|item| {
                            item.as_str()
                                .map(str::to_string)
                                .ok_or_else(|| format!("'{}' must be a list of strings", field))
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    answers.set_answer(field, options);
                }
                (true, _) => return Err(format!("'{}' must be a list of strings", field)),
                (false, _) => return Err(format!("'{}' must be a string", field)),
            }
        }
        Ok(answers)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, serde_cbor::Error> {
        serde_cbor::to_vec(self)
    }
}

static EMPTY_TEXT: AnswerValue = AnswerValue::Text(String::new());

impl Serialize for AnswerSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Field::ALL.len()))?;
        for field in Field::ALL {
            map.serialize_entry(field.as_str(), self.get(field))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AnswerSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        AnswerSet::from_map(&map).map_err(de::Error::custom)
    }
}
