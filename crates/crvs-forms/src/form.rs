//! Form sections and draft answers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::field::FormField;

/// A titled group of fields. `id` keys the section's answers in [`FormData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSection {
    pub id: String,
    pub fields: Vec<FormField>,
}

/// Answer value of a search field: the option label and its underlying id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicValue {
    pub label: String,
    pub value: String,
}

/// Draft answers of a declaration, keyed by section id then field name.
///
/// Answers are dynamically typed: strings, numbers, booleans, or objects
/// (search fields) depending on the field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, Map<String, Value>>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// The answer to `field` in `section`, if one was given.
    pub fn answer(&self, section: &str, field: &str) -> Option<&Value> {
        self.0.get(section).and_then(|answers| answers.get(field))
    }

    /// Record an answer, replacing any previous one.
    pub fn set(&mut self, section: impl Into<String>, field: impl Into<String>, value: Value) {
        self.0
            .entry(section.into())
            .or_default()
            .insert(field.into(), value);
    }

    /// Builder-style [`FormData::set`].
    pub fn with(mut self, section: &str, field: &str, value: impl Into<Value>) -> Self {
        self.set(section, field, value.into());
        self
    }

    /// All answers of one section.
    pub fn section(&self, section: &str) -> Option<&Map<String, Value>> {
        self.0.get(section)
    }
}

/// Render a scalar answer as the string stored in the document.
///
/// Strings pass through, numbers and booleans use their display form, null
/// becomes empty. Objects and arrays fall back to compact JSON.
pub fn answer_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
