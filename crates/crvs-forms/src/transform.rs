//! Draft-to-document driver.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fhir::Location;
use crate::form::{FormData, FormSection};

/// The document a declaration draft is transformed into.
///
/// `eventLocation` is built by mutation transformers; every other key is a
/// section object holding verbatim-copied answers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformedData {
    #[serde(rename = "eventLocation", default, skip_serializing_if = "Option::is_none")]
    pub event_location: Option<Location>,
    #[serde(flatten)]
    pub sections: BTreeMap<String, Map<String, Value>>,
}

impl TransformedData {
    pub fn new() -> Self {
        Self::default()
    }

    /// The object for `section_id`, created empty on first use.
    pub fn section_mut(&mut self, section_id: &str) -> &mut Map<String, Value> {
        self.sections.entry(section_id.to_string()).or_default()
    }
}

/// Transform a draft against its form definition.
///
/// Unanswered fields are skipped. Answered fields apply their mapping if
/// they declare one, otherwise their answer is copied into the section.
pub fn draft_to_transformed(sections: &[FormSection], draft: &FormData) -> TransformedData {
    let mut transformed = TransformedData::new();

    for section in sections {
        for field in &section.fields {
            let Some(answer) = draft.answer(&section.id, &field.name) else {
                continue;
            };
            match &field.mapping {
                Some(mapping) => mapping.mutate(&mut transformed, draft, &section.id, field),
                None => {
                    transformed
                        .section_mut(&section.id)
                        .insert(field.name.clone(), answer.clone());
                }
            }
        }
    }

    tracing::debug!(
        sections = transformed.sections.len(),
        event_location = transformed.event_location.is_some(),
        "draft transformed"
    );
    transformed
}
