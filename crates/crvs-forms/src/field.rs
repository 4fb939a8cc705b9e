//! Form field definitions.
//!
//! Field definitions are delivered to clients as JSON by the country
//! configuration, so every type here round-trips through serde.

use serde::{Deserialize, Serialize};

use crate::form::FormData;
use crate::mutation::EventLocationMutation;
use crate::transform::TransformedData;

/// The input widget a field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    Text,
    Number,
    SelectWithOptions,
    SelectWithDynamicOptions,
    RadioGroup,
    Date,
    Tel,
    /// Search input whose answer is a [`crate::form::DynamicValue`].
    SearchField,
    LocationSearchInput,
    CheckboxGroup,
    Textarea,
    Paragraph,
}

/// A single field of a form section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Answer key within the section.
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Message id of the field label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// How the answer is written into the transformed document. Fields
    /// without a mapping are copied verbatim into their section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<FieldMapping>,
}

impl FormField {
    /// A field with no label, not required, and no mapping.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            label: None,
            required: false,
            mapping: None,
        }
    }

    /// Attach a mapping.
    pub fn with_mapping(mut self, mapping: impl Into<FieldMapping>) -> Self {
        self.mapping = Some(mapping.into());
        self
    }
}

/// Mutation transformers a field can declare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldMapping {
    /// Writes into `eventLocation` (address lines, facility, place type).
    EventLocation(EventLocationMutation),
}

impl FieldMapping {
    /// Apply this mapping for one field.
    pub fn mutate(
        &self,
        transformed: &mut TransformedData,
        draft: &FormData,
        section_id: &str,
        field: &FormField,
    ) {
        match self {
            Self::EventLocation(m) => m.mutate(transformed, draft, section_id, field),
        }
    }
}

impl From<EventLocationMutation> for FieldMapping {
    fn from(m: EventLocationMutation) -> Self {
        Self::EventLocation(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::birth_event_location;

    #[test]
    fn field_type_uses_screaming_snake_case() {
        let json = serde_json::to_string(&FieldType::SelectWithDynamicOptions).unwrap();
        assert_eq!(json, "\"SELECT_WITH_DYNAMIC_OPTIONS\"");
        let back: FieldType = serde_json::from_str("\"SEARCH_FIELD\"").unwrap();
        assert_eq!(back, FieldType::SearchField);
    }

    #[test]
    fn field_definition_loads_from_json() {
        let field: FormField = serde_json::from_value(serde_json::json!({
            "name": "addressLine1",
            "type": "TEXT",
            "mapping": {
                "kind": "eventLocation",
                "event": "birth",
                "lineNumber": 1
            }
        }))
        .unwrap();
        assert_eq!(field.name, "addressLine1");
        assert!(!field.required);
        assert_eq!(
            field.mapping,
            Some(FieldMapping::EventLocation(birth_event_location(1, None)))
        );
    }
}
