//! # Event Location Mutation
//!
//! Writes the place-of-event answers of a birth or death declaration into
//! `eventLocation`. The same transformer serves every field of the place
//! section; which part of the location a field lands in is decided per call:
//!
//! | Condition (first match wins)            | Effect |
//! |-----------------------------------------|--------|
//! | `line_number > 0`                       | `address.line[line_number - 1] = answer` |
//! | field is `placeOfBirth`/`placeOfDeath`  | `type = answer` |
//! | field is `birthLocation`/`deathLocation`| `_fhirID = answer`, drop `address` and `type` |
//! | `transformed_field_name` set            | `address[transformed_field_name] = answer` |
//! | otherwise                               | `address[field.name] = answer` |
//!
//! Independently of the table, `addressLine4` also sets
//! `partOf = "Location/<answer>"`.

use crvs_core::Event;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field::{FieldType, FormField};
use crate::fhir::Location;
use crate::form::{answer_to_string, FormData};
use crate::transform::TransformedData;

/// Address field whose answer is also the parent administrative area.
const PARENT_AREA_FIELD: &str = "addressLine4";

/// Place-of-event transformer for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLocationMutation {
    pub event: Event,
    /// One-based address line the answer is written to; 0 disables.
    #[serde(default)]
    pub line_number: usize,
    /// Address key to write to instead of the field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformed_field_name: Option<String>,
}

/// Transformer for a field of the place-of-birth section.
pub fn birth_event_location(
    line_number: usize,
    transformed_field_name: Option<String>,
) -> EventLocationMutation {
    EventLocationMutation {
        event: Event::Birth,
        line_number,
        transformed_field_name,
    }
}

/// Transformer for a field of the place-of-death section.
pub fn death_event_location(
    line_number: usize,
    transformed_field_name: Option<String>,
) -> EventLocationMutation {
    EventLocationMutation {
        event: Event::Death,
        line_number,
        transformed_field_name,
    }
}

impl EventLocationMutation {
    fn place_field(&self) -> &'static str {
        match self.event {
            Event::Birth => "placeOfBirth",
            Event::Death => "placeOfDeath",
        }
    }

    fn facility_field(&self) -> &'static str {
        match self.event {
            Event::Birth => "birthLocation",
            Event::Death => "deathLocation",
        }
    }

    /// Apply the answer of `field` to `transformed.eventLocation`.
    pub fn mutate(
        &self,
        transformed: &mut TransformedData,
        draft: &FormData,
        section_id: &str,
        field: &FormField,
    ) {
        let location = transformed
            .event_location
            .get_or_insert_with(Location::with_blank_address);

        let Some(answer) = draft.answer(section_id, &field.name) else {
            tracing::trace!(section = section_id, field = %field.name, "no answer, skipping");
            return;
        };
        let value = answer_to_string(answer);

        if self.line_number > 0 {
            location
                .address_mut()
                .set_line(self.line_number - 1, value.clone());
        } else if field.name == self.place_field() {
            location.location_type = Some(value.clone());
        } else if field.name == self.facility_field() {
            location.fhir_id = Some(facility_id(field, answer));
            location.address = None;
            location.location_type = None;
        } else if let Some(target) = &self.transformed_field_name {
            location.address_mut().set_field(target, value.clone());
        } else {
            location.address_mut().set_field(&field.name, value.clone());
        }

        if field.name == PARENT_AREA_FIELD {
            location.part_of = Some(format!("Location/{value}"));
        }
    }
}

/// Search fields answer with `{label, value}`; the id is `value`.
fn facility_id(field: &FormField, answer: &Value) -> String {
    match (field.field_type, answer.get("value")) {
        (FieldType::SearchField, Some(id)) => answer_to_string(id),
        _ => answer_to_string(answer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn constructors_default_to_no_line() {
        let m: EventLocationMutation =
            serde_json::from_value(json!({ "event": "death" })).unwrap();
        assert_eq!(m, death_event_location(0, None));
    }

    #[test]
    fn search_field_uses_dynamic_value_id() {
        let field = FormField::new("birthLocation", FieldType::SearchField);
        let answer = json!({ "label": "Chikobo Rural Health Centre", "value": "f-9" });
        assert_eq!(facility_id(&field, &answer), "f-9");
    }

    #[test]
    fn plain_facility_field_uses_answer() {
        let field = FormField::new("birthLocation", FieldType::Text);
        assert_eq!(facility_id(&field, &json!("f-9")), "f-9");
    }

    #[test]
    fn selector_names_follow_event() {
        assert_eq!(birth_event_location(0, None).place_field(), "placeOfBirth");
        assert_eq!(death_event_location(0, None).facility_field(), "deathLocation");
    }
}
