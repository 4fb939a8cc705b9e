//! Event-location mutation: every dispatch branch for birth and death
//! place-of-event fields.

use crvs_forms::fhir::Address;
use crvs_forms::{
    birth_event_location, death_event_location, FieldType, FormData, FormField, TransformedData,
};
use proptest::prelude::*;
use serde_json::json;

const SECTION: &str = "child";

fn apply(
    mutation: crvs_forms::EventLocationMutation,
    field: FormField,
    draft: &FormData,
    transformed: &mut TransformedData,
) {
    mutation.mutate(transformed, draft, SECTION, &field);
}

#[test]
fn initialises_blank_address_even_without_answer() {
    let mut out = TransformedData::new();
    apply(
        birth_event_location(0, None),
        FormField::new("country", FieldType::SelectWithOptions),
        &FormData::new(),
        &mut out,
    );
    let location = out.event_location.unwrap();
    assert_eq!(location.address, Some(Address::blank()));
    assert!(location.location_type.is_none());
    assert!(location.fhir_id.is_none());
}

#[test]
fn line_number_writes_address_line() {
    let draft = FormData::new().with(SECTION, "addressLine3", "Mufwankolo");
    let mut out = TransformedData::new();
    apply(
        birth_event_location(3, None),
        FormField::new("addressLine3", FieldType::Text),
        &draft,
        &mut out,
    );
    let address = out.event_location.unwrap().address.unwrap();
    assert_eq!(address.line, vec!["", "", "Mufwankolo", "", "", ""]);
}

#[test]
fn line_number_wins_over_field_name() {
    let draft = FormData::new().with(SECTION, "placeOfBirth", "HOSPITAL");
    let mut out = TransformedData::new();
    apply(
        birth_event_location(2, None),
        FormField::new("placeOfBirth", FieldType::Text),
        &draft,
        &mut out,
    );
    let location = out.event_location.unwrap();
    assert!(location.location_type.is_none());
    assert_eq!(location.address.unwrap().line[1], "HOSPITAL");
}

#[test]
fn place_selector_sets_type() {
    let draft = FormData::new()
        .with(SECTION, "placeOfBirth", "PRIVATE_HOME")
        .with("deceased", "placeOfDeath", "OTHER");

    let mut out = TransformedData::new();
    apply(
        birth_event_location(0, None),
        FormField::new("placeOfBirth", FieldType::SelectWithOptions),
        &draft,
        &mut out,
    );
    assert_eq!(
        out.event_location.unwrap().location_type.as_deref(),
        Some("PRIVATE_HOME")
    );

    let mut out = TransformedData::new();
    death_event_location(0, None).mutate(
        &mut out,
        &draft,
        "deceased",
        &FormField::new("placeOfDeath", FieldType::SelectWithOptions),
    );
    assert_eq!(out.event_location.unwrap().location_type.as_deref(), Some("OTHER"));
}

#[test]
fn place_selector_of_other_event_is_an_address_key() {
    let draft = FormData::new().with(SECTION, "placeOfDeath", "OTHER");
    let mut out = TransformedData::new();
    apply(
        birth_event_location(0, None),
        FormField::new("placeOfDeath", FieldType::Text),
        &draft,
        &mut out,
    );
    let location = out.event_location.unwrap();
    assert!(location.location_type.is_none());
    assert_eq!(location.address.unwrap().field("placeOfDeath"), Some("OTHER"));
}

#[test]
fn facility_search_field_sets_id_and_drops_address_and_type() {
    let draft = FormData::new()
        .with(SECTION, "placeOfBirth", "HEALTH_FACILITY")
        .with(
            SECTION,
            "birthLocation",
            json!({ "label": "Chikobo Rural Health Centre", "value": "627fc0cc" }),
        );
    let mut out = TransformedData::new();
    apply(
        birth_event_location(0, None),
        FormField::new("placeOfBirth", FieldType::SelectWithOptions),
        &draft,
        &mut out,
    );
    apply(
        birth_event_location(0, None),
        FormField::new("birthLocation", FieldType::SearchField),
        &draft,
        &mut out,
    );
    let location = out.event_location.unwrap();
    assert_eq!(location.fhir_id.as_deref(), Some("627fc0cc"));
    assert!(location.address.is_none());
    assert!(location.location_type.is_none());
}

#[test]
fn facility_plain_field_uses_raw_answer() {
    let draft = FormData::new().with("deceased", "deathLocation", "f-12");
    let mut out = TransformedData::new();
    death_event_location(0, None).mutate(
        &mut out,
        &draft,
        "deceased",
        &FormField::new("deathLocation", FieldType::SelectWithDynamicOptions),
    );
    let location = out.event_location.unwrap();
    assert_eq!(location.fhir_id.as_deref(), Some("f-12"));
    assert!(location.address.is_none());
}

#[test]
fn address_is_recreated_after_facility_removed_it() {
    let draft = FormData::new()
        .with(SECTION, "birthLocation", "f-1")
        .with(SECTION, "addressLine1", "Plot 7");
    let mut out = TransformedData::new();
    apply(
        birth_event_location(0, None),
        FormField::new("birthLocation", FieldType::Text),
        &draft,
        &mut out,
    );
    apply(
        birth_event_location(1, None),
        FormField::new("addressLine1", FieldType::Text),
        &draft,
        &mut out,
    );
    let location = out.event_location.unwrap();
    assert_eq!(location.fhir_id.as_deref(), Some("f-1"));
    assert_eq!(location.address.unwrap().line[0], "Plot 7");
}

#[test]
fn transformed_field_name_redirects_address_key() {
    let draft = FormData::new().with(SECTION, "internationalPostcode", "EC1A 1BB");
    let mut out = TransformedData::new();
    apply(
        birth_event_location(0, Some("postalCode".into())),
        FormField::new("internationalPostcode", FieldType::Text),
        &draft,
        &mut out,
    );
    let address = out.event_location.unwrap().address.unwrap();
    assert_eq!(address.postal_code, "EC1A 1BB");
    assert!(address.field("internationalPostcode").is_none());
}

#[test]
fn transformed_name_line_does_not_clobber_lines() {
    let draft = FormData::new().with(SECTION, "streetAddress", "12 Cha Cha Cha Rd");
    let mut out = TransformedData::new();
    apply(
        birth_event_location(0, Some("line".into())),
        FormField::new("streetAddress", FieldType::Text),
        &draft,
        &mut out,
    );
    let address = out.event_location.unwrap().address.unwrap();
    assert_eq!(address, Address::blank());
    let json = serde_json::to_value(&address).unwrap();
    assert_eq!(json["line"], json!(["", "", "", "", "", ""]));
}

#[test]
fn field_name_is_default_address_key() {
    let draft = FormData::new()
        .with(SECTION, "country", "ZMB")
        .with(SECTION, "state", "state-1")
        .with(SECTION, "district", "district-1");
    let mut out = TransformedData::new();
    for name in ["country", "state", "district"] {
        apply(
            birth_event_location(0, None),
            FormField::new(name, FieldType::SelectWithOptions),
            &draft,
            &mut out,
        );
    }
    let address = out.event_location.unwrap().address.unwrap();
    assert_eq!(address.country, "ZMB");
    assert_eq!(address.state, "state-1");
    assert_eq!(address.district, "district-1");
}

#[test]
fn address_line_four_also_sets_parent() {
    let draft = FormData::new().with(SECTION, "addressLine4", "0eaa73dd");
    let mut out = TransformedData::new();
    apply(
        birth_event_location(4, None),
        FormField::new("addressLine4", FieldType::SelectWithDynamicOptions),
        &draft,
        &mut out,
    );
    let location = out.event_location.unwrap();
    assert_eq!(location.part_of.as_deref(), Some("Location/0eaa73dd"));
    assert_eq!(location.address.unwrap().line[3], "0eaa73dd");
}

#[test]
fn numeric_answers_are_stringified() {
    let draft = FormData::new().with(SECTION, "postalCode", 10101);
    let mut out = TransformedData::new();
    apply(
        birth_event_location(0, None),
        FormField::new("postalCode", FieldType::Number),
        &draft,
        &mut out,
    );
    assert_eq!(out.event_location.unwrap().address.unwrap().postal_code, "10101");
}

#[test]
fn full_form_produces_expected_document() {
    use crvs_forms::{draft_to_transformed, FormSection};

    let section = FormSection {
        id: SECTION.into(),
        fields: vec![
            FormField::new("firstNamesEng", FieldType::Text),
            FormField::new("placeOfBirth", FieldType::SelectWithOptions)
                .with_mapping(birth_event_location(0, None)),
            FormField::new("country", FieldType::SelectWithOptions)
                .with_mapping(birth_event_location(0, None)),
            FormField::new("addressLine4", FieldType::SelectWithDynamicOptions)
                .with_mapping(birth_event_location(4, None)),
        ],
    };
    let draft = FormData::new()
        .with(SECTION, "firstNamesEng", "Anika")
        .with(SECTION, "placeOfBirth", "PRIVATE_HOME")
        .with(SECTION, "country", "ZMB")
        .with(SECTION, "addressLine4", "d1");

    let out = draft_to_transformed(&[section], &draft);
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(
        json,
        json!({
            "child": { "firstNamesEng": "Anika" },
            "eventLocation": {
                "type": "PRIVATE_HOME",
                "partOf": "Location/d1",
                "address": {
                    "country": "ZMB",
                    "state": "",
                    "district": "",
                    "postalCode": "",
                    "line": ["", "", "", "d1", "", ""]
                }
            }
        })
    );
}

proptest! {
    /// Line `n` lands at index `n - 1` and no other line changes.
    #[test]
    fn line_number_maps_to_single_line(line in 1usize..=12, value in "[A-Za-z0-9 ]{1,20}") {
        let draft = FormData::new().with(SECTION, "addressLine", value.clone());
        let mut out = TransformedData::new();
        apply(
            birth_event_location(line, None),
            FormField::new("addressLine", FieldType::Text),
            &draft,
            &mut out,
        );
        let lines = out.event_location.unwrap().address.unwrap().line;
        prop_assert_eq!(lines.len(), line.max(6));
        for (i, l) in lines.iter().enumerate() {
            if i == line - 1 {
                prop_assert_eq!(l, &value);
            } else {
                prop_assert!(l.is_empty());
            }
        }
    }
}
