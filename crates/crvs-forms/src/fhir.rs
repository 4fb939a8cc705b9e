//! # FHIR Shapes
//!
//! The subset of FHIR R4 the platform touches:
//!
//! - [`Location`] / [`Address`]: the `eventLocation` of a transformed
//!   declaration. Field names follow the record service's GraphQL input,
//!   which is why the facility id is `_fhirID`.
//! - [`Bundle`]: event notifications submitted by health systems.
//! - [`LocationResource`]: administrative areas and offices stored in the
//!   FHIR store.
//!
//! Unknown keys are preserved on every type that round-trips through an
//! upstream, so a read-modify-write never drops fields this crate does not
//! model.

use std::collections::BTreeMap;

use crvs_core::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// -- Event location -----------------------------------------------------------

/// Postal address of an event location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub line: Vec<String>,
    /// Country-specific address parts (`city`, `addressLine4`, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Address {
    /// Number of address lines a fresh address carries.
    pub const LINE_COUNT: usize = 6;

    /// Empty named parts and six empty lines.
    pub fn blank() -> Self {
        Self {
            line: vec![String::new(); Self::LINE_COUNT],
            ..Self::default()
        }
    }

    /// Set line `index` (zero-based), growing the line list if needed.
    pub fn set_line(&mut self, index: usize, value: String) {
        if self.line.len() <= index {
            self.line.resize(index + 1, String::new());
        }
        self.line[index] = value;
    }

    /// Set a named address part. Known parts go to their typed field,
    /// anything else to [`Address::extra`]. `line` is a list and is only
    /// written through [`Address::set_line`]; a value named `line` is
    /// dropped.
    pub fn set_field(&mut self, name: &str, value: String) {
        match name {
            "country" => self.country = value,
            "state" => self.state = value,
            "district" => self.district = value,
            "postalCode" => self.postal_code = value,
            "line" => {
                tracing::warn!("address field named `line` ignored; map it with a line number");
            }
            other => {
                self.extra.insert(other.to_string(), Value::String(value));
            }
        }
    }

    /// Read a named address part.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "country" => Some(&self.country),
            "state" => Some(&self.state),
            "district" => Some(&self.district),
            "postalCode" => Some(&self.postal_code),
            other => self.extra.get(other).and_then(Value::as_str),
        }
    }
}

/// Where a vital event happened: either a facility reference (`_fhirID`)
/// or a typed place with an address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub location_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(rename = "_fhirID", default, skip_serializing_if = "Option::is_none")]
    pub fhir_id: Option<String>,
    #[serde(rename = "partOf", default, skip_serializing_if = "Option::is_none")]
    pub part_of: Option<String>,
}

impl Location {
    /// A location with a [`Address::blank`] address and nothing else.
    pub fn with_blank_address() -> Self {
        Self {
            address: Some(Address::blank()),
            ..Self::default()
        }
    }

    /// The address, recreating a blank one if it was removed.
    pub fn address_mut(&mut self) -> &mut Address {
        self.address.get_or_insert_with(Address::blank)
    }
}

// -- Bundle -------------------------------------------------------------------

/// A FHIR bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub resource_type: String,
    #[serde(rename = "type")]
    pub bundle_type: String,
    #[serde(default)]
    pub entry: Vec<BundleEntry>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// One resource inside a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(default)]
    pub full_url: Option<String>,
    pub resource: Value,
}

impl BundleEntry {
    pub fn resource_type(&self) -> Option<&str> {
        self.resource.get("resourceType").and_then(Value::as_str)
    }
}

impl Bundle {
    /// Parse and validate a FHIR document bundle.
    ///
    /// The document must be a `Bundle` of type `document` with at least one
    /// entry; every entry needs a `fullUrl` and a resource object carrying
    /// `resourceType`; the first entry must be the `Composition`.
    pub fn from_document(value: Value) -> Result<Self, ValidationError> {
        match value.get("resourceType").and_then(Value::as_str) {
            Some("Bundle") => {}
            Some(other) => {
                return Err(ValidationError::NotAllowed {
                    field: "resourceType".into(),
                    value: other.to_string(),
                    allowed: "Bundle".into(),
                })
            }
            None => return Err(ValidationError::EmptyField("resourceType".into())),
        }

        let bundle: Bundle = serde_json::from_value(value)
            .map_err(|e| ValidationError::invalid("bundle", e.to_string()))?;

        if bundle.bundle_type != "document" {
            return Err(ValidationError::NotAllowed {
                field: "type".into(),
                value: bundle.bundle_type,
                allowed: "document".into(),
            });
        }
        if bundle.entry.is_empty() {
            return Err(ValidationError::EmptyField("entry".into()));
        }
        for (i, entry) in bundle.entry.iter().enumerate() {
            if entry.full_url.as_deref().map_or(true, |u| u.trim().is_empty()) {
                return Err(ValidationError::EmptyField(format!("entry[{i}].fullUrl")));
            }
            if !entry.resource.is_object() {
                return Err(ValidationError::invalid(
                    format!("entry[{i}].resource"),
                    "must be an object",
                ));
            }
            if entry.resource_type().is_none() {
                return Err(ValidationError::EmptyField(format!(
                    "entry[{i}].resource.resourceType"
                )));
            }
        }
        if bundle.entry[0].resource_type() != Some("Composition") {
            return Err(ValidationError::invalid(
                "entry[0]",
                "first entry of a document bundle must be a Composition",
            ));
        }
        Ok(bundle)
    }
}

// -- Location resource --------------------------------------------------------

/// System of the statistical-code identifier.
pub const STATISTICAL_CODE_SYSTEM: &str = "http://opencrvs.org/specs/id/statistical-code";

/// System of the jurisdiction-type identifier.
pub const JURISDICTION_TYPE_SYSTEM: &str = "http://opencrvs.org/specs/id/jurisdiction-type";

/// Extension holding yearly population statistics as a JSON string.
pub const STATISTICS_EXTENSION_URL: &str = "http://opencrvs.org/specs/id/statistics";

/// Code system of location types.
pub const LOCATION_TYPE_SYSTEM: &str = "http://opencrvs.org/specs/location-type";

/// HL7 code system of physical location types.
pub const PHYSICAL_TYPE_SYSTEM: &str =
    "http://terminology.hl7.org/CodeSystem/location-physical-type";

/// A business identifier. Every member is optional in FHIR; `use`, `type`
/// and the like are kept in `rest`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Coding {
    pub fn new(system: &str, code: &str) -> Self {
        Self {
            system: Some(system.to_string()),
            code: Some(code.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl CodeableConcept {
    pub fn single(system: &str, code: &str) -> Self {
        Self {
            coding: vec![Coding::new(system, code)],
            rest: Map::new(),
        }
    }

    /// Code of the first coding.
    pub fn first_code(&self) -> Option<&str> {
        self.coding.first().and_then(|c| c.code.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub reference: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Reference {
    pub fn to(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            rest: Map::new(),
        }
    }
}

/// An extension. Only `valueString` is typed; `valueReference`,
/// `valueCode` and other `value[x]` members stay in `rest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Lifecycle status of a stored location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationStatus {
    #[default]
    Active,
    Inactive,
}

/// A FHIR `Location` resource as stored in the FHIR store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResource {
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub identifier: Vec<Identifier>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub alias: Vec<String>,
    #[serde(default)]
    pub status: LocationStatus,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of: Option<Reference>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub location_type: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_type: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

fn default_mode() -> String {
    "instance".to_string()
}

impl LocationResource {
    /// A new active location with the given name and no other data.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            resource_type: "Location".to_string(),
            id: None,
            identifier: Vec::new(),
            name: name.into(),
            alias: Vec::new(),
            status: LocationStatus::Active,
            mode: default_mode(),
            part_of: None,
            location_type: None,
            physical_type: None,
            extension: Vec::new(),
            rest: Map::new(),
        }
    }

    /// Value of the identifier with the given system.
    pub fn identifier_value(&self, system: &str) -> Option<&str> {
        self.identifier
            .iter()
            .find(|i| i.system.as_deref() == Some(system))
            .and_then(|i| i.value.as_deref())
    }

    /// Insert or replace the identifier with the given system.
    pub fn set_identifier(&mut self, system: &str, value: String) {
        let existing = self
            .identifier
            .iter_mut()
            .find(|i| i.system.as_deref() == Some(system));
        match existing {
            Some(existing) => existing.value = Some(value),
            None => self.identifier.push(Identifier {
                system: Some(system.to_string()),
                value: Some(value),
                rest: Map::new(),
            }),
        }
    }

    /// Insert or replace the extension with the given url.
    pub fn set_extension(&mut self, url: &str, value_string: String) {
        match self.extension.iter_mut().find(|e| e.url == url) {
            Some(existing) => existing.value_string = Some(value_string),
            None => self.extension.push(Extension {
                url: url.to_string(),
                value_string: Some(value_string),
                rest: Map::new(),
            }),
        }
    }
}
