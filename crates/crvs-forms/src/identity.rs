//! # Identity Document Types
//!
//! The identity documents an informant, parent or deceased can present,
//! the option lists the birth and death forms offer, and the label/tooltip
//! mappers used when a field is rendered dynamically from the selected type.
//!
//! Mappers accept raw codes: a code this build does not know falls back to
//! the generic "iD" label instead of failing.

use crvs_core::messages::form as messages;
use crvs_core::MessageDescriptor;
use serde::{Deserialize, Serialize};

use crate::field::FieldType;

/// An identity document code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentityType {
    NationalId,
    BirthRegistrationNumber,
    Passport,
    DeathRegistrationNumber,
    DrivingLicense,
    RefugeeNumber,
    AlienNumber,
    Other,
    NoId,
    SocialSecurityNo,
}

impl IdentityType {
    pub const ALL: [IdentityType; 10] = [
        IdentityType::NationalId,
        IdentityType::BirthRegistrationNumber,
        IdentityType::Passport,
        IdentityType::DeathRegistrationNumber,
        IdentityType::DrivingLicense,
        IdentityType::RefugeeNumber,
        IdentityType::AlienNumber,
        IdentityType::Other,
        IdentityType::NoId,
        IdentityType::SocialSecurityNo,
    ];

    /// The wire code, e.g. `NATIONAL_ID`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NationalId => "NATIONAL_ID",
            Self::BirthRegistrationNumber => "BIRTH_REGISTRATION_NUMBER",
            Self::Passport => "PASSPORT",
            Self::DeathRegistrationNumber => "DEATH_REGISTRATION_NUMBER",
            Self::DrivingLicense => "DRIVING_LICENSE",
            Self::RefugeeNumber => "REFUGEE_NUMBER",
            Self::AlienNumber => "ALIEN_NUMBER",
            Self::Other => "OTHER",
            Self::NoId => "NO_ID",
            Self::SocialSecurityNo => "SOCIAL_SECURITY_NO",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == code)
    }
}

impl std::fmt::Display for IdentityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a select-with-options field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdentityOption {
    pub value: IdentityType,
    pub label: MessageDescriptor,
}

const fn option(value: IdentityType, label: MessageDescriptor) -> IdentityOption {
    IdentityOption { value, label }
}

const BIRTH_IDENTITY_OPTIONS: [IdentityOption; 4] = [
    option(IdentityType::NationalId, messages::ID_TYPE_NATIONAL_ID),
    option(IdentityType::BirthRegistrationNumber, messages::ID_TYPE_BRN),
    option(IdentityType::Passport, messages::ID_TYPE_PASSPORT),
    option(IdentityType::Other, messages::ID_TYPE_OTHER),
];

const DEATH_IDENTITY_OPTIONS: [IdentityOption; 8] = [
    option(IdentityType::Passport, messages::ID_TYPE_PASSPORT),
    option(IdentityType::NationalId, messages::ID_TYPE_NATIONAL_ID),
    option(IdentityType::DrivingLicense, messages::ID_TYPE_DRIVING_LICENSE),
    option(IdentityType::BirthRegistrationNumber, messages::ID_TYPE_BRN),
    option(IdentityType::RefugeeNumber, messages::ID_TYPE_REFUGEE_NUMBER),
    option(IdentityType::AlienNumber, messages::ID_TYPE_ALIEN_NUMBER),
    option(IdentityType::NoId, messages::ID_TYPE_NO_ID),
    option(IdentityType::Other, messages::ID_TYPE_OTHER),
];

/// Document types offered on birth declarations, in display order.
pub fn birth_identity_options() -> &'static [IdentityOption] {
    &BIRTH_IDENTITY_OPTIONS
}

/// Document types offered on death declarations, in display order.
pub fn death_identity_options() -> &'static [IdentityOption] {
    &DEATH_IDENTITY_OPTIONS
}

/// Input type of the document-number field. Every document number is free text.
pub fn identity_type_mapper(_key: &str) -> FieldType {
    FieldType::Text
}

/// Tooltip shown next to the document-number field.
pub fn identity_tooltip_message(code: &str) -> MessageDescriptor {
    match IdentityType::parse(code) {
        Some(IdentityType::NationalId) => messages::TOOLTIP_NATIONAL_ID,
        Some(IdentityType::BirthRegistrationNumber) => messages::ID_TYPE_BRN,
        _ => messages::ID,
    }
}

/// Label of the document-number field for the selected type.
pub fn identity_name_message(code: &str) -> MessageDescriptor {
    match IdentityType::parse(code) {
        Some(IdentityType::NationalId) => messages::ID_TYPE_NATIONAL_ID,
        Some(IdentityType::Passport) => messages::ID_TYPE_PASSPORT,
        Some(IdentityType::DrivingLicense) => messages::ID_TYPE_DRIVING_LICENSE,
        Some(IdentityType::BirthRegistrationNumber) => messages::ID_TYPE_BRN,
        Some(IdentityType::DeathRegistrationNumber) => messages::ID_TYPE_DRN,
        Some(IdentityType::RefugeeNumber) => messages::ID_TYPE_REFUGEE_NUMBER,
        Some(IdentityType::AlienNumber) => messages::ID_TYPE_ALIEN_NUMBER,
        _ => messages::ID,
    }
}
