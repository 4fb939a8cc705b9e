//! # i18n Message Descriptors
//!
//! Static descriptors the client renders through its translation catalogue.
//! Only the `id` is meaningful to translators; `default_message` is the
//! English fallback.

use serde::Serialize;

/// A translatable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDescriptor {
    /// Catalogue key.
    pub id: &'static str,
    /// English fallback text.
    pub default_message: &'static str,
}

/// Form field labels and tooltips.
pub mod form {
    use super::MessageDescriptor;

    /// Generic identity document label.
    pub const ID: MessageDescriptor = MessageDescriptor {
        id: "form.field.label.iD",
        default_message: "NID",
    };
    /// National ID.
    pub const ID_TYPE_NATIONAL_ID: MessageDescriptor = MessageDescriptor {
        id: "form.field.label.iDTypeNationalID",
        default_message: "National ID",
    };
    /// Birth registration number.
    pub const ID_TYPE_BRN: MessageDescriptor = MessageDescriptor {
        id: "form.field.label.iDTypeBRN",
        default_message: "Birth Registration Number",
    };
    /// Death registration number.
    pub const ID_TYPE_DRN: MessageDescriptor = MessageDescriptor {
        id: "form.field.label.iDTypeDRN",
        default_message: "Death Registration Number",
    };
    /// Passport.
    pub const ID_TYPE_PASSPORT: MessageDescriptor = MessageDescriptor {
        id: "form.field.label.iDTypePassport",
        default_message: "Passport",
    };
    /// Driving license.
    pub const ID_TYPE_DRIVING_LICENSE: MessageDescriptor = MessageDescriptor {
        id: "form.field.label.iDTypeDrivingLicense",
        default_message: "Drivers License",
    };
    /// Refugee number.
    pub const ID_TYPE_REFUGEE_NUMBER: MessageDescriptor = MessageDescriptor {
        id: "form.field.label.iDTypeRefugeeNumber",
        default_message: "Refugee Number",
    };
    /// Alien number.
    pub const ID_TYPE_ALIEN_NUMBER: MessageDescriptor = MessageDescriptor {
        id: "form.field.label.iDTypeAlienNumber",
        default_message: "Alien Number",
    };
    /// No identity document.
    pub const ID_TYPE_NO_ID: MessageDescriptor = MessageDescriptor {
        id: "form.field.label.iDTypeNoID",
        default_message: "No ID available",
    };
    /// Other document type.
    pub const ID_TYPE_OTHER: MessageDescriptor = MessageDescriptor {
        id: "form.field.label.iDTypeOther",
        default_message: "Other",
    };
    /// Tooltip shown next to the national ID input.
    pub const TOOLTIP_NATIONAL_ID: MessageDescriptor = MessageDescriptor {
        id: "form.field.tooltip.tooltipNationalID",
        default_message: "The National ID can only be numeric and must be 10 digits long",
    };
}
