//! # crvs-forms: Declaration Form Engine
//!
//! Maps the dynamically-typed answers of a declaration form onto the nested
//! document the record services consume.
//!
//! ## Modules
//!
//! | Module       | Contents |
//! |--------------|----------|
//! | [`field`]    | Field types and field definitions |
//! | [`form`]     | Sections, draft answers, search-field values |
//! | [`identity`] | Identity document types, option lists, label mappers |
//! | [`fhir`]     | FHIR shapes: event location, bundle, Location resource |
//! | [`mutation`] | Per-field mutation transformers (event location) |
//! | [`transform`]| Whole-form draft → document driver |
//!
//! ## Flow
//!
//! ```text
//! FormData (section → field → answer)
//!     │  draft_to_transformed(sections, draft)
//!     ▼
//! for each answered field:
//!     mapping? ──yes──▶ FieldMapping::mutate(&mut TransformedData, ...)
//!        │no
//!        ▼
//!     TransformedData[section][field] = answer
//! ```

pub mod fhir;
pub mod field;
pub mod form;
pub mod identity;
pub mod mutation;
pub mod transform;

pub use fhir::{Address, Bundle, BundleEntry, Location, LocationResource};
pub use field::{FieldMapping, FieldType, FormField};
pub use form::{DynamicValue, FormData, FormSection};
pub use identity::IdentityType;
pub use mutation::{birth_event_location, death_event_location, EventLocationMutation};
pub use transform::{draft_to_transformed, TransformedData};
