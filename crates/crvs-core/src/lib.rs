#![deny(missing_docs)]

//! # crvs-core: Foundational Types for the CRVS Platform Services
//!
//! Every other crate in the workspace depends on this one. It has no
//! internal crate dependencies: only `serde`, `serde_json` and `thiserror`.
//!
//! ## Contents
//!
//! - [`Scope`]: the permission vocabulary carried in bearer tokens.
//! - [`Event`]: the vital events a declaration can describe.
//! - [`ServiceName`]: the platform services the gateway health-checks.
//! - [`MessageDescriptor`]: static i18n descriptors used by the form engine.
//! - [`CrvsError`] / [`ValidationError`]: the structured error hierarchy.
//! - [`ErrorBody`]: the JSON error envelope every service returns.

pub mod error;
pub mod event;
pub mod messages;
pub mod scope;

pub use error::{CrvsError, ErrorBody, ErrorDetail, ValidationError};
pub use event::{Event, ServiceName};
pub use messages::MessageDescriptor;
pub use scope::Scope;
