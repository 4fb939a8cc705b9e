//! # Request Extraction & Validation
//!
//! The [`Validate`] trait for request DTOs and helpers that turn JSON
//! rejections and rule violations into 400 responses.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use crvs_core::ValidationError;
use uuid::Uuid;

use crate::error::AppError;

/// Business rules a payload must satisfy beyond what serde checks.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Unwrap a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
///
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// [`extract_json`] followed by [`Validate::validate`].
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate()?;
    Ok(value)
}

/// Parse a path segment that must be a UUID.
pub fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| ValidationError::invalid(field, format!("{raw:?} is not a valid UUID")).into())
}

/// Reject blank strings.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_path_segments() {
        assert!(parse_uuid("locationId", "0eaa73dd-2a21-4998-b1e6-b08430595201").is_ok());
        let err = parse_uuid("locationId", "abc").unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m.contains("locationId")));
    }

    #[test]
    fn blank_strings_rejected() {
        assert!(require_non_blank("name", "Ibombo").is_ok());
        assert_eq!(
            require_non_blank("name", "  "),
            Err(ValidationError::EmptyField("name".into()))
        );
    }
}
