//! # Location Routes
//!
//! Administrative areas, CRVS offices and health facilities, stored as FHIR
//! `Location` resources in Hearth.
//!
//! | Method | Path                      | Auth           |
//! |--------|---------------------------|----------------|
//! | GET    | `/location`               | none           |
//! | GET    | `/location/:locationId`   | none           |
//! | POST   | `/location`               | `natlsysadmin` |
//! | PUT    | `/location/:locationId`   | `natlsysadmin` |

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use crvs_auth::{auth_middleware, require_scope, CallerIdentity};
use crvs_core::{Scope, ValidationError};
use crvs_forms::fhir::{
    CodeableConcept, Coding, LocationResource, LocationStatus, Reference,
    JURISDICTION_TYPE_SYSTEM, LOCATION_TYPE_SYSTEM, PHYSICAL_TYPE_SYSTEM,
    STATISTICAL_CODE_SYSTEM, STATISTICS_EXTENSION_URL,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, parse_uuid, require_non_blank, Validate};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    let public = Router::new()
        .route("/location", get(search_locations))
        .route("/location/:location_id", get(get_location));

    let admin = Router::new()
        .route("/location", post(create_location))
        .route("/location/:location_id", put(update_location))
        .route_layer(from_fn(auth_middleware));

    public.merge(admin)
}

// -- DTOs ---------------------------------------------------------------------

/// Kind of location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationCode {
    AdminStructure,
    CrvsOffice,
    HealthFacility,
}

impl LocationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdminStructure => "ADMIN_STRUCTURE",
            Self::CrvsOffice => "CRVS_OFFICE",
            Self::HealthFacility => "HEALTH_FACILITY",
        }
    }

    /// Jurisdictions are areas; offices and facilities are buildings.
    fn physical_type(&self) -> CodeableConcept {
        let (code, display) = match self {
            Self::AdminStructure => ("jdn", "Jurisdiction"),
            Self::CrvsOffice | Self::HealthFacility => ("bu", "Building"),
        };
        CodeableConcept {
            coding: vec![Coding {
                display: Some(display.to_string()),
                ..Coding::new(PHYSICAL_TYPE_SYSTEM, code)
            }],
            ..CodeableConcept::default()
        }
    }
}

/// Population figures for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LocationStatistic {
    pub year: u32,
    pub male_population: u64,
    pub female_population: u64,
    pub population: u64,
    pub crude_birth_rate: f64,
}

fn validate_statistics(stats: &[LocationStatistic]) -> Result<(), ValidationError> {
    for (i, s) in stats.iter().enumerate() {
        if !s.crude_birth_rate.is_finite() || s.crude_birth_rate < 0.0 {
            return Err(ValidationError::invalid(
                format!("statistics[{i}].crude_birth_rate"),
                "must be a non-negative number",
            ));
        }
    }
    Ok(())
}

fn statistics_extension(stats: &[LocationStatistic]) -> Result<String, AppError> {
    serde_json::to_string(stats)
        .map_err(|e| AppError::Internal(format!("statistics serialization: {e}")))
}

/// Request to create a location.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateLocationRequest {
    #[serde(rename = "statisticalID")]
    pub statistical_id: String,
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    /// `Location/<id>` of the parent, or `Location/0` for a top-level area.
    pub part_of: String,
    pub code: LocationCode,
    #[serde(default)]
    pub jurisdiction_type: Option<String>,
    #[serde(default)]
    pub statistics: Option<Vec<LocationStatistic>>,
}

impl Validate for CreateLocationRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("statisticalID", &self.statistical_id)?;
        require_non_blank("name", &self.name)?;
        match self.part_of.strip_prefix("Location/") {
            Some(id) if !id.trim().is_empty() => {}
            _ => {
                return Err(ValidationError::invalid(
                    "partOf",
                    "must be a reference of the form Location/<id>",
                ))
            }
        }
        if let Some(stats) = &self.statistics {
            validate_statistics(stats)?;
        }
        Ok(())
    }
}

impl CreateLocationRequest {
    /// Identifier value unique to this location, e.g. `ADMIN_STRUCTURE_oEBf29y8JP8`.
    pub fn statistical_code(&self) -> String {
        format!("{}_{}", self.code.as_str(), self.statistical_id.trim())
    }

    pub fn to_resource(&self) -> Result<LocationResource, AppError> {
        let mut resource = LocationResource::new(self.name.trim());
        resource.set_identifier(STATISTICAL_CODE_SYSTEM, self.statistical_code());
        if let Some(jurisdiction) = &self.jurisdiction_type {
            resource.set_identifier(JURISDICTION_TYPE_SYSTEM, jurisdiction.clone());
        }
        resource.alias = self.alias.iter().cloned().collect();
        resource.part_of = Some(Reference::to(self.part_of.clone()));
        resource.location_type = Some(CodeableConcept::single(
            LOCATION_TYPE_SYSTEM,
            self.code.as_str(),
        ));
        resource.physical_type = Some(self.code.physical_type());
        if let Some(stats) = &self.statistics {
            resource.set_extension(STATISTICS_EXTENSION_URL, statistics_extension(stats)?);
        }
        Ok(resource)
    }
}

/// Request to update a location. At least one field is required.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateLocationRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub alias: Option<Vec<String>>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "inactive")]
    pub status: Option<LocationStatus>,
    #[serde(default)]
    pub jurisdiction_type: Option<String>,
    #[serde(default)]
    pub statistics: Option<Vec<LocationStatistic>>,
}

impl Validate for UpdateLocationRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_none()
            && self.alias.is_none()
            && self.status.is_none()
            && self.jurisdiction_type.is_none()
            && self.statistics.is_none()
        {
            return Err(ValidationError::EmptyField("update".into()));
        }
        if let Some(name) = &self.name {
            require_non_blank("name", name)?;
        }
        if let Some(stats) = &self.statistics {
            validate_statistics(stats)?;
        }
        Ok(())
    }
}

impl UpdateLocationRequest {
    /// Apply the present fields to `resource`.
    pub fn merge_into(&self, resource: &mut LocationResource) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            resource.name = name.trim().to_string();
        }
        if let Some(alias) = &self.alias {
            resource.alias = alias.clone();
        }
        if let Some(status) = self.status {
            resource.status = status;
        }
        if let Some(jurisdiction) = &self.jurisdiction_type {
            resource.set_identifier(JURISDICTION_TYPE_SYSTEM, jurisdiction.clone());
        }
        if let Some(stats) = &self.statistics {
            resource.set_extension(STATISTICS_EXTENSION_URL, statistics_extension(stats)?);
        }
        Ok(())
    }
}

// -- Handlers -----------------------------------------------------------------

/// GET /location: Search locations; the query string is passed to Hearth.
#[utoipa::path(
    get,
    path = "/location",
    responses(
        (status = 200, description = "FHIR searchset bundle"),
        (status = 502, description = "Hearth unavailable"),
    ),
    tag = "api"
)]
pub async fn search_locations(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, AppError> {
    let bundle = state.upstream.hearth().search(query.as_deref()).await?;
    Ok(Json(bundle))
}

/// GET /location/{locationId}: Fetch one location.
#[utoipa::path(
    get,
    path = "/location/{locationId}",
    params(("locationId" = String, Path, description = "Location UUID")),
    responses(
        (status = 200, description = "FHIR Location resource"),
        (status = 400, description = "locationId is not a UUID"),
        (status = 404, description = "Location not found"),
    ),
    tag = "api"
)]
pub async fn get_location(
    State(state): State<AppState>,
    Path(location_id): Path<String>,
) -> Result<Json<LocationResource>, AppError> {
    let id = parse_uuid("locationId", &location_id)?;
    state
        .upstream
        .hearth()
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("location {id} not found")))
}

/// POST /location: Create a location or facility.
#[utoipa::path(
    post,
    path = "/location",
    request_body = CreateLocationRequest,
    responses(
        (status = 201, description = "Location created; body carries its id"),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "natlsysadmin scope required"),
        (status = 409, description = "statisticalID already in use"),
    ),
    tag = "api"
)]
pub async fn create_location(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CreateLocationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    require_scope(&caller, &[Scope::NatlSysAdmin])?;
    let req = extract_validated_json(body)?;

    let hearth = state.upstream.hearth();
    let statistical_code = req.statistical_code();
    if hearth.identifier_exists(&statistical_code).await? {
        return Err(AppError::Conflict(format!(
            "location with statisticalID {} already exists",
            req.statistical_id
        )));
    }

    let id = hearth.create(&req.to_resource()?).await?;
    tracing::info!(location_id = %id, code = req.code.as_str(), "location created");
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// PUT /location/{locationId}: Update a location or facility.
#[utoipa::path(
    put,
    path = "/location/{locationId}",
    params(("locationId" = String, Path, description = "Location UUID")),
    request_body = UpdateLocationRequest,
    responses(
        (status = 200, description = "Updated FHIR Location resource"),
        (status = 400, description = "Invalid payload or locationId"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "natlsysadmin scope required"),
        (status = 404, description = "Location not found"),
    ),
    tag = "api"
)]
pub async fn update_location(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(location_id): Path<String>,
    body: Result<Json<UpdateLocationRequest>, JsonRejection>,
) -> Result<Json<LocationResource>, AppError> {
    require_scope(&caller, &[Scope::NatlSysAdmin])?;
    let id = parse_uuid("locationId", &location_id)?;
    let req = extract_validated_json(body)?;

    let hearth = state.upstream.hearth();
    let mut resource = hearth
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("location {id} not found")))?;

    req.merge_into(&mut resource)?;
    resource.id = Some(id.to_string());
    hearth.update(id, &resource).await?;

    tracing::info!(location_id = %id, "location updated");
    Ok(Json(resource))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateLocationRequest {
        serde_json::from_value(json!({
            "statisticalID": "oEBf29y8JP8",
            "name": "Ibombo",
            "alias": "ibombo",
            "partOf": "Location/0",
            "code": "ADMIN_STRUCTURE",
            "jurisdictionType": "DISTRICT",
            "statistics": [{
                "year": 2023,
                "male_population": 100,
                "female_population": 120,
                "population": 220,
                "crude_birth_rate": 12.5
            }]
        }))
        .unwrap()
    }

    #[test]
    fn create_request_builds_fhir_location() {
        let resource = create_request().to_resource().unwrap();
        assert_eq!(resource.name, "Ibombo");
        assert_eq!(resource.alias, vec!["ibombo"]);
        assert_eq!(
            resource.identifier_value(STATISTICAL_CODE_SYSTEM),
            Some("ADMIN_STRUCTURE_oEBf29y8JP8")
        );
        assert_eq!(resource.identifier_value(JURISDICTION_TYPE_SYSTEM), Some("DISTRICT"));
        assert_eq!(resource.part_of.unwrap().reference, "Location/0");
        assert_eq!(resource.physical_type.unwrap().first_code(), Some("jdn"));
        let stats: Value =
            serde_json::from_str(resource.extension[0].value_string.as_deref().unwrap()).unwrap();
        assert_eq!(stats[0]["population"], 220);
    }

    #[test]
    fn facilities_are_buildings() {
        let mut req = create_request();
        req.code = LocationCode::HealthFacility;
        let resource = req.to_resource().unwrap();
        assert_eq!(resource.physical_type.unwrap().first_code(), Some("bu"));
        assert_eq!(
            resource.location_type.unwrap().first_code(),
            Some("HEALTH_FACILITY")
        );
    }

    #[test]
    fn create_request_validation() {
        assert!(create_request().validate().is_ok());

        let mut req = create_request();
        req.part_of = "Patient/1".into();
        assert!(req.validate().is_err());

        let mut req = create_request();
        req.name = " ".into();
        assert_eq!(req.validate(), Err(ValidationError::EmptyField("name".into())));

        let mut req = create_request();
        if let Some(stats) = req.statistics.as_mut() {
            stats[0].crude_birth_rate = -1.0;
        }
        assert!(req.validate().is_err());
    }

    #[test]
    fn unknown_location_code_rejected() {
        let result = serde_json::from_value::<CreateLocationRequest>(json!({
            "statisticalID": "x",
            "name": "Farm",
            "partOf": "Location/0",
            "code": "FARM"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn empty_update_rejected() {
        assert_eq!(
            UpdateLocationRequest::default().validate(),
            Err(ValidationError::EmptyField("update".into()))
        );
    }

    #[test]
    fn update_merges_present_fields_only() {
        let mut resource = create_request().to_resource().unwrap();
        let update: UpdateLocationRequest =
            serde_json::from_value(json!({ "status": "inactive", "jurisdictionType": "PROVINCE" }))
                .unwrap();
        update.merge_into(&mut resource).unwrap();
        assert_eq!(resource.status, LocationStatus::Inactive);
        assert_eq!(resource.name, "Ibombo");
        assert_eq!(resource.identifier_value(JURISDICTION_TYPE_SYSTEM), Some("PROVINCE"));
        assert_eq!(resource.identifier.len(), 2);
    }
}
