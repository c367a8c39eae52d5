//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the professor REST endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::{
    auth::{
        AdminUser, LoginRequest, LoginResponse, TokenClaimsDto, VerifyTokenRequest,
        VerifyTokenResponse,
    },
    images::UploadResponse,
    response::{ApiResponse, HttpError, MessageResponse},
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use professor_directory_core::{
    Page, Professor, ProfessorChanges, ProfessorDraft, ProfessorFilter, ProfessorId, Weekday,
    WeeklySchedule,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{IntoParams, Modify, OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_professors_handler,
        get_professor_handler,
        create_professor_handler,
        update_professor_handler,
        delete_professor_handler,
        list_departments_handler,
        list_by_department_handler,
        health_handler,
        crate::web::auth::login_handler,
        crate::web::auth::verify_token_handler,
        crate::web::images::upload_image_handler,
    ),
    components(
        schemas(
            ProfessorDto, OfficeHoursDto, ProfessorPayload, CreatedProfessor, HealthResponse,
            MessageResponse, LoginRequest, LoginResponse, AdminUser, VerifyTokenRequest,
            VerifyTokenResponse, TokenClaimsDto, UploadResponse
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "Professor Directory API", description = "Public directory search and admin record management.")
    )
)]
pub struct ApiDoc;

/// Registers the `Authorization: Bearer` scheme the write endpoints refer to.
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// One day with office hours.
#[derive(Serialize, ToSchema)]
pub struct OfficeHoursDto {
    pub day: String,
    pub hours: String,
}

/// A professor as sent to the frontend.
#[derive(Serialize, ToSchema)]
pub struct ProfessorDto {
    pub id: ProfessorId,
    pub full_name: String,
    pub department: String,
    pub email: String,
    pub office_location: Option<String>,
    pub profile_image_url: Option<String>,
    pub schedule_monday: Option<String>,
    pub schedule_tuesday: Option<String>,
    pub schedule_wednesday: Option<String>,
    pub schedule_thursday: Option<String>,
    pub schedule_friday: Option<String>,
    pub schedule_saturday: Option<String>,
    pub schedule_sunday: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Days that actually have office hours; "Not Available" and empty days are omitted.
    pub office_hours: Vec<OfficeHoursDto>,
}

impl From<Professor> for ProfessorDto {
    fn from(p: Professor) -> Self {
        let office_hours = p
            .schedule
            .available_days()
            .into_iter()
            .map(|(day, hours)| OfficeHoursDto {
                day: day.as_str().to_string(),
                hours: hours.to_string(),
            })
            .collect();
        let day = |d: Weekday| p.schedule.get(d).map(str::to_string);

        Self {
            id: p.id,
            schedule_monday: day(Weekday::Monday),
            schedule_tuesday: day(Weekday::Tuesday),
            schedule_wednesday: day(Weekday::Wednesday),
            schedule_thursday: day(Weekday::Thursday),
            schedule_friday: day(Weekday::Friday),
            schedule_saturday: day(Weekday::Saturday),
            schedule_sunday: day(Weekday::Sunday),
            office_hours,
            full_name: p.full_name,
            department: p.department,
            email: p.email,
            office_location: p.office_location,
            profile_image_url: p.profile_image_url,
            notes: p.notes,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Keeps an explicit `null` distinguishable from an absent key.
fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Body of create and update requests. On update, absent keys are left
/// untouched and `null` clears an optional field.
#[derive(Deserialize, ToSchema, Default)]
pub struct ProfessorPayload {
    pub full_name: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub office_location: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub profile_image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub schedule_monday: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub schedule_tuesday: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub schedule_wednesday: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub schedule_thursday: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub schedule_friday: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub schedule_saturday: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub schedule_sunday: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

impl ProfessorPayload {
    fn schedule_fields(&self) -> [(Weekday, &Option<Option<String>>); 7] {
        [
            (Weekday::Monday, &self.schedule_monday),
            (Weekday::Tuesday, &self.schedule_tuesday),
            (Weekday::Wednesday, &self.schedule_wednesday),
            (Weekday::Thursday, &self.schedule_thursday),
            (Weekday::Friday, &self.schedule_friday),
            (Weekday::Saturday, &self.schedule_saturday),
            (Weekday::Sunday, &self.schedule_sunday),
        ]
    }

    fn into_draft(self) -> ProfessorDraft {
        let mut schedule = WeeklySchedule::default();
        for (day, value) in self.schedule_fields() {
            schedule.set(day, value.clone().flatten());
        }
        ProfessorDraft {
            full_name: self.full_name,
            department: self.department,
            email: self.email,
            office_location: self.office_location.flatten(),
            profile_image_url: self.profile_image_url.flatten(),
            schedule,
            notes: self.notes.flatten(),
        }
    }

    fn into_changes(self) -> ProfessorChanges {
        let mut changes = ProfessorChanges::default();
        for (day, value) in self.schedule_fields() {
            if let Some(value) = value {
                changes.set_schedule(day, value.clone());
            }
        }
        ProfessorChanges {
            full_name: self.full_name,
            department: self.department,
            email: self.email,
            office_location: self.office_location,
            profile_image_url: self.profile_image_url,
            notes: self.notes,
            ..changes
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct CreatedProfessor {
    pub id: ProfessorId,
}

/// Query string of the listing endpoint. Values stay raw so that bad numbers
/// fall back to defaults instead of failing the request. `limit` and `offset`
/// must be whole integers: `2.5` or `10abc` count as absent, not truncated.
#[derive(Deserialize, IntoParams, Default)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Case-insensitive substring of name, email or department.
    pub search: Option<String>,
    /// Alias of `search`.
    pub q: Option<String>,
    /// Exact department match.
    pub department: Option<String>,
    /// Integer clamped to 1..=200, default 50.
    pub limit: Option<String>,
    /// Integer clamped to 0..=1_000_000, default 0.
    pub offset: Option<String>,
}

impl ListParams {
    fn filter(&self) -> ProfessorFilter {
        let search = self
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(self.q.as_deref());
        ProfessorFilter::new(
            search,
            self.department.as_deref(),
            Page::parse(self.limit.as_deref(), self.offset.as_deref()),
        )
    }
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub database: bool,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List and search professors.
#[utoipa::path(
    get,
    path = "/professors",
    params(ListParams),
    responses(
        (status = 200, description = "Matching professors ordered by full name", body = ApiResponse<Vec<ProfessorDto>>),
        (status = 500, description = "Internal server error", body = MessageResponse)
    )
)]
pub async fn list_professors_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<Vec<ProfessorDto>>>, HttpError> {
    let listing = state.directory.list(&params.filter()).await?;
    let professors = listing.professors.into_iter().map(ProfessorDto::from).collect();
    Ok(Json(ApiResponse::listing(professors, listing.count)))
}

/// Fetch one professor.
#[utoipa::path(
    get,
    path = "/professors/{id}",
    params(("id" = i64, Path, description = "Professor identifier")),
    responses(
        (status = 200, description = "The professor", body = ApiResponse<ProfessorDto>),
        (status = 400, description = "Invalid identifier", body = MessageResponse),
        (status = 404, description = "Professor not found", body = MessageResponse)
    )
)]
pub async fn get_professor_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ProfessorDto>>, HttpError> {
    let professor = state.directory.get_by_id(&id).await?;
    Ok(Json(ApiResponse::data(professor.into())))
}

/// Create a professor. Requires an admin bearer token.
#[utoipa::path(
    post,
    path = "/professors",
    request_body = ProfessorPayload,
    responses(
        (status = 201, description = "Professor created", body = ApiResponse<CreatedProfessor>),
        (status = 400, description = "Missing fields, bad email or duplicate email", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse)
    ),
    security(("bearer_token" = []))
)]
pub async fn create_professor_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProfessorPayload>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(payload) = payload?;
    let id = state.directory.create(payload.into_draft()).await?;
    let body = ApiResponse::data(CreatedProfessor { id })
        .with_message("Professor created successfully");
    Ok((StatusCode::CREATED, Json(body)))
}

/// Partially update a professor. Requires an admin bearer token.
#[utoipa::path(
    put,
    path = "/professors/{id}",
    params(("id" = i64, Path, description = "Professor identifier")),
    request_body = ProfessorPayload,
    responses(
        (status = 200, description = "Professor updated", body = MessageResponse),
        (status = 400, description = "Invalid identifier, no fields, or bad email", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 404, description = "Professor not found", body = MessageResponse)
    ),
    security(("bearer_token" = []))
)]
pub async fn update_professor_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ProfessorPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, HttpError> {
    let Json(payload) = payload?;
    if !state.directory.update(&id, payload.into_changes()).await? {
        return Err(HttpError::NotFound("Professor not found".to_string()));
    }
    Ok(Json(MessageResponse::ok("Professor updated successfully")))
}

/// Delete a professor. Requires an admin bearer token.
#[utoipa::path(
    delete,
    path = "/professors/{id}",
    params(("id" = i64, Path, description = "Professor identifier")),
    responses(
        (status = 204, description = "Professor deleted"),
        (status = 400, description = "Invalid identifier", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 404, description = "Professor not found", body = MessageResponse)
    ),
    security(("bearer_token" = []))
)]
pub async fn delete_professor_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, HttpError> {
    state.directory.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Distinct departments currently in the directory.
#[utoipa::path(
    get,
    path = "/professors/departments",
    responses(
        (status = 200, description = "Sorted department names", body = ApiResponse<Vec<String>>)
    )
)]
pub async fn list_departments_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<String>>>, HttpError> {
    let departments = state.directory.departments().await?;
    Ok(Json(ApiResponse::data(departments)))
}

/// Every professor of one department.
#[utoipa::path(
    get,
    path = "/professors/department/{department}",
    params(("department" = String, Path, description = "Exact department name")),
    responses(
        (status = 200, description = "Professors ordered by full name", body = ApiResponse<Vec<ProfessorDto>>),
        (status = 400, description = "Department missing", body = MessageResponse)
    )
)]
pub async fn list_by_department_handler(
    State(state): State<Arc<AppState>>,
    Path(department): Path<String>,
) -> Result<Json<ApiResponse<Vec<ProfessorDto>>>, HttpError> {
    let listing = state.directory.list_by_department(&department).await?;
    let professors = listing.professors.into_iter().map(ProfessorDto::from).collect();
    Ok(Json(ApiResponse::listing(professors, listing.count)))
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Server is up", body = HealthResponse))
)]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "ok".to_string(),
        database: state.directory.store_reachable().await,
    })
}
