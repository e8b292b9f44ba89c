use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::PipelineError;
use crate::models::AttendanceStatus;
use crate::services::attendance_service::{self, AttendanceStats, AttendanceUpdate};
use crate::web::middleware::auth::AuthenticatedUser;

use super::registrations::RegistrationView;

#[derive(Debug, Deserialize)]
pub struct ValidateForm {
    pub status: String,
}

pub async fn validate_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path((event_id, registration_id)): Path<(String, String)>,
    State(pool): State<SqlitePool>,
    Json(form): Json<ValidateForm>,
) -> Result<Json<RegistrationView>, PipelineError> {
    let status = parse_status(&form.status)?;
    let row = attendance_service::validate_one(
        &pool,
        &event_id,
        &registration_id,
        status,
        &auth_user.id,
    )
    .await?;
    Ok(Json(RegistrationView::from_row(row)))
}

#[derive(Debug, Deserialize)]
pub struct BulkValidateForm {
    pub items: Vec<BulkValidateItem>,
}

#[derive(Debug, Deserialize)]
pub struct BulkValidateItem {
    pub registration_id: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct BulkValidateResult {
    pub updated: u64,
}

pub async fn validate_bulk_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(event_id): Path<String>,
    State(pool): State<SqlitePool>,
    Json(form): Json<BulkValidateForm>,
) -> Result<Json<BulkValidateResult>, PipelineError> {
    let mut items = Vec::with_capacity(form.items.len());
    for item in &form.items {
        items.push(AttendanceUpdate {
            registration_id: item.registration_id.clone(),
            status: parse_status(&item.status)?,
        });
    }

    let updated =
        attendance_service::validate_bulk(&pool, &event_id, &items, &auth_user.id).await?;
    Ok(Json(BulkValidateResult { updated }))
}

#[derive(Debug, Serialize)]
pub struct ResetResult {
    pub cleared: bool,
}

pub async fn reset_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path((event_id, registration_id)): Path<(String, String)>,
    State(pool): State<SqlitePool>,
) -> Result<Json<ResetResult>, PipelineError> {
    let cleared =
        attendance_service::reset(&pool, &event_id, &registration_id, &auth_user.id).await?;
    Ok(Json(ResetResult { cleared }))
}

pub async fn stats_handler(
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Path(event_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Result<Json<AttendanceStats>, PipelineError> {
    let stats = attendance_service::stats(&pool, &event_id).await?;
    Ok(Json(stats))
}

fn parse_status(input: &str) -> Result<AttendanceStatus, PipelineError> {
    AttendanceStatus::parse_validated(input.trim()).ok_or_else(|| {
        PipelineError::InvalidState(format!("unknown attendance status: {input}"))
    })
}
