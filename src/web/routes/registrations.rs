use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::PipelineError;
use crate::models::RegistrationRow;
use crate::services::registration_service;
use crate::web::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Default)]
pub struct RegisterForm {
    pub answers: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct RegistrationView {
    pub registration_id: String,
    pub event_id: String,
    pub participant_id: String,
    pub status: String,
    pub registered_at: String,
    pub attendance_status: Option<String>,
    pub attendance_validated_by: Option<String>,
    pub attendance_validated_at: Option<String>,
}

impl RegistrationView {
    pub fn from_row(row: RegistrationRow) -> RegistrationView {
        RegistrationView {
            registration_id: row.registration_id,
            event_id: row.event_id,
            participant_id: row.participant_id,
            status: row.status,
            registered_at: row.registered_at,
            attendance_status: row.attendance_status,
            attendance_validated_by: row.attendance_validated_by,
            attendance_validated_at: row.attendance_validated_at,
        }
    }
}

pub async fn register_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(event_id): Path<String>,
    State(pool): State<SqlitePool>,
    body: Option<Json<RegisterForm>>,
) -> Result<Json<RegistrationView>, PipelineError> {
    let form = body.map(|Json(form)| form).unwrap_or_default();
    let answers_json = form.answers.as_ref().map(|v| v.to_string());

    let row = registration_service::register(
        &pool,
        &event_id,
        &auth_user.id,
        answers_json.as_deref(),
    )
    .await?;
    Ok(Json(RegistrationView::from_row(row)))
}

pub async fn unregister_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(event_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Result<Json<RegistrationView>, PipelineError> {
    let row = registration_service::unregister(&pool, &event_id, &auth_user.id).await?;
    Ok(Json(RegistrationView::from_row(row)))
}

pub async fn list_handler(
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Path(event_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<RegistrationView>>, PipelineError> {
    let rows = registration_service::list_registrations(&pool, &event_id).await?;
    Ok(Json(rows.into_iter().map(RegistrationView::from_row).collect()))
}
