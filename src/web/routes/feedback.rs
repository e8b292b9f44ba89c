use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::PipelineError;
use crate::models::FeedbackResponseRow;
use crate::services::feedback_service::{self, FeedbackSummary};
use crate::web::middleware::auth::AuthenticatedUser;

#[derive(Debug, Serialize)]
pub struct FeedbackResponseView {
    pub response_id: String,
    pub event_id: String,
    pub participant_id: String,
    pub payload: serde_json::Value,
    pub submitted_at: String,
    pub updated_at: Option<String>,
}

impl FeedbackResponseView {
    fn from_row(row: FeedbackResponseRow) -> FeedbackResponseView {
        let payload =
            serde_json::from_str(&row.payload_json).unwrap_or(serde_json::Value::Null);
        FeedbackResponseView {
            response_id: row.response_id,
            event_id: row.event_id,
            participant_id: row.participant_id,
            payload,
            submitted_at: row.submitted_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EligibilityView {
    pub eligible: bool,
    pub reason: Option<&'static str>,
    pub has_submitted: bool,
    pub response: Option<FeedbackResponseView>,
}

pub async fn eligibility_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(event_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Result<Json<EligibilityView>, PipelineError> {
    let eligibility =
        feedback_service::check_eligibility(&pool, &event_id, &auth_user.id).await?;
    Ok(Json(EligibilityView {
        eligible: eligibility.eligible,
        reason: eligibility.reason.map(|r| r.as_str()),
        has_submitted: eligibility.has_submitted,
        response: eligibility.response.map(FeedbackResponseView::from_row),
    }))
}

#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    pub payload: serde_json::Value,
}

pub async fn submit_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(event_id): Path<String>,
    State(pool): State<SqlitePool>,
    Json(form): Json<FeedbackForm>,
) -> Result<Json<FeedbackResponseView>, PipelineError> {
    let payload_json = form.payload.to_string();
    let row =
        feedback_service::submit(&pool, &event_id, &auth_user.id, &payload_json).await?;
    Ok(Json(FeedbackResponseView::from_row(row)))
}

pub async fn update_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(event_id): Path<String>,
    State(pool): State<SqlitePool>,
    Json(form): Json<FeedbackForm>,
) -> Result<Json<FeedbackResponseView>, PipelineError> {
    let payload_json = form.payload.to_string();
    let row =
        feedback_service::update(&pool, &event_id, &auth_user.id, &payload_json).await?;
    Ok(Json(FeedbackResponseView::from_row(row)))
}

pub async fn summary_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(event_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Result<Json<FeedbackSummary>, PipelineError> {
    let summary = feedback_service::summary(&pool, &event_id, &auth_user.id).await?;
    Ok(Json(summary))
}
