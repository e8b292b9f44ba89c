use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::{event_repo, feedback_repo, registration_repo};
use crate::error::{PipelineError, PipelineResult};
use crate::models::{
    AttendanceStatus, EligibilityBlock, EventRow, FeedbackResponseRow, RegistrationRow,
};

use super::{access_control, clock};

#[derive(Debug)]
pub struct FeedbackEligibility {
    pub eligible: bool,
    pub reason: Option<EligibilityBlock>,
    pub has_submitted: bool,
    pub response: Option<FeedbackResponseRow>,
}

/// Reports whether the participant may currently submit or update feedback.
/// A prior submission does not make the pair ineligible; submit and update
/// share this gate and only the mutating operations tell them apart.
pub async fn check_eligibility(
    pool: &SqlitePool,
    event_id: &str,
    participant_id: &str,
) -> PipelineResult<FeedbackEligibility> {
    let event = load_event(pool, event_id).await?;
    let registration = registration_repo::load_by_pair(pool, event_id, participant_id).await?;

    if let Some(block) = blocking_reason(&event, registration.as_ref())? {
        return Ok(FeedbackEligibility {
            eligible: false,
            reason: Some(block),
            has_submitted: false,
            response: None,
        });
    }

    let response = feedback_repo::load_by_pair(pool, event_id, participant_id).await?;
    Ok(FeedbackEligibility {
        eligible: true,
        reason: None,
        has_submitted: response.is_some(),
        response,
    })
}

/// Creates the participant's feedback response. Re-runs the full eligibility
/// check; a prior descriptor is never trusted.
pub async fn submit(
    pool: &SqlitePool,
    event_id: &str,
    participant_id: &str,
    payload_json: &str,
) -> PipelineResult<FeedbackResponseRow> {
    let eligibility = check_eligibility(pool, event_id, participant_id).await?;
    if let Some(reason) = eligibility.reason {
        return Err(PipelineError::InvalidState(reason.message().to_string()));
    }
    if eligibility.has_submitted {
        return Err(PipelineError::InvalidState(
            "feedback already submitted; use update instead".to_string(),
        ));
    }

    let response_id = Uuid::new_v4().to_string();
    let submitted_at = clock::now_timestamp();
    feedback_repo::insert(
        pool,
        feedback_repo::NewFeedbackResponse {
            response_id: &response_id,
            event_id,
            participant_id,
            payload_json,
            submitted_at: &submitted_at,
        },
    )
    .await?;

    Ok(FeedbackResponseRow {
        response_id,
        event_id: event_id.to_string(),
        participant_id: participant_id.to_string(),
        payload_json: payload_json.to_string(),
        submitted_at,
        updated_at: None,
    })
}

/// Overwrites an existing response. Only the deadline is re-checked here;
/// attendance cannot un-happen after a successful submission.
pub async fn update(
    pool: &SqlitePool,
    event_id: &str,
    participant_id: &str,
    payload_json: &str,
) -> PipelineResult<FeedbackResponseRow> {
    let event = load_event(pool, event_id).await?;

    let Some(mut response) = feedback_repo::load_by_pair(pool, event_id, participant_id).await?
    else {
        return Err(PipelineError::NotFound(
            "no feedback response to update".to_string(),
        ));
    };

    if deadline_passed(&event)? {
        return Err(PipelineError::InvalidState(
            EligibilityBlock::DeadlinePassed.message().to_string(),
        ));
    }

    let updated_at = clock::now_timestamp();
    feedback_repo::update_payload(pool, &response.response_id, payload_json, &updated_at).await?;

    response.payload_json = payload_json.to_string();
    response.updated_at = Some(updated_at);
    Ok(response)
}

#[derive(Debug, Serialize)]
pub struct FeedbackSummary {
    pub attendees: i64,
    pub responses: i64,
    pub response_rate: f64,
}

/// Response-rate statistics over confirmed attendees. Staff only.
pub async fn summary(
    pool: &SqlitePool,
    event_id: &str,
    caller_id: &str,
) -> PipelineResult<FeedbackSummary> {
    access_control::ensure_event_staff(pool, caller_id).await?;
    load_event(pool, event_id).await?;

    let attendees = registration_repo::count_present(pool, event_id).await?;
    let responses = feedback_repo::count_for_event(pool, event_id).await?;

    Ok(FeedbackSummary {
        attendees,
        responses,
        response_rate: percentage(responses, attendees),
    })
}

/// The first blocking condition, in precedence order: no configured form,
/// then no confirmed presence, then an expired deadline.
fn blocking_reason(
    event: &EventRow,
    registration: Option<&RegistrationRow>,
) -> PipelineResult<Option<EligibilityBlock>> {
    if !event.has_feedback_form() {
        return Ok(Some(EligibilityBlock::NoFeedbackForm));
    }

    let attended = match registration.map(RegistrationRow::attendance) {
        Some(AttendanceStatus::Present) => true,
        Some(AttendanceStatus::Absent)
        | Some(AttendanceStatus::Excused)
        | Some(AttendanceStatus::Unvalidated)
        | None => false,
    };
    if !attended {
        return Ok(Some(EligibilityBlock::NotAttended));
    }

    if deadline_passed(event)? {
        return Ok(Some(EligibilityBlock::DeadlinePassed));
    }

    Ok(None)
}

fn deadline_passed(event: &EventRow) -> PipelineResult<bool> {
    let Some(raw) = event
        .feedback_deadline
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    else {
        return Ok(false);
    };

    let deadline = clock::parse_timestamp(raw).ok_or_else(|| {
        PipelineError::Internal(format!(
            "malformed feedback_deadline on event {}: {raw}",
            event.event_id
        ))
    })?;

    // The deadline instant itself still accepts submissions.
    Ok(clock::now() > deadline)
}

async fn load_event(pool: &SqlitePool, event_id: &str) -> PipelineResult<EventRow> {
    let Some(event) = event_repo::load_event_by_id(pool, event_id).await? else {
        return Err(PipelineError::NotFound(format!(
            "event not found: {event_id}"
        )));
    };
    Ok(event)
}

fn percentage(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    let rate = numerator as f64 / denominator as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}
