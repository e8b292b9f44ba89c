use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::{event_repo, registration_repo};
use crate::error::{PipelineError, PipelineResult};
use crate::models::{EventRow, RegistrationRow, RegistrationStatus};

use super::clock;

/// Registers a participant for an event, reusing a previously cancelled row
/// when one exists. The capacity check and the write happen inside one
/// transaction so concurrent registrants cannot race past the cap.
pub async fn register(
    pool: &SqlitePool,
    event_id: &str,
    participant_id: &str,
    answers_json: Option<&str>,
) -> PipelineResult<RegistrationRow> {
    let event = load_event(pool, event_id).await?;
    check_registration_window(&event)?;

    let mut tx = pool.begin().await?;

    let existing = registration_repo::load_by_pair(&mut *tx, event_id, participant_id).await?;

    let registration_id = match existing {
        Some(registration) if registration.is_active() => {
            return Err(PipelineError::InvalidState(
                "already registered for this event".to_string(),
            ));
        }
        Some(registration) => {
            // Cancelled row: flip it back instead of inserting, so the
            // (event, participant) pair keeps a single registration identity.
            registration_repo::reactivate(
                &mut *tx,
                &registration.registration_id,
                answers_json,
                &clock::now_timestamp(),
            )
            .await?;
            registration.registration_id
        }
        None => {
            if let Some(cap) = event.max_participants {
                let active = registration_repo::count_active(&mut *tx, event_id).await?;
                if active >= cap {
                    return Err(PipelineError::InvalidState(
                        "event is at maximum capacity".to_string(),
                    ));
                }
            }

            let registration_id = Uuid::new_v4().to_string();
            registration_repo::insert(
                &mut *tx,
                registration_repo::NewRegistration {
                    registration_id: &registration_id,
                    event_id,
                    participant_id,
                    answers_json,
                    registered_at: &clock::now_timestamp(),
                },
            )
            .await?;
            registration_id
        }
    };

    let confirmed = registration_repo::load_by_id(&mut *tx, &registration_id)
        .await?
        .ok_or(PipelineError::Database(sqlx::Error::RowNotFound))?;

    tx.commit().await?;
    Ok(confirmed)
}

/// Soft-cancels the participant's active registration. The row stays behind
/// with status `cancelled`; capacity is released because active counts no
/// longer see it.
pub async fn unregister(
    pool: &SqlitePool,
    event_id: &str,
    participant_id: &str,
) -> PipelineResult<RegistrationRow> {
    load_event(pool, event_id).await?;

    let Some(mut registration) =
        registration_repo::load_by_pair(pool, event_id, participant_id).await?
    else {
        return Err(PipelineError::NotFound(
            "no active registration for this event".to_string(),
        ));
    };
    if !registration.is_active() {
        return Err(PipelineError::NotFound(
            "no active registration for this event".to_string(),
        ));
    }

    registration_repo::update_status(
        pool,
        &registration.registration_id,
        RegistrationStatus::Cancelled.as_str(),
    )
    .await?;

    registration.status = RegistrationStatus::Cancelled.as_str().to_string();
    Ok(registration)
}

/// All registrations for the event, active and cancelled, oldest first.
pub async fn list_registrations(
    pool: &SqlitePool,
    event_id: &str,
) -> PipelineResult<Vec<RegistrationRow>> {
    load_event(pool, event_id).await?;
    let rows = registration_repo::list_for_event(pool, event_id).await?;
    Ok(rows)
}

fn check_registration_window(event: &EventRow) -> PipelineResult<()> {
    let starts_at = parse_stored_timestamp(&event.starts_at, "starts_at", &event.event_id)?;
    let ends_at = parse_stored_timestamp(&event.ends_at, "ends_at", &event.event_id)?;
    let now = clock::now();

    // Both bounds are inclusive.
    if now < starts_at {
        return Err(PipelineError::InvalidState(
            "registration period has not started yet".to_string(),
        ));
    }
    if now > ends_at {
        return Err(PipelineError::InvalidState(
            "registration period has ended".to_string(),
        ));
    }
    Ok(())
}

fn parse_stored_timestamp(
    raw: &str,
    field: &str,
    event_id: &str,
) -> PipelineResult<NaiveDateTime> {
    clock::parse_timestamp(raw).ok_or_else(|| {
        PipelineError::Internal(format!(
            "malformed {field} on event {event_id}: {raw}"
        ))
    })
}

async fn load_event(pool: &SqlitePool, event_id: &str) -> PipelineResult<EventRow> {
    let Some(event) = event_repo::load_event_by_id(pool, event_id).await? else {
        return Err(PipelineError::NotFound(format!(
            "event not found: {event_id}"
        )));
    };
    Ok(event)
}
