use std::collections::HashSet;

use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::{event_repo, registration_repo};
use crate::error::{PipelineError, PipelineResult};
use crate::models::{AttendanceStatus, EventRow, RegistrationRow};

use super::{access_control, clock};

/// One entry of a bulk validation batch.
#[derive(Debug, Clone)]
pub struct AttendanceUpdate {
    pub registration_id: String,
    pub status: AttendanceStatus,
}

/// Records attendance on a single active registration. Staff only.
pub async fn validate_one(
    pool: &SqlitePool,
    event_id: &str,
    registration_id: &str,
    status: AttendanceStatus,
    validator_id: &str,
) -> PipelineResult<RegistrationRow> {
    access_control::ensure_event_staff(pool, validator_id).await?;
    load_event(pool, event_id).await?;

    let Some(status_column) = status.as_column() else {
        return Err(PipelineError::InvalidState(
            "attendance status required; use reset to clear a validation".to_string(),
        ));
    };

    let Some(mut registration) = registration_repo::load_by_id(pool, registration_id).await? else {
        return Err(PipelineError::NotFound(format!(
            "registration not found: {registration_id}"
        )));
    };
    if registration.event_id != event_id {
        // A registration under a different event is not found for this one.
        return Err(PipelineError::NotFound(format!(
            "registration not found: {registration_id}"
        )));
    }
    if !registration.is_active() {
        return Err(PipelineError::InvalidState(
            "cannot validate attendance on a cancelled registration".to_string(),
        ));
    }

    let validated_at = clock::now_timestamp();
    registration_repo::update_attendance(
        pool,
        registration_id,
        Some(status_column),
        Some(validator_id),
        Some(validated_at.as_str()),
    )
    .await?;

    registration.attendance_status = Some(status_column.to_string());
    registration.attendance_validated_by = Some(validator_id.to_string());
    registration.attendance_validated_at = Some(validated_at);
    Ok(registration)
}

/// Applies a batch of attendance updates. Authorization is checked once up
/// front, all ids are resolved in a single lookup, and the updates commit as
/// one transaction. Ids that do not resolve to an active registration of this
/// event are skipped; the returned count covers rows actually updated.
pub async fn validate_bulk(
    pool: &SqlitePool,
    event_id: &str,
    items: &[AttendanceUpdate],
    validator_id: &str,
) -> PipelineResult<u64> {
    access_control::ensure_event_staff(pool, validator_id).await?;
    load_event(pool, event_id).await?;

    let ids: Vec<String> = items
        .iter()
        .map(|item| item.registration_id.clone())
        .collect();
    let resolved = registration_repo::list_active_by_ids_for_event(pool, event_id, &ids).await?;
    if resolved.is_empty() {
        return Ok(0);
    }

    let mut pending: HashSet<&str> = resolved
        .iter()
        .map(|registration| registration.registration_id.as_str())
        .collect();

    let validated_at = clock::now_timestamp();
    let mut tx = pool.begin().await?;
    let mut updated = 0u64;

    for item in items {
        // Consuming the set also collapses duplicate ids within one batch.
        if !pending.remove(item.registration_id.as_str()) {
            continue;
        }
        let Some(status_column) = item.status.as_column() else {
            continue;
        };
        updated += registration_repo::update_attendance(
            &mut *tx,
            &item.registration_id,
            Some(status_column),
            Some(validator_id),
            Some(validated_at.as_str()),
        )
        .await?;
    }

    tx.commit().await?;
    Ok(updated)
}

/// Clears a registration's attendance back to unvalidated. Tolerant of a
/// missing target: returns false instead of erroring.
pub async fn reset(
    pool: &SqlitePool,
    event_id: &str,
    registration_id: &str,
    validator_id: &str,
) -> PipelineResult<bool> {
    access_control::ensure_event_staff(pool, validator_id).await?;

    let Some(event) = event_repo::load_event_by_id(pool, event_id).await? else {
        return Ok(false);
    };
    let Some(registration) = registration_repo::load_by_id(pool, registration_id).await? else {
        return Ok(false);
    };
    if registration.event_id != event.event_id {
        return Ok(false);
    }

    registration_repo::update_attendance(pool, registration_id, None, None, None).await?;
    Ok(true)
}

#[derive(Debug, Serialize)]
pub struct AttendanceStats {
    pub registered: i64,
    pub present: i64,
    pub absent: i64,
    pub excused: i64,
    pub unvalidated: i64,
    pub attendance_rate: f64,
    pub validation_rate: f64,
}

/// Attendance counts and rates over the event's active registrations.
pub async fn stats(pool: &SqlitePool, event_id: &str) -> PipelineResult<AttendanceStats> {
    load_event(pool, event_id).await?;

    let buckets = registration_repo::count_attendance_buckets(pool, event_id).await?;

    let mut present = 0i64;
    let mut absent = 0i64;
    let mut excused = 0i64;
    let mut unvalidated = 0i64;
    for bucket in buckets {
        match AttendanceStatus::from_column(bucket.attendance_status.as_deref()) {
            AttendanceStatus::Present => present += bucket.bucket_count,
            AttendanceStatus::Absent => absent += bucket.bucket_count,
            AttendanceStatus::Excused => excused += bucket.bucket_count,
            AttendanceStatus::Unvalidated => unvalidated += bucket.bucket_count,
        }
    }

    let validated = present + absent + excused;
    let registered = validated + unvalidated;

    Ok(AttendanceStats {
        registered,
        present,
        absent,
        excused,
        unvalidated,
        attendance_rate: percentage(present, validated),
        validation_rate: percentage(validated, registered),
    })
}

fn percentage(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    let rate = numerator as f64 / denominator as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

async fn load_event(pool: &SqlitePool, event_id: &str) -> PipelineResult<EventRow> {
    let Some(event) = event_repo::load_event_by_id(pool, event_id).await? else {
        return Err(PipelineError::NotFound(format!(
            "event not found: {event_id}"
        )));
    };
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::percentage;

    #[test]
    fn percentage_rounds_to_two_decimals() {
        assert_eq!(percentage(5, 8), 62.5);
        assert_eq!(percentage(8, 10), 80.0);
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
    }

    #[test]
    fn percentage_is_zero_on_empty_denominator() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(5, 0), 0.0);
    }
}
