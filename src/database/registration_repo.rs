use sqlx::{SqliteExecutor, SqlitePool};

use crate::models::RegistrationRow;

// Functions used inside the capacity and bulk-validation transactions are
// generic over the executor so services can run them on a `pool.begin()`
// transaction as well as on the pool itself.

const SQL_LOAD_REGISTRATION_BY_ID: &str = r#"
SELECT
  registration_id,
  event_id,
  participant_id,
  status,
  answers_json,
  registered_at,
  attendance_status,
  attendance_validated_by,
  attendance_validated_at
FROM registrations
WHERE registration_id = ?
LIMIT 1
"#;

pub async fn load_by_id<'e>(
    db: impl SqliteExecutor<'e>,
    registration_id: &str,
) -> sqlx::Result<Option<RegistrationRow>> {
    sqlx::query_as::<_, RegistrationRow>(SQL_LOAD_REGISTRATION_BY_ID)
        .bind(registration_id)
        .fetch_optional(db)
        .await
}

const SQL_LOAD_REGISTRATION_BY_PAIR: &str = r#"
SELECT
  registration_id,
  event_id,
  participant_id,
  status,
  answers_json,
  registered_at,
  attendance_status,
  attendance_validated_by,
  attendance_validated_at
FROM registrations
WHERE event_id = ?
  AND participant_id = ?
LIMIT 1
"#;

pub async fn load_by_pair<'e>(
    db: impl SqliteExecutor<'e>,
    event_id: &str,
    participant_id: &str,
) -> sqlx::Result<Option<RegistrationRow>> {
    sqlx::query_as::<_, RegistrationRow>(SQL_LOAD_REGISTRATION_BY_PAIR)
        .bind(event_id)
        .bind(participant_id)
        .fetch_optional(db)
        .await
}

const SQL_LIST_REGISTRATIONS_FOR_EVENT: &str = r#"
SELECT
  registration_id,
  event_id,
  participant_id,
  status,
  answers_json,
  registered_at,
  attendance_status,
  attendance_validated_by,
  attendance_validated_at
FROM registrations
WHERE event_id = ?
ORDER BY datetime(registered_at) ASC
"#;

pub async fn list_for_event(
    pool: &SqlitePool,
    event_id: &str,
) -> sqlx::Result<Vec<RegistrationRow>> {
    sqlx::query_as::<_, RegistrationRow>(SQL_LIST_REGISTRATIONS_FOR_EVENT)
        .bind(event_id)
        .fetch_all(pool)
        .await
}

const SQL_COUNT_ACTIVE: &str = r#"
SELECT COUNT(*)
FROM registrations
WHERE event_id = ?
  AND status = 'active'
"#;

pub async fn count_active<'e>(db: impl SqliteExecutor<'e>, event_id: &str) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_ACTIVE)
        .bind(event_id)
        .fetch_one(db)
        .await
}

const SQL_INSERT_REGISTRATION: &str = r#"
INSERT INTO registrations (
  registration_id,
  event_id,
  participant_id,
  status,
  answers_json,
  registered_at
) VALUES (?, ?, ?, 'active', ?, ?)
"#;

pub struct NewRegistration<'a> {
    pub registration_id: &'a str,
    pub event_id: &'a str,
    pub participant_id: &'a str,
    pub answers_json: Option<&'a str>,
    pub registered_at: &'a str,
}

pub async fn insert<'e>(
    db: impl SqliteExecutor<'e>,
    registration: NewRegistration<'_>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_REGISTRATION)
        .bind(registration.registration_id)
        .bind(registration.event_id)
        .bind(registration.participant_id)
        .bind(registration.answers_json)
        .bind(registration.registered_at)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

// Reactivation touches only the registration fields; attendance is owned by
// the validation stage and is never written from here.
const SQL_REACTIVATE_REGISTRATION: &str = r#"
UPDATE registrations
SET status = 'active',
    answers_json = ?,
    registered_at = ?
WHERE registration_id = ?
"#;

pub async fn reactivate<'e>(
    db: impl SqliteExecutor<'e>,
    registration_id: &str,
    answers_json: Option<&str>,
    registered_at: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_REACTIVATE_REGISTRATION)
        .bind(answers_json)
        .bind(registered_at)
        .bind(registration_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

const SQL_UPDATE_STATUS: &str = r#"
UPDATE registrations
SET status = ?
WHERE registration_id = ?
"#;

pub async fn update_status<'e>(
    db: impl SqliteExecutor<'e>,
    registration_id: &str,
    status: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_STATUS)
        .bind(status)
        .bind(registration_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

// The three attendance fields are always written together; pass NULLs to
// clear them back to unvalidated.
const SQL_UPDATE_ATTENDANCE: &str = r#"
UPDATE registrations
SET attendance_status = ?,
    attendance_validated_by = ?,
    attendance_validated_at = ?
WHERE registration_id = ?
"#;

pub async fn update_attendance<'e>(
    db: impl SqliteExecutor<'e>,
    registration_id: &str,
    attendance_status: Option<&str>,
    validated_by: Option<&str>,
    validated_at: Option<&str>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_ATTENDANCE)
        .bind(attendance_status)
        .bind(validated_by)
        .bind(validated_at)
        .bind(registration_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

/// Resolves a batch of registration ids in one query, scoped to the event's
/// active rows. Ids that are unknown, cancelled, or belong to another event
/// simply do not come back.
pub async fn list_active_by_ids_for_event(
    pool: &SqlitePool,
    event_id: &str,
    registration_ids: &[String],
) -> sqlx::Result<Vec<RegistrationRow>> {
    if registration_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; registration_ids.len()].join(", ");
    let sql = format!(
        r#"
SELECT
  registration_id,
  event_id,
  participant_id,
  status,
  answers_json,
  registered_at,
  attendance_status,
  attendance_validated_by,
  attendance_validated_at
FROM registrations
WHERE event_id = ?
  AND status = 'active'
  AND registration_id IN ({placeholders})
"#
    );

    let mut query = sqlx::query_as::<_, RegistrationRow>(&sql).bind(event_id);
    for registration_id in registration_ids {
        query = query.bind(registration_id);
    }
    query.fetch_all(pool).await
}

#[derive(Debug, sqlx::FromRow)]
pub struct AttendanceBucketRow {
    pub attendance_status: Option<String>,
    pub bucket_count: i64,
}

// NULL forms its own group, so "not yet validated" arrives as a bucket like
// any other; buckets with no rows are simply absent from the result.
const SQL_COUNT_ATTENDANCE_BUCKETS: &str = r#"
SELECT
  attendance_status,
  COUNT(*) AS bucket_count
FROM registrations
WHERE event_id = ?
  AND status = 'active'
GROUP BY attendance_status
"#;

pub async fn count_attendance_buckets(
    pool: &SqlitePool,
    event_id: &str,
) -> sqlx::Result<Vec<AttendanceBucketRow>> {
    sqlx::query_as::<_, AttendanceBucketRow>(SQL_COUNT_ATTENDANCE_BUCKETS)
        .bind(event_id)
        .fetch_all(pool)
        .await
}

const SQL_COUNT_PRESENT: &str = r#"
SELECT COUNT(*)
FROM registrations
WHERE event_id = ?
  AND status = 'active'
  AND attendance_status = 'present'
"#;

pub async fn count_present(pool: &SqlitePool, event_id: &str) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_PRESENT)
        .bind(event_id)
        .fetch_one(pool)
        .await
}
