use sqlx::SqlitePool;

use crate::models::FeedbackResponseRow;

const SQL_LOAD_RESPONSE_BY_PAIR: &str = r#"
SELECT
  response_id,
  event_id,
  participant_id,
  payload_json,
  submitted_at,
  updated_at
FROM feedback_responses
WHERE event_id = ?
  AND participant_id = ?
LIMIT 1
"#;

pub async fn load_by_pair(
    pool: &SqlitePool,
    event_id: &str,
    participant_id: &str,
) -> sqlx::Result<Option<FeedbackResponseRow>> {
    sqlx::query_as::<_, FeedbackResponseRow>(SQL_LOAD_RESPONSE_BY_PAIR)
        .bind(event_id)
        .bind(participant_id)
        .fetch_optional(pool)
        .await
}

const SQL_INSERT_RESPONSE: &str = r#"
INSERT INTO feedback_responses (
  response_id,
  event_id,
  participant_id,
  payload_json,
  submitted_at
) VALUES (?, ?, ?, ?, ?)
"#;

pub struct NewFeedbackResponse<'a> {
    pub response_id: &'a str,
    pub event_id: &'a str,
    pub participant_id: &'a str,
    pub payload_json: &'a str,
    pub submitted_at: &'a str,
}

pub async fn insert(pool: &SqlitePool, response: NewFeedbackResponse<'_>) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_RESPONSE)
        .bind(response.response_id)
        .bind(response.event_id)
        .bind(response.participant_id)
        .bind(response.payload_json)
        .bind(response.submitted_at)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_UPDATE_RESPONSE_PAYLOAD: &str = r#"
UPDATE feedback_responses
SET payload_json = ?,
    updated_at = ?
WHERE response_id = ?
"#;

pub async fn update_payload(
    pool: &SqlitePool,
    response_id: &str,
    payload_json: &str,
    updated_at: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_RESPONSE_PAYLOAD)
        .bind(payload_json)
        .bind(updated_at)
        .bind(response_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_COUNT_RESPONSES_FOR_EVENT: &str = r#"
SELECT COUNT(*)
FROM feedback_responses
WHERE event_id = ?
"#;

pub async fn count_for_event(pool: &SqlitePool, event_id: &str) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_RESPONSES_FOR_EVENT)
        .bind(event_id)
        .fetch_one(pool)
        .await
}
