use sqlx::SqlitePool;

use crate::models::EventRow;

const SQL_LOAD_EVENT_BY_ID: &str = r#"
SELECT
  event_id,
  title,
  description,
  created_by,
  starts_at,
  ends_at,
  max_participants,
  feedback_form_json,
  feedback_deadline,
  created_at
FROM events
WHERE event_id = ?
  AND is_deleted = 0
LIMIT 1
"#;

pub async fn load_event_by_id(pool: &SqlitePool, event_id: &str) -> sqlx::Result<Option<EventRow>> {
    sqlx::query_as::<_, EventRow>(SQL_LOAD_EVENT_BY_ID)
        .bind(event_id)
        .fetch_optional(pool)
        .await
}
