#![allow(dead_code)]

use chrono::Duration;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use gather::database;
use gather::services::clock;

// A single connection keeps every query on the same in-memory database.
pub async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    database::ensure_schema(&pool).await.expect("schema");
    pool
}

pub fn hours_from_now(hours: i64) -> String {
    clock::format_timestamp(clock::now() + Duration::hours(hours))
}

pub async fn seed_user(pool: &SqlitePool, user_id: &str, is_event_staff: bool) {
    sqlx::query(
        r#"
INSERT INTO users (user_id, email, name, is_event_staff)
VALUES (?, ?, ?, ?)
"#,
    )
    .bind(user_id)
    .bind(format!("{user_id}@example.org"))
    .bind(user_id)
    .bind(if is_event_staff { 1 } else { 0 })
    .execute(pool)
    .await
    .expect("seed user");
}

pub struct EventSpec {
    pub max_participants: Option<i64>,
    pub feedback_form: bool,
    pub starts_in_hours: i64,
    pub ends_in_hours: i64,
    pub feedback_deadline_in_hours: Option<i64>,
}

impl Default for EventSpec {
    fn default() -> EventSpec {
        EventSpec {
            max_participants: None,
            feedback_form: false,
            starts_in_hours: -1,
            ends_in_hours: 1,
            feedback_deadline_in_hours: None,
        }
    }
}

pub async fn seed_event(pool: &SqlitePool, spec: EventSpec) -> String {
    let event_id = Uuid::new_v4().to_string();
    let form_json = spec
        .feedback_form
        .then(|| r#"{"fields":[{"name":"rating","kind":"scale"}]}"#.to_string());

    sqlx::query(
        r#"
INSERT INTO events (
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
) VALUES (?, ?, NULL, ?, ?, ?, ?, ?, ?, ?)
"#,
    )
    .bind(&event_id)
    .bind("Community meetup")
    .bind("organizer-1")
    .bind(hours_from_now(spec.starts_in_hours))
    .bind(hours_from_now(spec.ends_in_hours))
    .bind(spec.max_participants)
    .bind(form_json)
    .bind(spec.feedback_deadline_in_hours.map(hours_from_now))
    .bind(clock::now_timestamp())
    .execute(pool)
    .await
    .expect("seed event");

    event_id
}
