use sqlx::SqlitePool;

use crate::models::UserRow;

const SQL_LOAD_USER_BY_ID: &str = r#"
SELECT
  user_id,
  email,
  name,
  is_event_staff
FROM users
WHERE user_id = ?
  AND is_deleted = 0
LIMIT 1
"#;

pub async fn load_user_by_id(pool: &SqlitePool, user_id: &str) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(SQL_LOAD_USER_BY_ID)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

const SQL_LOAD_USER_BY_EMAIL: &str = r#"
SELECT
  user_id,
  email,
  name,
  is_event_staff
FROM users
WHERE email = ?
  AND is_deleted = 0
LIMIT 1
"#;

pub async fn load_user_by_email(pool: &SqlitePool, email: &str) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(SQL_LOAD_USER_BY_EMAIL)
        .bind(email)
        .fetch_optional(pool)
        .await
}
