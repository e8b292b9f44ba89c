pub mod event_repo;
pub mod feedback_repo;
pub mod registration_repo;
pub mod user_repo;

use sqlx::SqlitePool;

const SCHEMA_SQL: &str = include_str!("../../schema.sql");

/// Applies the schema idempotently; every statement is CREATE IF NOT EXISTS.
pub async fn ensure_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    Ok(())
}
