use sqlx::SqlitePool;

use crate::database::user_repo;
use crate::error::{PipelineError, PipelineResult};
use crate::models::UserRow;

/// The single staff-capability gate shared by attendance validation, reset,
/// and feedback summaries. Evaluated before any row is read or written.
pub async fn ensure_event_staff(pool: &SqlitePool, caller_id: &str) -> PipelineResult<UserRow> {
    let Some(user) = user_repo::load_user_by_id(pool, caller_id).await? else {
        return Err(PipelineError::Unauthorized(format!(
            "unknown identity: {caller_id}"
        )));
    };

    if !user.has_staff_capability() {
        return Err(PipelineError::Unauthorized(
            "event staff capability required".to_string(),
        ));
    }

    Ok(user)
}
