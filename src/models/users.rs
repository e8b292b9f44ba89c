#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub is_event_staff: i64,
}

impl UserRow {
    /// Event-staff capability: required for attendance validation, attendance
    /// reset, and feedback summaries. Distinct from event ownership.
    pub fn has_staff_capability(&self) -> bool {
        self.is_event_staff == 1
    }
}
