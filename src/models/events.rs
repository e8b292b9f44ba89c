#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    pub event_id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_by: String,
    pub starts_at: String,
    pub ends_at: String,
    pub max_participants: Option<i64>,
    pub feedback_form_json: Option<String>,
    pub feedback_deadline: Option<String>,
    pub created_at: String,
}

impl EventRow {
    /// An event collects feedback only when a form definition is configured.
    pub fn has_feedback_form(&self) -> bool {
        self.feedback_form_json
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .is_some()
    }
}
