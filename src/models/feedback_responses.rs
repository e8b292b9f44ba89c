#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FeedbackResponseRow {
    pub response_id: String,
    pub event_id: String,
    pub participant_id: String,
    pub payload_json: String,
    pub submitted_at: String,
    pub updated_at: Option<String>,
}

/// The first condition blocking feedback submission, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityBlock {
    NoFeedbackForm,
    NotAttended,
    DeadlinePassed,
}

impl EligibilityBlock {
    pub fn as_str(self) -> &'static str {
        match self {
            EligibilityBlock::NoFeedbackForm => "no_feedback_form",
            EligibilityBlock::NotAttended => "not_attended",
            EligibilityBlock::DeadlinePassed => "deadline_passed",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            EligibilityBlock::NoFeedbackForm => "this event does not collect feedback",
            EligibilityBlock::NotAttended => "feedback requires validated attendance",
            EligibilityBlock::DeadlinePassed => "the feedback deadline has passed",
        }
    }
}
