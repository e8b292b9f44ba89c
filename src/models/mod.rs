pub mod events;
pub mod feedback_responses;
pub mod registrations;
pub mod users;

pub use events::EventRow;
pub use feedback_responses::{EligibilityBlock, FeedbackResponseRow};
pub use registrations::{AttendanceStatus, RegistrationRow, RegistrationStatus};
pub use users::UserRow;
