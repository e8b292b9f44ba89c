pub mod access_control;
pub mod attendance_service;
pub mod clock;
pub mod feedback_service;
pub mod registration_service;
