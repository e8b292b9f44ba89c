#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStatus {
    Active,
    Cancelled,
}

impl RegistrationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RegistrationStatus::Active => "active",
            RegistrationStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(input: &str) -> Option<RegistrationStatus> {
        match input {
            "active" => Some(RegistrationStatus::Active),
            "cancelled" => Some(RegistrationStatus::Cancelled),
            _ => None,
        }
    }
}

/// Attendance as recorded by event staff. `Unvalidated` is the NULL column:
/// a first-class state, not an implicit null check at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Unvalidated,
    Present,
    Absent,
    Excused,
}

impl AttendanceStatus {
    pub fn from_column(value: Option<&str>) -> AttendanceStatus {
        match value {
            Some("present") => AttendanceStatus::Present,
            Some("absent") => AttendanceStatus::Absent,
            Some("excused") => AttendanceStatus::Excused,
            _ => AttendanceStatus::Unvalidated,
        }
    }

    pub fn as_column(self) -> Option<&'static str> {
        match self {
            AttendanceStatus::Unvalidated => None,
            AttendanceStatus::Present => Some("present"),
            AttendanceStatus::Absent => Some("absent"),
            AttendanceStatus::Excused => Some("excused"),
        }
    }

    /// Parses only the three validated states; clearing goes through reset.
    pub fn parse_validated(input: &str) -> Option<AttendanceStatus> {
        match input {
            "present" => Some(AttendanceStatus::Present),
            "absent" => Some(AttendanceStatus::Absent),
            "excused" => Some(AttendanceStatus::Excused),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RegistrationRow {
    pub registration_id: String,
    pub event_id: String,
    pub participant_id: String,
    pub status: String,
    pub answers_json: Option<String>,
    pub registered_at: String,
    pub attendance_status: Option<String>,
    pub attendance_validated_by: Option<String>,
    pub attendance_validated_at: Option<String>,
}

impl RegistrationRow {
    pub fn registration_status(&self) -> Option<RegistrationStatus> {
        RegistrationStatus::parse(&self.status)
    }

    pub fn is_active(&self) -> bool {
        self.registration_status() == Some(RegistrationStatus::Active)
    }

    pub fn attendance(&self) -> AttendanceStatus {
        AttendanceStatus::from_column(self.attendance_status.as_deref())
    }
}
