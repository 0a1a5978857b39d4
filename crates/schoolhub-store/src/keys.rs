//! Storage keys. Names match the keys used by existing saved data.

pub const SCHOOL_DATA: &str = "schoolHubData";
pub const REGISTERED_USERS: &str = "registeredUsers";
pub const CURRENT_USER: &str = "currentUser";
pub const CHAT_GROUPS: &str = "chatGroups";
pub const AUDIT_LOG: &str = "auditLog";
pub const DARK_MODE: &str = "darkMode";
pub const STUDY_MATERIALS: &str = "studyMaterials";
pub const DOCUMENTS: &str = "documents";
pub const SYLLABI: &str = "syllabi";
pub const ATTENDANCE_HISTORY: &str = "attendanceHistory";
pub const TEACHER_TIMETABLE: &str = "teacherTimetable";

pub const SHARED: &str = "schoolHubShared";
pub const SHARED_USERS_PREFIX: &str = "SHARED_USERS_";

pub fn shared_users_key(millis: i64) -> String {
    format!("{}{}", SHARED_USERS_PREFIX, millis)
}
