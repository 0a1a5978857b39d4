pub mod announcements;
pub mod attendance;
pub mod audit;
pub mod classes;
pub mod compat;
pub mod data;
pub mod events;
pub mod exams;
pub mod homework;
pub mod library;
pub mod messages;
pub mod reports;
pub mod students;
pub mod teachers;
pub mod timetable;
pub mod transport;
pub mod users;

pub use data::{BackupBundle, Collection, SchoolData};
pub use users::{Role, User};
