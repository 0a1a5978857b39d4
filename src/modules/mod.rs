pub mod account;
pub mod announcements;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod data;
pub mod events;
pub mod exams;
pub mod fees;
pub mod homework;
pub mod library;
pub mod messages;
pub mod reports;
pub mod sections;
pub mod students;
pub mod teachers;
pub mod timetable;
pub mod transport;
