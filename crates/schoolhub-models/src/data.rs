//! The `schoolHubData` document and the default dataset.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schoolhub_core::RecordId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::announcements::Announcement;
use crate::audit::AuditEntry;
use crate::events::Event;
use crate::exams::Exam;
use crate::homework::{Homework, HomeworkStatus};
use crate::library::Book;
use crate::messages::Message;
use crate::students::{Fees, Student};
use crate::teachers::Teacher;
use crate::transport::TransportRoute;
use crate::users::User;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchoolData {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub announcements: Vec<Announcement>,
    #[serde(default)]
    pub homework: Vec<Homework>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub library: Vec<Book>,
    #[serde(default)]
    pub transport: Vec<TransportRoute>,
    #[serde(default)]
    pub exams: Vec<Exam>,
}

impl SchoolData {
    /// Dataset used when nothing has been saved yet.
    pub fn default_dataset() -> Self {
        let mut data = Self {
            students: vec![
                seed_student(1, "John Doe", "10A", 85, [78, 82, 80], 3000.0),
                seed_student(2, "Jane Smith", "10B", 92, [88, 90, 85], 5000.0),
            ],
            teachers: vec![
                seed_teacher(1, "Mr. Wilson", "Math", &["10A", "10B"], "wilson@school.com"),
                seed_teacher(2, "Ms. Johnson", "English", &["10A"], "johnson@school.com"),
            ],
            classes: vec!["10A".into(), "10B".into(), "11A".into()],
            announcements: vec![Announcement {
                id: 1,
                title: "School Holiday".into(),
                content: "School closed Monday".into(),
                date: "2024-01-15".into(),
                priority: "info".into(),
            }],
            homework: vec![Homework {
                id: 1,
                class_name: "10A".into(),
                subject: "Math".into(),
                title: None,
                task: "Chapter 5 exercises".into(),
                due_date: "2024-01-20".into(),
                status: HomeworkStatus::Pending,
                total_marks: None,
                created_by: None,
                created_date: None,
            }],
            messages: vec![Message {
                id: 1,
                from: "Teacher".into(),
                to: "Parent".into(),
                subject: "Progress Update".into(),
                content: "Good progress".into(),
                date: "2024-01-10".into(),
                time: String::new(),
                read: false,
            }],
            events: vec![
                seed_event(1, "Parent Meeting", "2024-01-18", "10:00", "meeting"),
                seed_event(2, "Sports Day", "2024-02-15", "09:00", "event"),
            ],
            library: vec![Book {
                id: 1,
                title: "Mathematics Grade 10".into(),
                author: "John Smith".into(),
                isbn: "123456789".into(),
                category: String::new(),
                year: None,
                copies: 1,
                available: true,
                borrowed_by: None,
            }],
            transport: vec![TransportRoute {
                id: 1,
                route: "Route A".into(),
                driver: "Mike Driver".into(),
                students: vec!["John Doe".into()],
                capacity: 30,
            }],
            exams: vec![Exam {
                id: 1,
                subject: "Math".into(),
                class_name: "10A".into(),
                date: "2024-02-01".into(),
                duration: "2 hours".into(),
                total_marks: 100,
            }],
        };
        data.recompute_gpas();
        data
    }

    /// GPA is derived; stored values are never trusted on load.
    pub fn recompute_gpas(&mut self) {
        for student in &mut self.students {
            student.recompute_gpa();
        }
    }

    /// Highest id across every collection, 0 when empty.
    pub fn max_record_id(&self) -> RecordId {
        let ids = self
            .students
            .iter()
            .map(|r| r.id)
            .chain(self.teachers.iter().map(|r| r.id))
            .chain(self.announcements.iter().map(|r| r.id))
            .chain(self.homework.iter().map(|r| r.id))
            .chain(self.messages.iter().map(|r| r.id))
            .chain(self.events.iter().map(|r| r.id))
            .chain(self.library.iter().map(|r| r.id))
            .chain(self.transport.iter().map(|r| r.id))
            .chain(self.exams.iter().map(|r| r.id));
        ids.max().unwrap_or(0)
    }

    pub fn student(&self, id: RecordId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn student_mut(&mut self, id: RecordId) -> Option<&mut Student> {
        self.students.iter_mut().find(|s| s.id == id)
    }

    pub fn students_in_class<'a>(&'a self, class_name: &'a str) -> impl Iterator<Item = &'a Student> {
        self.students.iter().filter(move |s| s.class_name == class_name)
    }
}

fn seed_student(
    id: RecordId,
    name: &str,
    class_name: &str,
    attendance: u32,
    [math, english, science]: [u32; 3],
    paid: f64,
) -> Student {
    Student {
        id,
        name: name.into(),
        class_name: class_name.into(),
        attendance,
        marks: [("math", math), ("english", english), ("science", science)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        fees: Fees {
            total: 5000.0,
            paid,
        },
        gpa: 0.0,
        parent: None,
        email: None,
        phone: None,
        dob: None,
        address: None,
    }
}

fn seed_teacher(id: RecordId, name: &str, subject: &str, classes: &[&str], email: &str) -> Teacher {
    Teacher {
        id,
        name: name.into(),
        subject: subject.into(),
        classes: classes.iter().map(|c| c.to_string()).collect(),
        email: email.into(),
        phone: None,
        qualification: None,
        experience: None,
    }
}

fn seed_event(id: RecordId, title: &str, date: &str, time: &str, event_type: &str) -> Event {
    Event {
        id,
        title: title.into(),
        date: date.into(),
        time: time.into(),
        location: String::new(),
        event_type: event_type.into(),
        description: String::new(),
    }
}

/// Collections that can be exported as JSON or printed as a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Students,
    Teachers,
    Classes,
    Fees,
    Announcements,
    Homework,
    Messages,
    Events,
    Library,
    Transport,
    Exams,
}

impl Collection {
    pub const ALL: [Collection; 11] = [
        Collection::Students,
        Collection::Teachers,
        Collection::Classes,
        Collection::Fees,
        Collection::Announcements,
        Collection::Homework,
        Collection::Messages,
        Collection::Events,
        Collection::Library,
        Collection::Transport,
        Collection::Exams,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Students => "students",
            Collection::Teachers => "teachers",
            Collection::Classes => "classes",
            Collection::Fees => "fees",
            Collection::Announcements => "announcements",
            Collection::Homework => "homework",
            Collection::Messages => "messages",
            Collection::Events => "events",
            Collection::Library => "library",
            Collection::Transport => "transport",
            Collection::Exams => "exams",
        }
    }

    /// Attachment name used for downloads, e.g. `students_export.json`.
    pub fn export_file_name(&self) -> String {
        format!("{}_export.json", self.as_str())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown collection: {}", s))
    }
}

/// Full backup written by "Backup" and accepted by "Restore".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BackupBundle {
    pub timestamp: DateTime<Utc>,
    pub data: SchoolData,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub audit: Vec<AuditEntry>,
}

impl BackupBundle {
    pub fn file_name(&self) -> String {
        format!("schoolhub_backup_{}.json", self.timestamp.format("%Y-%m-%d"))
    }
}
