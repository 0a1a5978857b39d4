//! Section dispatch for the dashboards.
//!
//! Each role has a table mapping a section id to a renderer. Renderers are
//! plain functions over a read-only snapshot of the store, so a page never
//! holds the store lock while it is being formatted.

use schoolhub_auth::Session;
use schoolhub_models::Role;
use schoolhub_models::messages::Message;
use schoolhub_models::students::{Fees, Student};
use schoolhub_store::SchoolState;
use serde::Deserialize;

use super::{admin, parent, shared, teacher};
use crate::utils::html::escape;

/// Query string accepted by `/app/{section}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionQuery {
    /// Search text for list sections.
    pub q: Option<String>,
    /// Counterpart whose conversation is open in the messages section.
    pub with: Option<String>,
}

pub struct PageContext<'a> {
    pub state: &'a SchoolState,
    pub session: &'a Session,
    pub query: &'a SectionQuery,
    /// Open conversation, loaded (and marked read) before rendering.
    pub conversation: Option<&'a [Message]>,
}

impl PageContext<'_> {
    pub fn search(&self) -> &str {
        self.query.q.as_deref().map(str::trim).unwrap_or("")
    }

    pub fn role(&self) -> Role {
        self.session.role
    }
}

pub type Renderer = fn(&PageContext<'_>) -> String;

const ADMIN_SECTIONS: &[(&str, Renderer)] = &[
    ("dashboard", admin::dashboard),
    ("students", admin::students),
    ("teachers", admin::teachers),
    ("classes", admin::classes),
    ("fees", admin::fees),
    ("announcements", admin::announcements),
    ("reports", admin::reports),
    ("messages", shared::messages),
    ("calendar", shared::calendar),
    ("library", shared::library),
    ("transport", shared::transport),
    ("exams", shared::exams),
    ("certificates", admin::certificates),
    ("account", shared::account),
];

const TEACHER_SECTIONS: &[(&str, Renderer)] = &[
    ("dashboard", teacher::dashboard),
    ("classes", teacher::classes),
    ("attendance", teacher::attendance),
    ("marks", teacher::marks),
    ("homework", teacher::homework),
    ("timetable", teacher::timetable),
    ("messages", shared::messages),
    ("calendar", shared::calendar),
    ("exams", shared::exams),
    ("account", shared::account),
];

const PARENT_SECTIONS: &[(&str, Renderer)] = &[
    ("dashboard", parent::dashboard),
    ("profile", parent::profile),
    ("attendance", parent::attendance),
    ("progress", parent::progress),
    ("homework", parent::homework),
    ("fees", parent::fees),
    ("messages", shared::messages),
    ("calendar", shared::calendar),
    ("library", shared::library),
    ("transport", shared::transport),
    ("account", shared::account),
];

pub fn sections(role: Role) -> &'static [(&'static str, Renderer)] {
    match role {
        Role::Admin => ADMIN_SECTIONS,
        Role::Teacher => TEACHER_SECTIONS,
        Role::Parent => PARENT_SECTIONS,
    }
}

pub fn renderer(role: Role, section: &str) -> Option<Renderer> {
    sections(role)
        .iter()
        .find(|(id, _)| *id == section)
        .map(|(_, render)| *render)
}

pub fn coming_soon(section: &str) -> String {
    format!(
        "<div class=\"card\"><h3>🚧 {} - Coming Soon</h3></div>",
        escape(&section.to_uppercase())
    )
}

/// Content for `section`, or the placeholder card when the role has no
/// such section.
pub fn render_section(ctx: &PageContext<'_>, section: &str) -> String {
    match renderer(ctx.role(), section) {
        Some(render) => render(ctx),
        None => coming_soon(section),
    }
}

/// The student linked to a parent account by name.
pub fn linked_child<'a>(state: &'a SchoolState, parent_name: &str) -> Option<&'a Student> {
    state
        .data
        .students
        .iter()
        .find(|s| s.parent.as_deref() == Some(parent_name))
}

/// Stand-in shown to parents who have no linked student yet.
pub fn placeholder_child(parent_name: &str) -> Student {
    let surname = ["Mr. ", "Mrs. ", "Ms. ", "Dr. "]
        .iter()
        .find_map(|title| parent_name.strip_prefix(title))
        .unwrap_or(parent_name);
    let mut child = Student {
        id: 0,
        name: format!("{} Jr.", surname.trim()),
        class_name: "10A".to_string(),
        attendance: 92,
        marks: [("math", 85), ("english", 88), ("science", 82)]
            .into_iter()
            .map(|(subject, mark)| (subject.to_string(), mark))
            .collect(),
        fees: Fees {
            total: 5000.0,
            paid: 3000.0,
        },
        gpa: 0.0,
        parent: Some(parent_name.to_string()),
        email: None,
        phone: None,
        dob: None,
        address: None,
    };
    child.recompute_gpa();
    child
}

/// The parent's child, falling back to the placeholder.
pub fn child_of(state: &SchoolState, parent_name: &str) -> Student {
    linked_child(state, parent_name)
        .cloned()
        .unwrap_or_else(|| placeholder_child(parent_name))
}
