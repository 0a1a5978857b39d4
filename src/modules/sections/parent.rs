//! Parent sections, all centred on the linked child.

use std::fmt::Write;

use schoolhub_models::homework::HomeworkStatus;
use schoolhub_models::students::Student;

use super::service::{PageContext, child_of, linked_child};
use super::shared::{api_button, api_form, card, table};
use crate::utils::html::{escape, money};

const NO_LINK_NOTE: &str = "<p class=\"warning\">No student is linked to your account yet. \
     Sample data is shown until the school links your child.</p>";

fn child(ctx: &PageContext<'_>) -> (Student, bool) {
    let linked = linked_child(ctx.state, &ctx.session.name).is_some();
    (child_of(ctx.state, &ctx.session.name), linked)
}

fn note(linked: bool) -> &'static str {
    if linked { "" } else { NO_LINK_NOTE }
}

fn title_case(subject: &str) -> String {
    let mut chars = subject.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn dashboard(ctx: &PageContext<'_>) -> String {
    let (child, linked) = child(ctx);
    let mut html = format!(
        "{note}<div class=\"stats\">\
         <div class=\"stat\"><h4>Child</h4><h2>{name}</h2><p>Class {class}</p></div>\
         <div class=\"stat\"><h4>Attendance</h4><h2>{attendance}%</h2></div>\
         <div class=\"stat\"><h4>GPA</h4><h2>{gpa:.2}</h2></div>\
         <div class=\"stat\"><h4>Fees Pending</h4><h2>{pending}</h2></div></div>",
        note = note(linked),
        name = escape(&child.name),
        class = escape(&child.class_name),
        attendance = child.attendance,
        gpa = child.gpa,
        pending = money(child.fees.pending()),
    );

    let mut news = String::new();
    for announcement in ctx.state.data.announcements.iter().rev().take(3) {
        let _ = write!(
            news,
            "<div class=\"data-item\"><strong>{}</strong><p>{}</p></div>",
            escape(&announcement.title),
            escape(&announcement.content)
        );
    }
    html.push_str(&card("Announcements", &news));

    let events: Vec<Vec<String>> = ctx
        .state
        .data
        .events
        .iter()
        .take(5)
        .map(|e| vec![escape(&e.date), escape(&e.time), escape(&e.title)])
        .collect();
    html.push_str(&card("Upcoming Events", &table(&["Date", "Time", "Event"], &events)));
    html
}

pub fn profile(ctx: &PageContext<'_>) -> String {
    let (child, linked) = child(ctx);
    let field = |value: &Option<String>| escape(value.as_deref().unwrap_or("-"));
    let rows = vec![
        vec!["Name".to_string(), escape(&child.name)],
        vec!["Class".to_string(), escape(&child.class_name)],
        vec!["Date of Birth".to_string(), field(&child.dob)],
        vec!["E-mail".to_string(), field(&child.email)],
        vec!["Phone".to_string(), field(&child.phone)],
        vec!["Address".to_string(), field(&child.address)],
        vec!["Parent".to_string(), field(&child.parent)],
    ];
    format!("{}{}", note(linked), card("Student Details", &table(&["Field", "Value"], &rows)))
}

pub fn attendance(ctx: &PageContext<'_>) -> String {
    let (child, linked) = child(ctx);
    let records: Vec<Vec<String>> = ctx
        .state
        .attendance_history
        .iter()
        .rev()
        .filter_map(|register| {
            register
                .records
                .iter()
                .find(|entry| entry.student_id == child.id)
                .map(|entry| {
                    vec![
                        escape(&register.date),
                        format!("{:?}", entry.status),
                        escape(&register.taken_by),
                    ]
                })
        })
        .collect();
    format!(
        "{}<div class=\"stats\"><div class=\"stat\"><h4>Overall Attendance</h4><h2>{}%</h2></div></div>{}",
        note(linked),
        child.attendance,
        card("Daily Registers", &table(&["Date", "Status", "Taken By"], &records)),
    )
}

pub fn progress(ctx: &PageContext<'_>) -> String {
    let (child, linked) = child(ctx);
    let rows: Vec<Vec<String>> = child
        .marks
        .iter()
        .map(|(subject, mark)| {
            vec![
                escape(&title_case(subject)),
                mark.to_string(),
                format!("<progress max=\"100\" value=\"{}\"></progress>", mark),
            ]
        })
        .collect();
    let average = child
        .average_mark()
        .map(|avg| format!("{:.1}", avg))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}<div class=\"stats\"><div class=\"stat\"><h4>GPA</h4><h2>{:.2}</h2></div>\
         <div class=\"stat\"><h4>Average Mark</h4><h2>{}</h2></div></div>{}",
        note(linked),
        child.gpa,
        average,
        card("Subject Marks", &table(&["Subject", "Mark", ""], &rows)),
    )
}

pub fn homework(ctx: &PageContext<'_>) -> String {
    let (child, linked) = child(ctx);
    let rows: Vec<Vec<String>> = ctx
        .state
        .data
        .homework
        .iter()
        .filter(|hw| hw.class_name == child.class_name)
        .map(|hw| {
            let action = if linked && hw.status != HomeworkStatus::Completed {
                api_button(
                    "Mark Complete",
                    &format!("/api/homework/{}/complete", hw.id),
                    "POST",
                    "btn-success",
                )
            } else {
                String::new()
            };
            vec![
                escape(&hw.subject),
                escape(hw.title.as_deref().unwrap_or(&hw.task)),
                escape(&hw.due_date),
                format!("{:?}", hw.status),
                action,
            ]
        })
        .collect();
    format!(
        "{}{}",
        note(linked),
        card(
            &format!("Homework for {}", child.class_name),
            &table(&["Subject", "Task", "Due", "Status", ""], &rows),
        ),
    )
}

pub fn fees(ctx: &PageContext<'_>) -> String {
    let (child, linked) = child(ctx);
    let fees = child.fees;
    let mut html = format!(
        "{}<div class=\"stats\"><div class=\"stat\"><h4>Total</h4><h2>{}</h2></div>\
         <div class=\"stat\"><h4>Paid</h4><h2>{}</h2></div>\
         <div class=\"stat\"><h4>Pending</h4><h2>{}</h2></div></div>",
        note(linked),
        money(fees.total),
        money(fees.paid),
        money(fees.pending()),
    );
    if linked && !fees.is_settled() {
        let fields = format!(
            "<input name=\"amount\" type=\"number\" min=\"1\" step=\"0.01\" max=\"{}\" placeholder=\"Amount\" required>",
            fees.pending()
        );
        html.push_str(&card("Pay Fees", &api_form("/api/fees/pay", "POST", &fields, "Pay Now")));
    } else if fees.is_settled() {
        html.push_str(&card("Pay Fees", "<p>All fees are paid. Thank you!</p>"));
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::sections::service::SectionQuery;
    use chrono::Utc;
    use schoolhub_auth::Session;
    use schoolhub_models::Role;
    use schoolhub_store::SchoolState;

    fn parent_session(name: &str) -> Session {
        Session {
            token: "t".to_string(),
            user_id: 9,
            username: "parent".to_string(),
            role: Role::Parent,
            name: name.to_string(),
            login_time: Utc::now(),
            last_activity: Utc::now(),
        }
    }

    #[test]
    fn test_unlinked_parent_sees_placeholder() {
        let state = SchoolState::default();
        let session = parent_session("Mrs. Brown");
        let query = SectionQuery::default();
        let ctx = PageContext {
            state: &state,
            session: &session,
            query: &query,
            conversation: None,
        };
        let html = dashboard(&ctx);
        assert!(html.contains("Brown Jr."));
        assert!(html.contains("No student is linked"));
        assert!(!fees(&ctx).contains("/api/fees/pay"));
    }

    #[test]
    fn test_linked_parent_can_pay_and_complete_homework() {
        let mut state = SchoolState::default();
        state.data.students[0].parent = Some("Mrs. Doe".to_string());
        let session = parent_session("Mrs. Doe");
        let query = SectionQuery::default();
        let ctx = PageContext {
            state: &state,
            session: &session,
            query: &query,
            conversation: None,
        };
        assert!(fees(&ctx).contains("/api/fees/pay"));
        let html = homework(&ctx);
        assert!(html.contains("Chapter 5 exercises"));
        assert!(html.contains("/api/homework/1/complete"));
        assert!(progress(&ctx).contains("Math"));
    }
}
