//! Administrator sections.

use std::fmt::Write;

use schoolhub_models::data::Collection;
use schoolhub_models::reports::{AdminStats, Report, ReportKind};

use super::service::PageContext;
use super::shared::{
    api_button, api_form, card, class_select, data_tools, delete_button, input, required,
    search_form, select, table, textarea,
};
use crate::modules::fees::model::FeeRow;
use crate::utils::html::{escape, money, options};

const RESTORE_SCRIPT: &str = r#"<script>
async function restoreBackup() {
  const file = document.getElementById('restore-file').files[0];
  if (!file) { alert('Choose a backup file first'); return; }
  if (!confirm('Replace all data with this backup?')) return;
  let bundle;
  try { bundle = JSON.parse(await file.text()); } catch (err) { alert('Invalid backup file!'); return; }
  try { await callApi('/api/data/restore', 'POST', bundle); location.reload(); } catch (err) { alert(err.message); }
}
</script>"#;

const BULK_DELETE_SCRIPT: &str = r#"<script>
async function deleteSelected() {
  const ids = [...document.querySelectorAll('input[name=select-student]:checked')].map(el => Number(el.value));
  if (ids.length === 0) { alert('Select at least one student'); return; }
  if (!confirm('Delete ' + ids.length + ' student(s)?')) return;
  try { await callApi('/api/students/bulk-delete', 'POST', {ids}); location.reload(); } catch (err) { alert(err.message); }
}
</script>"#;

fn stats(ctx: &PageContext<'_>) -> AdminStats {
    let data = &ctx.state.data;
    AdminStats::compute(&data.students, data.teachers.len(), data.classes.len())
}

fn stat_cards(stats: &AdminStats) -> String {
    let cards = [
        ("Total Students", stats.total_students.to_string()),
        ("Total Teachers", stats.total_teachers.to_string()),
        ("Classes", stats.total_classes.to_string()),
        ("Avg Attendance", format!("{}%", stats.average_attendance)),
        ("Fees Collected", money(stats.fees_collected)),
        ("Fees Pending", money(stats.fees_pending)),
    ];
    let mut html = String::from("<div class=\"stats\">");
    for (label, value) in cards {
        let _ = write!(html, "<div class=\"stat\"><h4>{label}</h4><h2>{value}</h2></div>");
    }
    html.push_str("</div>");
    html
}

pub fn dashboard(ctx: &PageContext<'_>) -> String {
    let mut html = stat_cards(&stats(ctx));

    let mut news = String::new();
    for announcement in ctx.state.data.announcements.iter().rev().take(3) {
        let _ = write!(
            news,
            "<div class=\"data-item\"><strong>{}</strong> <small>{}</small><p>{}</p></div>",
            escape(&announcement.title),
            escape(&announcement.date),
            escape(&announcement.content)
        );
    }
    if news.is_empty() {
        news.push_str("<p>No announcements.</p>");
    }
    html.push_str(&card("Recent Announcements", &news));

    let activity: Vec<Vec<String>> = ctx
        .state
        .audit_log
        .iter()
        .rev()
        .take(5)
        .map(|entry| {
            vec![
                entry.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                escape(&entry.user),
                escape(&entry.action),
                escape(&entry.details),
            ]
        })
        .collect();
    html.push_str(&card(
        "Recent Activity",
        &table(&["When", "User", "Action", "Details"], &activity),
    ));

    let tools = format!(
        "<a class=\"btn\" href=\"/api/data/backup\">Download Backup</a>\
         <input type=\"file\" id=\"restore-file\" accept=\".json,application/json\">\
         <button class=\"btn\" onclick=\"restoreBackup()\">Restore Backup</button>\
         {undo}{redo}\
         <button class=\"btn btn-danger\" data-api=\"/api/data/reset\" \
         data-confirm=\"Reset all data to the defaults?\">Reset Data</button>{RESTORE_SCRIPT}",
        undo = api_button("Undo", "/api/data/undo", "POST", "btn-secondary"),
        redo = api_button("Redo", "/api/data/redo", "POST", "btn-secondary"),
    );
    html.push_str(&card("Data Management", &tools));
    html
}

pub fn students(ctx: &PageContext<'_>) -> String {
    let query = ctx.search();
    let mut html = search_form("students", query, "Search by name or class");

    let fields = format!(
        "{}{}{}{}{}{}{}{}",
        required("name", "Student name", "text"),
        class_select(ctx),
        input("email", "E-mail", "email", ""),
        input("phone", "Phone", "tel", ""),
        input("dob", "Date of birth", "date", ""),
        input("address", "Address", "text", ""),
        input("parent", "Parent name", "text", ""),
        input("fees_total", "Total fees", "number", ""),
    );
    html.push_str(&card("Add Student", &api_form("/api/students", "POST", &fields, "Add Student")));

    let rows: Vec<Vec<String>> = ctx
        .state
        .data
        .students
        .iter()
        .filter(|s| s.matches(query))
        .map(|student| {
            vec![
                format!("<input type=\"checkbox\" name=\"select-student\" value=\"{}\">", student.id),
                escape(&student.name),
                escape(&student.class_name),
                format!("{}%", student.attendance),
                format!("{:.2}", student.gpa),
                format!("{} / {}", money(student.fees.paid), money(student.fees.total)),
                escape(student.parent.as_deref().unwrap_or("-")),
                delete_button(&format!("/api/students/{}", student.id), "student"),
            ]
        })
        .collect();
    html.push_str(&card(
        "All Students",
        &format!(
            "{}<button class=\"btn btn-danger\" onclick=\"deleteSelected()\">Delete Selected</button>{}{}",
            data_tools(Collection::Students),
            table(
                &["", "Name", "Class", "Attendance", "GPA", "Fees", "Parent", "Actions"],
                &rows
            ),
            BULK_DELETE_SCRIPT,
        ),
    ));
    html
}

pub fn teachers(ctx: &PageContext<'_>) -> String {
    let fields = format!(
        "{}{}{}{}{}{}",
        required("name", "Teacher name", "text"),
        required("subject", "Subject", "text"),
        input("email", "E-mail (optional)", "email", ""),
        input("phone", "Phone", "tel", ""),
        input("qualification", "Qualification", "text", ""),
        input("experience", "Experience", "text", ""),
    );
    let rows: Vec<Vec<String>> = ctx
        .state
        .data
        .teachers
        .iter()
        .map(|teacher| {
            vec![
                escape(&teacher.name),
                escape(&teacher.subject),
                escape(&teacher.classes.join(", ")),
                escape(&teacher.email),
                delete_button(&format!("/api/teachers/{}", teacher.id), "teacher"),
            ]
        })
        .collect();
    format!(
        "{}{}",
        card("Add Teacher", &api_form("/api/teachers", "POST", &fields, "Add Teacher")),
        card(
            "All Teachers",
            &format!(
                "{}{}",
                data_tools(Collection::Teachers),
                table(&["Name", "Subject", "Classes", "E-mail", "Actions"], &rows)
            ),
        ),
    )
}

pub fn classes(ctx: &PageContext<'_>) -> String {
    let data = &ctx.state.data;
    let rows: Vec<Vec<String>> = data
        .classes
        .iter()
        .map(|class_name| {
            vec![
                escape(class_name),
                data.students_in_class(class_name).count().to_string(),
                delete_button(&format!("/api/classes/{}", class_name), "class"),
            ]
        })
        .collect();
    format!(
        "{}{}",
        card(
            "Add Class",
            &api_form("/api/classes", "POST", &required("name", "Class name, e.g. 12B", "text"), "Add Class"),
        ),
        card(
            "All Classes",
            &format!(
                "{}{}",
                data_tools(Collection::Classes),
                table(&["Class", "Students", "Actions"], &rows)
            ),
        ),
    )
}

pub fn fees(ctx: &PageContext<'_>) -> String {
    let rows: Vec<FeeRow> = ctx.state.data.students.iter().map(FeeRow::from).collect();
    let collected: f64 = rows.iter().map(|r| r.paid).sum();
    let pending: f64 = rows.iter().map(|r| r.pending).sum();

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let action = if row.settled {
                "Paid".to_string()
            } else {
                format!(
                    "<form data-api=\"/api/fees/{}/payments\" data-method=\"POST\">\
                     <input name=\"amount\" type=\"number\" min=\"1\" step=\"0.01\" placeholder=\"Amount\" required>\
                     <button class=\"btn btn-success\" type=\"submit\">Record Payment</button></form>",
                    row.student_id
                )
            };
            vec![
                escape(&row.name),
                escape(&row.class_name),
                money(row.total),
                money(row.paid),
                money(row.pending),
                action,
            ]
        })
        .collect();

    format!(
        "<div class=\"stats\"><div class=\"stat\"><h4>Collected</h4><h2>{}</h2></div>\
         <div class=\"stat\"><h4>Pending</h4><h2>{}</h2></div></div>{}",
        money(collected),
        money(pending),
        card(
            "Fee Status",
            &format!(
                "{}{}",
                data_tools(Collection::Fees),
                table(&["Student", "Class", "Total", "Paid", "Pending", "Actions"], &cells)
            ),
        ),
    )
}

pub fn announcements(ctx: &PageContext<'_>) -> String {
    let fields = format!(
        "{}{}{}",
        required("title", "Title", "text"),
        textarea("content", "Announcement"),
        select("priority", &options(["info", "warning", "urgent"], Some("info"))),
    );
    let mut list = String::new();
    for announcement in ctx.state.data.announcements.iter().rev() {
        let _ = write!(
            list,
            "<div class=\"data-item\"><h4>{title}</h4><small>{date} | {priority}</small>\
             <p>{content}</p>{delete}</div>",
            title = escape(&announcement.title),
            date = escape(&announcement.date),
            priority = escape(&announcement.priority),
            content = escape(&announcement.content),
            delete = delete_button(&format!("/api/announcements/{}", announcement.id), "announcement"),
        );
    }
    format!(
        "{}{}",
        card(
            "New Announcement",
            &api_form("/api/announcements", "POST", &fields, "Publish"),
        ),
        card(
            "All Announcements",
            &format!("{}{}", data_tools(Collection::Announcements), list),
        ),
    )
}

fn report_card(kind: ReportKind, ctx: &PageContext<'_>) -> String {
    let report = Report::build(kind, &ctx.state.data.students);
    let title = match kind {
        ReportKind::Attendance => "Attendance Report",
        ReportKind::Grades => "Grades Report",
    };
    let summary = match &report.summary {
        Some(s) => format!(
            "<p>Average: {} | Highest: {} | Lowest: {} | Students: {}</p>",
            s.average, s.highest, s.lowest, s.count
        ),
        None => "<p>No students to report on.</p>".to_string(),
    };
    card(
        title,
        &format!(
            "{}<pre>{}</pre><a class=\"btn btn-secondary\" href=\"/api/reports/{}\">View JSON</a>",
            summary,
            escape(&report.chart),
            kind
        ),
    )
}

pub fn reports(ctx: &PageContext<'_>) -> String {
    format!(
        "{}{}{}",
        stat_cards(&stats(ctx)),
        report_card(ReportKind::Attendance, ctx),
        report_card(ReportKind::Grades, ctx),
    )
}

pub fn certificates(ctx: &PageContext<'_>) -> String {
    let rows: Vec<Vec<String>> = ctx
        .state
        .data
        .students
        .iter()
        .map(|student| {
            vec![
                escape(&student.name),
                escape(&student.class_name),
                format!("{:.2}", student.gpa),
                format!(
                    "<a class=\"btn\" href=\"/app/certificates/{}\" target=\"_blank\">Generate Certificate</a>",
                    student.id
                ),
            ]
        })
        .collect();
    card(
        "Student Certificates",
        &table(&["Student", "Class", "GPA", "Certificate"], &rows),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::sections::service::SectionQuery;
    use chrono::Utc;
    use schoolhub_auth::Session;
    use schoolhub_models::Role;
    use schoolhub_store::SchoolState;

    fn admin_session() -> Session {
        Session {
            token: "t".to_string(),
            user_id: 1,
            username: "admin".to_string(),
            role: Role::Admin,
            name: "Head Teacher".to_string(),
            login_time: Utc::now(),
            last_activity: Utc::now(),
        }
    }

    #[test]
    fn test_dashboard_shows_default_stats() {
        let state = SchoolState::default();
        let session = admin_session();
        let query = SectionQuery::default();
        let ctx = PageContext {
            state: &state,
            session: &session,
            query: &query,
            conversation: None,
        };
        let html = dashboard(&ctx);
        assert!(html.contains("<h4>Total Students</h4><h2>2</h2>"));
        assert!(html.contains("<h4>Avg Attendance</h4><h2>89%</h2>"));
        assert!(html.contains("<h4>Fees Collected</h4><h2>$8000</h2>"));
        assert!(html.contains("School Holiday"));
    }

    #[test]
    fn test_student_search_filters_rows() {
        let state = SchoolState::default();
        let session = admin_session();
        let query = SectionQuery {
            q: Some("10b".to_string()),
            with: None,
        };
        let ctx = PageContext {
            state: &state,
            session: &session,
            query: &query,
            conversation: None,
        };
        let html = students(&ctx);
        assert!(html.contains("Jane Smith"));
        assert!(!html.contains("John Doe"));
    }

    #[test]
    fn test_reports_include_charts() {
        let state = SchoolState::default();
        let session = admin_session();
        let query = SectionQuery::default();
        let ctx = PageContext {
            state: &state,
            session: &session,
            query: &query,
            conversation: None,
        };
        let html = reports(&ctx);
        assert!(html.contains("Attendance Report"));
        assert!(html.contains("Highest: 92"));
        assert!(html.contains("█"));
    }
}
