//! Teacher sections.

use std::fmt::Write;

use schoolhub_models::attendance::AttendanceStatus;
use schoolhub_models::data::Collection;
use schoolhub_models::homework::HomeworkStatus;
use schoolhub_models::timetable::WEEKDAYS;

use super::service::PageContext;
use super::shared::{
    api_form, card, class_select, data_tools, delete_button, input, required, table, textarea,
};
use crate::modules::classes::service::teacher_classes;
use crate::utils::html::{escape, options};

const CLASS_EDIT_SCRIPT: &str = r#"<script>
async function saveClass(className) {
  const students = [...document.querySelectorAll('tr[data-student]')]
    .filter(tr => tr.dataset.class === className)
    .map(tr => {
      const marks = {};
      tr.querySelectorAll('input[data-subject]').forEach(el => marks[el.dataset.subject] = Number(el.value));
      return {id: Number(tr.dataset.student), name: tr.querySelector('input[name=name]').value,
        attendance: Number(tr.querySelector('input[name=attendance]').value), marks};
    });
  try { await callApi('/api/students/class/' + encodeURIComponent(className), 'PUT', {students}); location.reload(); }
  catch (err) { alert(err.message); }
}
</script>"#;

const ATTENDANCE_SCRIPT: &str = r#"<script>
async function saveAttendance(className) {
  const records = [...document.querySelectorAll('select[data-student]')]
    .filter(el => el.value !== 'not_marked')
    .map(el => ({student_id: Number(el.dataset.student), status: el.value}));
  const date = document.getElementById('attendance-date').value || undefined;
  try { await callApi('/api/attendance', 'POST', {class: className, date, records}); location.reload(); }
  catch (err) { alert(err.message); }
}
</script>"#;

const TIMETABLE_SCRIPT: &str = r#"<script>
async function saveTimetable() {
  const rows = [...document.querySelectorAll('tr[data-slot]')].map(tr => {
    const row = {time: tr.dataset.slot};
    tr.querySelectorAll('input[data-day]').forEach(el => row[el.dataset.day] = el.value);
    return row;
  });
  try { await callApi('/api/timetable', 'PUT', rows); alert('Timetable saved'); location.reload(); }
  catch (err) { alert(err.message); }
}
</script>"#;

fn my_classes(ctx: &PageContext<'_>) -> Vec<String> {
    let email = ctx
        .state
        .user(&ctx.session.username, ctx.session.role)
        .map(|u| u.email.as_str())
        .unwrap_or_default();
    teacher_classes(ctx.state, &ctx.session.name, email)
}

/// Class picked through `?q=`, defaulting to the teacher's first class.
fn selected_class(ctx: &PageContext<'_>, classes: &[String]) -> Option<String> {
    let wanted = ctx.search();
    classes
        .iter()
        .find(|c| c.as_str() == wanted)
        .or_else(|| classes.first())
        .cloned()
}

fn class_picker(section: &str, classes: &[String], selected: &str) -> String {
    format!(
        "<form method=\"get\" action=\"/app/{section}\"><select name=\"q\" onchange=\"this.form.submit()\">{}</select></form>",
        options(classes.iter().map(String::as_str), Some(selected))
    )
}

pub fn dashboard(ctx: &PageContext<'_>) -> String {
    let classes = my_classes(ctx);
    let data = &ctx.state.data;
    let student_count: usize = classes.iter().map(|c| data.students_in_class(c).count()).sum();
    let pending = data
        .homework
        .iter()
        .filter(|hw| classes.contains(&hw.class_name) && hw.status != HomeworkStatus::Completed)
        .count();

    let mut html = format!(
        "<div class=\"stats\"><div class=\"stat\"><h4>My Classes</h4><h2>{}</h2></div>\
         <div class=\"stat\"><h4>My Students</h4><h2>{}</h2></div>\
         <div class=\"stat\"><h4>Open Homework</h4><h2>{}</h2></div></div>",
        classes.len(),
        student_count,
        pending
    );

    let exams: Vec<Vec<String>> = data
        .exams
        .iter()
        .filter(|e| classes.contains(&e.class_name))
        .map(|e| vec![escape(&e.subject), escape(&e.class_name), escape(&e.date)])
        .collect();
    html.push_str(&card("Upcoming Exams", &table(&["Subject", "Class", "Date"], &exams)));

    let registers: Vec<Vec<String>> = ctx
        .state
        .attendance_history
        .iter()
        .rev()
        .filter(|r| r.taken_by == ctx.session.name)
        .take(5)
        .map(|r| {
            vec![
                escape(&r.date),
                escape(&r.class_name),
                r.count(AttendanceStatus::Present).to_string(),
                r.count(AttendanceStatus::Absent).to_string(),
            ]
        })
        .collect();
    html.push_str(&card(
        "Recent Registers",
        &table(&["Date", "Class", "Present", "Absent"], &registers),
    ));
    html
}

pub fn classes(ctx: &PageContext<'_>) -> String {
    let mut html = String::new();
    for class_name in my_classes(ctx) {
        let mut rows = String::new();
        for student in ctx.state.data.students_in_class(&class_name) {
            let mut marks = String::new();
            for (subject, mark) in &student.marks {
                let _ = write!(
                    marks,
                    "<label>{s}<input type=\"number\" min=\"0\" max=\"100\" data-subject=\"{s}\" value=\"{mark}\"></label>",
                    s = escape(subject),
                );
            }
            let _ = write!(
                rows,
                "<tr data-student=\"{id}\" data-class=\"{class}\">\
                 <td><input name=\"name\" value=\"{name}\"></td>\
                 <td><input name=\"attendance\" type=\"number\" min=\"0\" max=\"100\" value=\"{attendance}\"></td>\
                 <td>{marks}</td><td>{gpa:.2}</td></tr>",
                id = student.id,
                class = escape(&class_name),
                name = escape(&student.name),
                attendance = student.attendance,
                gpa = student.gpa,
            );
        }
        if rows.is_empty() {
            rows.push_str("<tr><td colspan=\"4\">No students in this class</td></tr>");
        }
        let _ = write!(
            html,
            "<div class=\"card\"><h3>Class {class}</h3>\
             <table><thead><tr><th>Name</th><th>Attendance %</th><th>Marks</th><th>GPA</th></tr></thead>\
             <tbody>{rows}</tbody></table>\
             <button class=\"btn btn-success\" onclick=\"saveClass('{class}')\">Save Changes</button></div>",
            class = escape(&class_name),
        );
    }
    if html.is_empty() {
        html.push_str("<p>No classes assigned.</p>");
    }
    html.push_str(&data_tools(Collection::Students));
    html.push_str(CLASS_EDIT_SCRIPT);
    html
}

pub fn attendance(ctx: &PageContext<'_>) -> String {
    let classes = my_classes(ctx);
    let Some(class_name) = selected_class(ctx, &classes) else {
        return card("Attendance", "<p>No classes assigned.</p>");
    };

    let mut register = String::new();
    for student in ctx.state.data.students_in_class(&class_name) {
        let _ = write!(
            register,
            "<tr><td>{name}</td><td><select data-student=\"{id}\">\
             <option value=\"not_marked\">-</option><option value=\"present\">Present</option>\
             <option value=\"absent\">Absent</option><option value=\"late\">Late</option>\
             </select></td></tr>",
            name = escape(&student.name),
            id = student.id,
        );
    }
    let take = format!(
        "{picker}<input id=\"attendance-date\" type=\"date\">\
         <table><thead><tr><th>Student</th><th>Status</th></tr></thead><tbody>{register}</tbody></table>\
         <button class=\"btn btn-success\" onclick=\"saveAttendance('{class}')\">Save Attendance</button>{ATTENDANCE_SCRIPT}",
        picker = class_picker("attendance", &classes, &class_name),
        class = escape(&class_name),
    );

    let history: Vec<Vec<String>> = ctx
        .state
        .attendance_history
        .iter()
        .rev()
        .filter(|r| r.class_name == class_name)
        .map(|r| {
            vec![
                escape(&r.date),
                r.count(AttendanceStatus::Present).to_string(),
                r.count(AttendanceStatus::Absent).to_string(),
                r.count(AttendanceStatus::Late).to_string(),
                escape(&r.taken_by),
            ]
        })
        .collect();

    format!(
        "{}{}",
        card(&format!("Take Attendance - {}", class_name), &take),
        card(
            "Attendance History",
            &table(&["Date", "Present", "Absent", "Late", "Taken By"], &history),
        ),
    )
}

pub fn marks(ctx: &PageContext<'_>) -> String {
    let mut html = String::new();
    for class_name in my_classes(ctx) {
        let mut forms = String::new();
        for student in ctx.state.data.students_in_class(&class_name) {
            let mut fields = String::new();
            for (subject, mark) in &student.marks {
                let _ = write!(
                    fields,
                    "<label>{s}<input name=\"marks.{s}\" type=\"number\" min=\"0\" max=\"100\" value=\"{mark}\"></label>",
                    s = escape(subject),
                );
            }
            let _ = write!(
                forms,
                "<div class=\"data-item\"><h4>{} <small>GPA {:.2}</small></h4>{}</div>",
                escape(&student.name),
                student.gpa,
                api_form(
                    &format!("/api/students/{}/marks", student.id),
                    "PUT",
                    &fields,
                    "Update Marks"
                ),
            );
        }
        html.push_str(&card(
            &format!("Class {}", class_name),
            &format!("<div class=\"data-grid\">{}</div>", forms),
        ));
    }
    html
}

pub fn homework(ctx: &PageContext<'_>) -> String {
    let quick = format!(
        "{}{}{}{}",
        class_select(ctx),
        required("subject", "Subject", "text"),
        textarea("task", "Task"),
        input("due_date", "Due date", "date", ""),
    );
    let assignment = format!(
        "{}{}{}{}{}{}",
        class_select(ctx),
        required("subject", "Subject", "text"),
        required("title", "Title", "text"),
        textarea("description", "Description"),
        required("due_date", "Due date", "date"),
        input("total_marks", "Total marks", "number", "100"),
    );

    let rows: Vec<Vec<String>> = ctx
        .state
        .data
        .homework
        .iter()
        .map(|hw| {
            vec![
                escape(&hw.class_name),
                escape(&hw.subject),
                escape(hw.title.as_deref().unwrap_or(&hw.task)),
                escape(&hw.due_date),
                format!("{:?}", hw.status),
                delete_button(&format!("/api/homework/{}", hw.id), "homework"),
            ]
        })
        .collect();

    format!(
        "{}{}{}",
        card("Assign Homework", &api_form("/api/homework", "POST", &quick, "Assign")),
        card(
            "Create Assignment",
            &api_form("/api/homework/assignments", "POST", &assignment, "Create"),
        ),
        card(
            "All Homework",
            &format!(
                "{}{}",
                data_tools(Collection::Homework),
                table(&["Class", "Subject", "Task", "Due", "Status", "Actions"], &rows)
            ),
        ),
    )
}

pub fn timetable(ctx: &PageContext<'_>) -> String {
    let mut header = String::from("<tr><th>Time</th>");
    for day in WEEKDAYS {
        let _ = write!(header, "<th>{}{}</th>", day[..1].to_uppercase(), &day[1..]);
    }
    header.push_str("</tr>");

    let mut body = String::new();
    for row in &ctx.state.timetable.rows {
        let _ = write!(body, "<tr data-slot=\"{t}\"><td>{t}</td>", t = escape(&row.time));
        for (day, cell) in WEEKDAYS.iter().zip(row.cells()) {
            let _ = write!(
                body,
                "<td><input data-day=\"{day}\" value=\"{}\"></td>",
                escape(cell)
            );
        }
        body.push_str("</tr>");
    }

    card(
        "Weekly Timetable",
        &format!(
            "<table><thead>{header}</thead><tbody>{body}</tbody></table>\
             <button class=\"btn btn-success\" onclick=\"saveTimetable()\">Save Timetable</button>\
             <a class=\"btn btn-secondary\" href=\"/api/timetable/export\">Export</a>\
             <a class=\"btn btn-secondary\" href=\"/app/timetable/print\" target=\"_blank\">Print</a>{TIMETABLE_SCRIPT}"
        ),
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

    fn wilson() -> Session {
        Session {
            token: "t".to_string(),
            user_id: 3,
            username: "wilson".to_string(),
            role: Role::Teacher,
            name: "Mr. Wilson".to_string(),
            login_time: Utc::now(),
            last_activity: Utc::now(),
        }
    }

    #[test]
    fn test_classes_follow_teacher_record() {
        let state = SchoolState::default();
        let session = wilson();
        let query = SectionQuery::default();
        let ctx = PageContext {
            state: &state,
            session: &session,
            query: &query,
            conversation: None,
        };
        assert_eq!(my_classes(&ctx), vec!["10A", "10B"]);
        let html = classes(&ctx);
        assert!(html.contains("John Doe"));
        assert!(html.contains("Jane Smith"));
        assert!(!html.contains("Class 11A"));
    }

    #[test]
    fn test_attendance_register_for_selected_class() {
        let state = SchoolState::default();
        let session = wilson();
        let query = SectionQuery {
            q: Some("10B".to_string()),
            with: None,
        };
        let ctx = PageContext {
            state: &state,
            session: &session,
            query: &query,
            conversation: None,
        };
        let html = attendance(&ctx);
        assert!(html.contains("Take Attendance - 10B"));
        assert!(html.contains("Jane Smith"));
        assert!(!html.contains("John Doe"));
    }

    #[test]
    fn test_timetable_grid_has_every_slot() {
        let state = SchoolState::default();
        let session = wilson();
        let query = SectionQuery::default();
        let ctx = PageContext {
            state: &state,
            session: &session,
            query: &query,
            conversation: None,
        };
        let html = timetable(&ctx);
        assert_eq!(html.matches("data-slot=").count(), 7);
        assert!(html.contains("<th>Monday</th>"));
    }
}
