//! Stand-alone pages: sign-in, registration and the printable views.

use std::fmt::Write;

use schoolhub_models::Collection;
use schoolhub_models::students::Student;
use schoolhub_models::timetable::{Timetable, WEEKDAYS};
use serde_json::Value;

use crate::utils::html::{document, escape, options};

const PRINT_SCRIPT: &str = "<script>window.addEventListener('load', () => window.print());</script>";

const ROLE_OPTIONS: &str = "<option value=\"admin\">Admin</option>\
     <option value=\"teacher\" selected>Teacher</option><option value=\"parent\">Parent</option>";

pub fn login_page(dark_mode: bool) -> String {
    let body = format!(
        "<div class=\"auth\"><h1>Southern Cross</h1><h3>School Management System</h3>\
         <form data-api=\"/api/auth/login\" data-method=\"POST\">\
         <select name=\"role\">{ROLE_OPTIONS}</select>\
         <input name=\"username\" placeholder=\"Username\" required autocomplete=\"username\">\
         <input name=\"password\" type=\"password\" placeholder=\"Password\" required autocomplete=\"current-password\">\
         <button class=\"btn\" type=\"submit\">Login</button></form>\
         <p>No account yet? <a href=\"/register\">Register</a></p></div>"
    );
    document("Login", dark_mode, &body)
}

pub fn register_page(dark_mode: bool, classes: &[String]) -> String {
    let body = format!(
        "<div class=\"auth\"><h1>Create Account</h1>\
         <form data-api=\"/api/auth/register\" data-method=\"POST\" data-redirect=\"/login\" \
         data-success=\"Registration successful! Please login.\">\
         <select name=\"role\" id=\"register-role\" onchange=\"toggleRoleFields()\">{ROLE_OPTIONS}</select>\
         <input name=\"name\" placeholder=\"Full name\" required>\
         <input name=\"email\" type=\"email\" placeholder=\"E-mail\" required>\
         <input name=\"username\" placeholder=\"Username\" required>\
         <input name=\"password\" type=\"password\" placeholder=\"Password (8+ chars, upper, lower, digit)\" required>\
         <input name=\"confirm_password\" type=\"password\" placeholder=\"Confirm password\" required>\
         <input name=\"phone\" type=\"tel\" placeholder=\"Phone\">\
         <input name=\"address\" placeholder=\"Address\">\
         <div id=\"admin-fields\" style=\"display:none\">\
         <input name=\"admin_code\" type=\"password\" placeholder=\"Admin registration code\"></div>\
         <div id=\"parent-fields\" style=\"display:none\">\
         <input name=\"child_name\" placeholder=\"Child's full name\">\
         <select name=\"child_class\"><option value=\"\">Child's class</option>{classes}</select></div>\
         <button class=\"btn\" type=\"submit\">Register</button></form>\
         <p>Already registered? <a href=\"/login\">Login</a></p></div>\
         <script>function toggleRoleFields() {{\
           const role = document.getElementById('register-role').value;\
           document.getElementById('admin-fields').style.display = role === 'admin' ? 'block' : 'none';\
           document.getElementById('parent-fields').style.display = role === 'parent' ? 'block' : 'none';\
         }}</script>",
        classes = options(classes.iter().map(String::as_str), None),
    );
    document("Register", dark_mode, &body)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => escape(s),
        Value::Array(items) => items.iter().map(cell_text).collect::<Vec<_>>().join(", "),
        Value::Object(_) => escape(&value.to_string()),
        other => other.to_string(),
    }
}

fn header_text(key: &str) -> String {
    let mut out = String::new();
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else if c == '_' {
            out.push(' ');
        } else if c.is_uppercase() {
            out.push(' ');
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out
}

/// Printable table of a collection; objects become one row each.
pub fn print_page(collection: Collection, value: &Value, dark_mode: bool) -> String {
    let items = value.as_array().map(Vec::as_slice).unwrap_or_default();
    let mut table = String::from("<table><thead><tr>");
    let keys: Vec<&String> = match items.first() {
        Some(Value::Object(first)) => first.keys().collect(),
        _ => Vec::new(),
    };
    if keys.is_empty() {
        table.push_str("<th>Name</th>");
    }
    for key in &keys {
        let _ = write!(table, "<th>{}</th>", escape(&header_text(key)));
    }
    table.push_str("</tr></thead><tbody>");
    for item in items {
        table.push_str("<tr>");
        match item {
            Value::Object(map) => {
                for key in &keys {
                    let _ = write!(table, "<td>{}</td>", cell_text(map.get(*key).unwrap_or(&Value::Null)));
                }
            }
            scalar => {
                let _ = write!(table, "<td>{}</td>", cell_text(scalar));
            }
        }
        table.push_str("</tr>");
    }
    table.push_str("</tbody></table>");

    let title = header_text(collection.as_str());
    let body = format!(
        "<div class=\"main\"><h1>Southern Cross - {title}</h1>\
         <p>{count} record(s)</p>{table}</div>{PRINT_SCRIPT}",
        title = escape(&title),
        count = items.len(),
    );
    document(&title, dark_mode, &body)
}

pub fn certificate_page(student: &Student, issued_on: &str) -> String {
    let body = format!(
        "<div class=\"auth\" style=\"max-width:720px;text-align:center;border:8px double #667eea\">\
         <h1>Certificate of Achievement</h1><p>This is to certify that</p>\
         <h2>{name}</h2><p>of class <strong>{class}</strong></p>\
         <p>has successfully completed the academic year with a GPA of <strong>{gpa:.2}</strong> \
         and an attendance of <strong>{attendance}%</strong>.</p>\
         <p>Issued on {date}</p><p><em>Southern Cross School</em></p>\
         <p>_____________________<br>Principal</p></div>{PRINT_SCRIPT}",
        name = escape(&student.name),
        class = escape(&student.class_name),
        gpa = student.gpa,
        attendance = student.attendance,
        date = escape(issued_on),
    );
    document(&format!("Certificate - {}", student.name), false, &body)
}

pub fn timetable_print_page(timetable: &Timetable, teacher: &str) -> String {
    let mut rows = String::new();
    for row in &timetable.rows {
        let _ = write!(rows, "<tr><td><strong>{}</strong></td>", escape(&row.time));
        for cell in row.cells() {
            let _ = write!(rows, "<td>{}</td>", escape(cell));
        }
        rows.push_str("</tr>");
    }
    let mut header = String::from("<th>Time</th>");
    for day in WEEKDAYS {
        let _ = write!(header, "<th>{}</th>", escape(&header_text(day)));
    }
    let body = format!(
        "<div class=\"main\"><h1>Weekly Timetable</h1><p>{}</p>\
         <table><thead><tr>{header}</tr></thead><tbody>{rows}</tbody></table></div>{PRINT_SCRIPT}",
        escape(teacher),
    );
    document("Timetable", false, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolhub_models::SchoolData;
    use serde_json::json;

    #[test]
    fn test_header_text() {
        assert_eq!(header_text("registeredDate"), "Registered Date");
        assert_eq!(header_text("total_marks"), "Total marks");
        assert_eq!(header_text("students"), "Students");
    }

    #[test]
    fn test_print_page_lists_objects() {
        let data = SchoolData::default_dataset();
        let value = serde_json::to_value(&data.teachers).unwrap();
        let html = print_page(Collection::Teachers, &value, false);
        assert!(html.contains("<th>Name</th>"));
        assert!(html.contains("<td>Mr. Wilson</td>"));
        assert!(html.contains("<td>10A, 10B</td>"));
        assert!(html.contains("window.print()"));
    }

    #[test]
    fn test_print_page_handles_plain_lists() {
        let html = print_page(Collection::Classes, &json!(["10A", "<b>"]), false);
        assert!(html.contains("<td>10A</td>"));
        assert!(html.contains("<td>&lt;b&gt;</td>"));
        assert!(html.contains("2 record(s)"));
    }

    #[test]
    fn test_certificate_escapes_name() {
        let mut student = SchoolData::default_dataset().students.remove(0);
        student.name = "<Jo>".to_string();
        let html = certificate_page(&student, "2026-06-30");
        assert!(html.contains("&lt;Jo&gt;"));
        assert!(html.contains("GPA of <strong>3.20</strong>"));
    }

    #[test]
    fn test_register_page_offers_classes() {
        let html = register_page(false, &["10A".to_string()]);
        assert!(html.contains("<option value=\"10A\">10A</option>"));
        assert!(html.contains("data-redirect=\"/login\""));
    }
}
