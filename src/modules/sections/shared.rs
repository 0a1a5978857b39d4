//! Markup helpers and the sections every role shares.

use std::fmt::Write;

use schoolhub_models::Role;
use schoolhub_models::data::Collection;
use schoolhub_models::library::LibraryItemKind;

use super::service::{PageContext, child_of};
use crate::modules::account::service::RECENT_ACTIVITY_LIMIT;
use crate::modules::library::service::catalog_for;
use crate::modules::messages::service::{contact_list, conversation_list};
use crate::utils::html::{escape, options};

pub fn card(title: &str, body: &str) -> String {
    format!("<div class=\"card\"><h3>{}</h3>{}</div>", escape(title), body)
}

/// Table from already-escaped cells.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::from("<table><thead><tr>");
    for header in headers {
        let _ = write!(out, "<th>{}</th>", escape(header));
    }
    out.push_str("</tr></thead><tbody>");
    if rows.is_empty() {
        let _ = write!(
            out,
            "<tr><td colspan=\"{}\">No records found</td></tr>",
            headers.len()
        );
    }
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            let _ = write!(out, "<td>{}</td>", cell);
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

pub fn api_button(label: &str, api: &str, method: &str, class: &str) -> String {
    format!(
        "<button class=\"btn {class}\" data-api=\"{api}\" data-method=\"{method}\">{label}</button>",
        api = escape(api),
        label = escape(label),
    )
}

pub fn delete_button(api: &str, what: &str) -> String {
    format!(
        "<button class=\"btn btn-danger\" data-api=\"{api}\" data-method=\"DELETE\" \
         data-confirm=\"Delete this {what}?\">Delete</button>",
        api = escape(api),
        what = escape(what),
    )
}

pub fn api_form(api: &str, method: &str, fields: &str, submit: &str) -> String {
    format!(
        "<form data-api=\"{api}\" data-method=\"{method}\">{fields}\
         <button class=\"btn\" type=\"submit\">{submit}</button></form>",
        api = escape(api),
        submit = escape(submit),
    )
}

pub fn input(name: &str, placeholder: &str, kind: &str, value: &str) -> String {
    format!(
        "<input name=\"{name}\" type=\"{kind}\" placeholder=\"{placeholder}\" value=\"{value}\">",
        placeholder = escape(placeholder),
        value = escape(value),
    )
}

pub fn required(name: &str, placeholder: &str, kind: &str) -> String {
    format!(
        "<input name=\"{name}\" type=\"{kind}\" placeholder=\"{placeholder}\" required>",
        placeholder = escape(placeholder),
    )
}

pub fn select(name: &str, options_html: &str) -> String {
    format!("<select name=\"{name}\">{options_html}</select>")
}

pub fn textarea(name: &str, placeholder: &str) -> String {
    format!(
        "<textarea name=\"{name}\" placeholder=\"{}\" required></textarea>",
        escape(placeholder)
    )
}

/// Print and export links for a collection.
pub fn data_tools(collection: Collection) -> String {
    format!(
        "<a class=\"btn btn-secondary\" href=\"/app/print/{c}\" target=\"_blank\">Print</a> \
         <a class=\"btn btn-secondary\" href=\"/api/data/export/{c}\">Export JSON</a>",
        c = collection.as_str()
    )
}

pub fn search_form(section: &str, query: &str, placeholder: &str) -> String {
    format!(
        "<form method=\"get\" action=\"/app/{section}\">{}</form>",
        input("q", placeholder, "search", query)
    )
}

pub fn is_staff(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Teacher)
}

pub fn class_select(ctx: &PageContext<'_>) -> String {
    select(
        "class",
        &options(ctx.state.data.classes.iter().map(String::as_str), None),
    )
}

pub fn messages(ctx: &PageContext<'_>) -> String {
    let me = ctx.session.username.as_str();
    let mut html = String::new();

    let mut recipients = String::new();
    for contact in contact_list(ctx.state, me) {
        let _ = write!(
            recipients,
            "<option value=\"{}\"{}>{} ({})</option>",
            escape(&contact.username),
            if ctx.query.with.as_deref() == Some(contact.username.as_str()) {
                " selected"
            } else {
                ""
            },
            escape(&contact.name),
            contact.role.label(),
        );
    }
    let compose = api_form(
        "/api/messages",
        "POST",
        &format!(
            "{}{}{}",
            select("to", &recipients),
            input("subject", "Subject", "text", ""),
            textarea("content", "Type your message"),
        ),
        "Send",
    );
    html.push_str(&card("New Message", &compose));

    let mut threads = String::new();
    for summary in conversation_list(ctx.state, me) {
        let last = &summary.last_message;
        let badge = if summary.unread > 0 {
            format!(" <strong>({} new)</strong>", summary.unread)
        } else {
            String::new()
        };
        let _ = write!(
            threads,
            "<div class=\"data-item\"><a href=\"/app/messages?with={contact}\">{contact}</a>{badge}\
             <p>{subject}: {content}</p><small>{date} {time}</small></div>",
            contact = escape(&summary.contact),
            subject = escape(&last.subject),
            content = escape(&last.content),
            date = escape(&last.date),
            time = escape(&last.time),
        );
    }
    if threads.is_empty() {
        threads.push_str("<p>No conversations yet.</p>");
    }
    html.push_str(&card("Conversations", &threads));

    if let (Some(with), Some(thread)) = (ctx.query.with.as_deref(), ctx.conversation) {
        let mut body = String::new();
        for message in thread {
            let _ = write!(
                body,
                "<div class=\"data-item\"><strong>{from}</strong> <small>{date} {time}</small>\
                 <p><em>{subject}</em></p><p>{content}</p></div>",
                from = escape(&message.from),
                date = escape(&message.date),
                time = escape(&message.time),
                subject = escape(&message.subject),
                content = escape(&message.content),
            );
        }
        match thread.iter().rev().find(|m| m.to == me) {
            Some(last_incoming) => body.push_str(&api_form(
                &format!("/api/messages/{}/reply", last_incoming.id),
                "POST",
                &textarea("content", "Reply"),
                "Reply",
            )),
            None => body.push_str(&api_form(
                "/api/messages",
                "POST",
                &format!(
                    "<input type=\"hidden\" name=\"to\" value=\"{}\">{}",
                    escape(with),
                    textarea("content", "Message")
                ),
                "Send",
            )),
        }
        html.push_str(&card(&format!("Conversation with {}", with), &body));
    }

    for group in ctx.state.chat_groups.values().filter(|g| g.allows(ctx.role())) {
        let mut body = String::new();
        let skip = group.messages.len().saturating_sub(10);
        for message in group.messages.iter().skip(skip) {
            let _ = write!(
                body,
                "<p><strong>{}</strong> <small>{} {}</small>: {}</p>",
                escape(&message.from_name),
                escape(&message.date),
                escape(&message.time),
                escape(&message.content),
            );
        }
        body.push_str(&api_form(
            &format!("/api/messages/groups/{}", group.id),
            "POST",
            &textarea("content", "Message the group"),
            "Post",
        ));
        html.push_str(&card(&format!("{} ({} members)", group.name, group.members.len()), &body));
    }
    html
}

pub fn calendar(ctx: &PageContext<'_>) -> String {
    let mut events: Vec<_> = ctx.state.data.events.iter().collect();
    events.sort_by(|a, b| (&a.date, &a.time).cmp(&(&b.date, &b.time)));

    let mut html = String::new();
    if is_staff(ctx.role()) {
        let fields = format!(
            "{}{}{}{}{}{}",
            required("title", "Event title", "text"),
            required("date", "Date", "date"),
            input("time", "Time", "time", ""),
            input("location", "Location", "text", ""),
            select("type", &options(["event", "meeting", "holiday", "exam"], None)),
            input("description", "Description", "text", ""),
        );
        html.push_str(&card("Add Event", &api_form("/api/events", "POST", &fields, "Add Event")));
    }

    let rows: Vec<Vec<String>> = events
        .iter()
        .map(|event| {
            let mut row = vec![
                escape(&event.date),
                escape(&event.time),
                escape(&event.title),
                escape(&event.event_type),
                escape(&event.location),
            ];
            if ctx.role() == Role::Admin {
                row.push(delete_button(&format!("/api/events/{}", event.id), "event"));
            }
            row
        })
        .collect();
    let mut headers = vec!["Date", "Time", "Event", "Type", "Location"];
    if ctx.role() == Role::Admin {
        headers.push("Actions");
    }
    html.push_str(&card(
        "Upcoming Events",
        &format!("{}{}", data_tools(Collection::Events), table(&headers, &rows)),
    ));
    html
}

pub fn library(ctx: &PageContext<'_>) -> String {
    let role = ctx.role();
    let user_name = ctx.session.name.as_str();
    let catalog = catalog_for(ctx.state, role, ctx.search());
    let mut html = search_form("library", ctx.search(), "Search books, materials, documents");

    if role == Role::Admin {
        let fields = format!(
            "{}{}{}{}{}{}",
            required("title", "Title", "text"),
            required("author", "Author", "text"),
            input("isbn", "ISBN", "text", ""),
            input("category", "Category", "text", ""),
            input("year", "Year", "number", ""),
            input("copies", "Copies", "number", "1"),
        );
        html.push_str(&card("Add Book", &api_form("/api/library/books", "POST", &fields, "Add Book")));
    }

    let delete_cell = |kind: LibraryItemKind, id| {
        if role == Role::Admin {
            delete_button(&format!("/api/library/{}/{}", kind, id), kind.noun())
        } else {
            String::new()
        }
    };
    let download = |kind: LibraryItemKind, id| {
        format!(
            "<a class=\"btn\" href=\"/api/library/{}/{}/download\">Download</a>",
            kind, id
        )
    };

    let books: Vec<Vec<String>> = catalog
        .books
        .iter()
        .map(|book| {
            let action = match (&book.borrowed_by, book.available) {
                (_, true) => api_button(
                    "Borrow",
                    &format!("/api/library/books/{}/borrow", book.id),
                    "POST",
                    "btn-success",
                ),
                (Some(borrower), false) if role != Role::Parent || borrower == user_name => {
                    api_button(
                        "Return",
                        &format!("/api/library/books/{}/return", book.id),
                        "POST",
                        "btn-secondary",
                    )
                }
                _ => String::new(),
            };
            vec![
                escape(&book.title),
                escape(&book.author),
                escape(&book.isbn),
                if book.available {
                    "Available".to_string()
                } else {
                    format!("Borrowed by {}", escape(book.borrowed_by.as_deref().unwrap_or("-")))
                },
                format!("{}{}", action, delete_cell(LibraryItemKind::Books, book.id)),
            ]
        })
        .collect();
    html.push_str(&card(
        "Books",
        &format!(
            "{}{}",
            data_tools(Collection::Library),
            table(&["Title", "Author", "ISBN", "Status", "Actions"], &books)
        ),
    ));

    if is_staff(role) {
        let material = format!(
            "{}{}{}{}{}",
            input("subject", "Subject", "text", ""),
            class_select(ctx),
            required("title", "Title", "text"),
            input("description", "Description", "text", ""),
            input("file_count", "Number of files", "number", "1"),
        );
        html.push_str(&card(
            "Upload Study Material",
            &api_form("/api/library/materials", "POST", &material, "Upload"),
        ));
        let syllabus = format!(
            "{}{}{}{}{}{}",
            input("subject", "Subject", "text", ""),
            input("year", "Academic year", "text", ""),
            class_select(ctx),
            input("term", "Term", "text", ""),
            required("title", "Title", "text"),
            required("file_name", "File name", "text"),
        );
        html.push_str(&card(
            "Upload Syllabus",
            &api_form("/api/library/syllabi", "POST", &syllabus, "Upload"),
        ));
    }
    if role == Role::Admin {
        let document = format!(
            "{}{}{}{}{}",
            input("type", "Document type", "text", ""),
            select("access", &options(["all", "teachers", "parents"], Some("all"))),
            required("title", "Title", "text"),
            input("description", "Description", "text", ""),
            required("file_name", "File name", "text"),
        );
        html.push_str(&card(
            "Upload Document",
            &api_form("/api/library/documents", "POST", &document, "Upload"),
        ));
    }

    let materials: Vec<Vec<String>> = catalog
        .materials
        .iter()
        .map(|m| {
            vec![
                escape(&m.title),
                escape(&m.subject),
                escape(&m.class_name),
                escape(&m.uploaded_by),
                format!(
                    "{}{}",
                    download(LibraryItemKind::Materials, m.id),
                    delete_cell(LibraryItemKind::Materials, m.id)
                ),
            ]
        })
        .collect();
    html.push_str(&card(
        "Study Materials",
        &table(&["Title", "Subject", "Class", "Uploaded By", "Actions"], &materials),
    ));

    let documents: Vec<Vec<String>> = catalog
        .documents
        .iter()
        .map(|d| {
            vec![
                escape(&d.title),
                escape(&d.doc_type),
                escape(&d.access),
                escape(&d.upload_date),
                format!(
                    "{}{}",
                    download(LibraryItemKind::Documents, d.id),
                    delete_cell(LibraryItemKind::Documents, d.id)
                ),
            ]
        })
        .collect();
    html.push_str(&card(
        "Documents",
        &table(&["Title", "Type", "Access", "Uploaded", "Actions"], &documents),
    ));

    let syllabi: Vec<Vec<String>> = catalog
        .syllabi
        .iter()
        .map(|s| {
            vec![
                escape(&s.title),
                escape(&s.subject),
                escape(&s.class_name),
                escape(&s.term),
                format!(
                    "{}{}",
                    download(LibraryItemKind::Syllabi, s.id),
                    delete_cell(LibraryItemKind::Syllabi, s.id)
                ),
            ]
        })
        .collect();
    html.push_str(&card(
        "Syllabi",
        &table(&["Title", "Subject", "Class", "Term", "Actions"], &syllabi),
    ));
    html
}

pub fn transport(ctx: &PageContext<'_>) -> String {
    let is_admin = ctx.role() == Role::Admin;
    let child = (ctx.role() == Role::Parent).then(|| child_of(ctx.state, &ctx.session.name));
    let mut html = String::new();

    if is_admin {
        let fields = format!(
            "{}{}{}",
            required("route", "Route name", "text"),
            required("driver", "Driver", "text"),
            input("capacity", "Capacity", "number", "30"),
        );
        html.push_str(&card("Add Route", &api_form("/api/transport", "POST", &fields, "Add Route")));
    }

    let mut student_options = String::new();
    for student in &ctx.state.data.students {
        let _ = write!(
            student_options,
            "<option value=\"{}\">{} ({})</option>",
            student.id,
            escape(&student.name),
            escape(&student.class_name)
        );
    }

    let mut routes = String::new();
    for route in &ctx.state.data.transport {
        let riding = child
            .as_ref()
            .is_some_and(|c| route.students.iter().any(|s| *s == c.name));
        let _ = write!(
            routes,
            "<div class=\"data-item\"><h4>{name}{mark}</h4><p>Driver: {driver}</p>\
             <p>Students: {count}/{capacity}</p>",
            name = escape(&route.route),
            mark = if riding { " (your child's route)" } else { "" },
            driver = escape(&route.driver),
            count = route.students.len(),
            capacity = route.capacity,
        );
        if is_staff(ctx.role()) && !route.students.is_empty() {
            let names: Vec<String> = route.students.iter().map(|s| escape(s)).collect();
            let _ = write!(routes, "<p>{}</p>", names.join(", "));
        }
        if is_admin {
            routes.push_str(&format!(
                "<form data-api=\"/api/transport/{id}/students\" data-method=\"POST\">\
                 <select name=\"student_id\" data-number>{student_options}</select>\
                 <button class=\"btn\" type=\"submit\">Assign Student</button></form>{delete}",
                id = route.id,
                delete = delete_button(&format!("/api/transport/{}", route.id), "route"),
            ));
        }
        routes.push_str("</div>");
    }
    html.push_str(&format!(
        "{}<div class=\"data-grid\">{}</div>",
        data_tools(Collection::Transport),
        routes
    ));
    html
}

pub fn exams(ctx: &PageContext<'_>) -> String {
    let mut exams: Vec<_> = ctx.state.data.exams.iter().collect();
    exams.sort_by(|a, b| a.date.cmp(&b.date));

    let mut html = String::new();
    if is_staff(ctx.role()) {
        let fields = format!(
            "{}{}{}{}{}",
            required("subject", "Subject", "text"),
            class_select(ctx),
            required("date", "Date", "date"),
            input("duration", "Duration", "text", "2 hours"),
            input("total_marks", "Total marks", "number", "100"),
        );
        html.push_str(&card("Schedule Exam", &api_form("/api/exams", "POST", &fields, "Schedule")));
    }

    let is_admin = ctx.role() == Role::Admin;
    let rows: Vec<Vec<String>> = exams
        .iter()
        .map(|exam| {
            let mut row = vec![
                escape(&exam.subject),
                escape(&exam.class_name),
                escape(&exam.date),
                escape(&exam.duration),
                exam.total_marks.to_string(),
            ];
            if is_admin {
                row.push(delete_button(&format!("/api/exams/{}", exam.id), "exam"));
            }
            row
        })
        .collect();
    let mut headers = vec!["Subject", "Class", "Date", "Duration", "Total Marks"];
    if is_admin {
        headers.push("Actions");
    }
    html.push_str(&card(
        "Exam Schedule",
        &format!("{}{}", data_tools(Collection::Exams), table(&headers, &rows)),
    ));
    html
}

pub fn account(ctx: &PageContext<'_>) -> String {
    let session = ctx.session;
    let Some(user) = ctx.state.user(&session.username, session.role) else {
        return card("My Account", "<p class=\"error\">Account not found.</p>");
    };

    let profile = api_form(
        "/api/account",
        "PUT",
        &format!(
            "<p>Username: <strong>{}</strong> ({})</p><p>Member since {}</p>{}{}{}{}",
            escape(&user.username),
            user.role.label(),
            user.registered_date.format("%Y-%m-%d"),
            input("name", "Full name", "text", &user.name),
            input("email", "E-mail", "email", &user.email),
            input("phone", "Phone", "tel", &user.phone),
            input("address", "Address", "text", &user.address),
        ),
        "Save Profile",
    );

    let password = api_form(
        "/api/account/password",
        "POST",
        &format!(
            "{}{}{}",
            required("current_password", "Current password", "password"),
            required("new_password", "New password", "password"),
            required("confirm_password", "Confirm new password", "password"),
        ),
        "Change Password",
    );

    let activity: Vec<Vec<String>> = ctx
        .state
        .recent_activity(&user.username, RECENT_ACTIVITY_LIMIT)
        .iter()
        .rev()
        .map(|entry| {
            vec![
                entry.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                escape(&entry.action),
                escape(&entry.details),
            ]
        })
        .collect();

    format!(
        "{}{}{}",
        card("Profile", &profile),
        card("Security", &password),
        card(
            "Recent Activity",
            &format!(
                "<a class=\"btn btn-secondary\" href=\"/api/account/export\">Export My Data</a>{}",
                table(&["When", "Action", "Details"], &activity)
            ),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::sections::service::SectionQuery;
    use chrono::Utc;
    use schoolhub_auth::Session;
    use schoolhub_store::SchoolState;

    fn session(role: Role, username: &str, name: &str) -> Session {
        Session {
            token: "t".to_string(),
            user_id: 1,
            username: username.to_string(),
            role,
            name: name.to_string(),
            login_time: Utc::now(),
            last_activity: Utc::now(),
        }
    }

    #[test]
    fn test_table_escapes_headers_and_reports_empty() {
        let html = table(&["<Name>"], &[]);
        assert!(html.contains("&lt;Name&gt;"));
        assert!(html.contains("No records found"));
    }

    #[test]
    fn test_calendar_forms_depend_on_role() {
        let state = SchoolState::default();
        let query = SectionQuery::default();
        let parent = session(Role::Parent, "mdoe", "Mrs. Doe");
        let ctx = PageContext {
            state: &state,
            session: &parent,
            query: &query,
            conversation: None,
        };
        let html = calendar(&ctx);
        assert!(html.contains("Parent Meeting"));
        assert!(!html.contains("Add Event"));

        let admin = session(Role::Admin, "admin", "Admin");
        let ctx = PageContext {
            session: &admin,
            ..ctx
        };
        let html = calendar(&ctx);
        assert!(html.contains("Add Event"));
        assert!(html.contains("/api/events/1"));
    }

    #[test]
    fn test_library_shows_borrow_for_available_books() {
        let state = SchoolState::default();
        let query = SectionQuery::default();
        let teacher = session(Role::Teacher, "wilson", "Mr. Wilson");
        let ctx = PageContext {
            state: &state,
            session: &teacher,
            query: &query,
            conversation: None,
        };
        let html = library(&ctx);
        assert!(html.contains("Mathematics Grade 10"));
        assert!(html.contains("/api/library/books/1/borrow"));
        assert!(html.contains("Upload Study Material"));
        assert!(!html.contains("Upload Document"));
    }
}
