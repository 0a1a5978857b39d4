//! HTML building blocks for the server-rendered pages.
//!
//! Pages are plain strings assembled with `format!`/`write!`. Every value
//! that originates from stored data must pass through [`escape`] first.
//! Buttons and forms talk to the JSON API through `data-api` attributes
//! handled by [`CLIENT_SCRIPT`].

use std::fmt::Write;

use schoolhub_models::Role;

/// Escape text for use in element content and quoted attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Money as shown in the UI: whole dollars without decimals.
pub fn money(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("${:.0}", amount)
    } else {
        format!("${:.2}", amount)
    }
}

const STYLES: &str = r#"
body{font-family:system-ui,sans-serif;margin:0;background:#f5f7fb;color:#1a202c}
body.dark{background:#1a202c;color:#e2e8f0}
.auth{max-width:420px;margin:60px auto;background:#fff;padding:32px;border-radius:12px;box-shadow:0 4px 20px rgba(0,0,0,.08)}
.dashboard{display:flex;min-height:100vh}
.sidebar{width:230px;background:linear-gradient(180deg,#667eea,#764ba2);padding:20px;color:#fff}
.sidebar a{display:block;color:#fff;text-decoration:none;padding:9px 12px;border-radius:8px;margin-bottom:4px}
.sidebar a.active,.sidebar a:hover{background:rgba(255,255,255,.2)}
.main{flex:1;padding:24px}
.header{display:flex;justify-content:space-between;align-items:center;margin-bottom:20px}
.card,.data-item,.stat{background:#fff;border-radius:10px;padding:18px;margin-bottom:16px;box-shadow:0 2px 8px rgba(0,0,0,.05)}
body.dark .card,body.dark .data-item,body.dark .stat,body.dark .auth{background:#2d3748}
.stats{display:grid;grid-template-columns:repeat(auto-fit,minmax(170px,1fr));gap:16px}
.data-grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(260px,1fr));gap:16px}
.btn{border:0;border-radius:6px;padding:8px 14px;cursor:pointer;background:#667eea;color:#fff;margin:2px}
.btn-danger{background:#e53e3e}.btn-success{background:#38a169}.btn-secondary{background:#718096}
input,select,textarea{padding:8px;border:1px solid #cbd5e0;border-radius:6px;margin:4px 0;width:100%;box-sizing:border-box}
table{width:100%;border-collapse:collapse}th,td{border:1px solid #cbd5e0;padding:6px;text-align:left}
.warning{background:#fefcbf;color:#744210;padding:10px;border-radius:8px;margin-bottom:12px}
.error{color:#e53e3e}
"#;

/// Wires `data-api` forms and buttons to the JSON API, shows errors and
/// polls the session status for the expiry warning.
pub const CLIENT_SCRIPT: &str = r#"
async function callApi(url, method, body) {
  const res = await fetch(url, {method, headers: {'Content-Type': 'application/json'}, credentials: 'same-origin',
    body: body === undefined ? undefined : JSON.stringify(body)});
  const text = await res.text();
  const data = text ? JSON.parse(text) : {};
  if (!res.ok) { throw new Error(data.error || res.statusText); }
  return data;
}
function formBody(form) {
  const body = {};
  for (const el of form.elements) {
    if (!el.name || el.value === '') continue;
    const value = el.type === 'number' || 'number' in el.dataset ? Number(el.value) : el.value;
    const [head, key] = el.name.split('.');
    if (key) { body[head] = body[head] || {}; body[head][key] = value; } else { body[head] = value; }
  }
  return body;
}
document.addEventListener('submit', async (e) => {
  const form = e.target;
  if (!form.dataset.api) return;
  e.preventDefault();
  try {
    const data = await callApi(form.dataset.api, form.dataset.method || 'POST', formBody(form));
    if (form.dataset.success) { alert(form.dataset.success); }
    const target = data.redirect || form.dataset.redirect;
    if (target) { location.href = target; } else { location.reload(); }
  } catch (err) { alert(err.message); }
});
document.addEventListener('click', async (e) => {
  const btn = e.target.closest('[data-api]');
  if (!btn || btn.tagName === 'FORM') return;
  if (btn.dataset.confirm && !confirm(btn.dataset.confirm)) return;
  try {
    const body = btn.dataset.body ? JSON.parse(btn.dataset.body) : undefined;
    const data = await callApi(btn.dataset.api, btn.dataset.method || 'POST', body);
    if (data.redirect) { location.href = data.redirect; } else { location.reload(); }
  } catch (err) { alert(err.message); }
});
async function checkSession() {
  const banner = document.getElementById('session-warning');
  if (!banner) return;
  try {
    const status = await callApi('/api/auth/session', 'GET');
    banner.style.display = status.warning ? 'block' : 'none';
  } catch (err) { location.href = '/login'; }
}
setInterval(checkSession, 60000);
"#;

/// A complete HTML document.
pub fn document(title: &str, dark_mode: bool, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{title} - Southern Cross</title><style>{STYLES}</style></head>\
         <body class=\"{class}\">{body}<script>{CLIENT_SCRIPT}</script></body></html>",
        title = escape(title),
        class = if dark_mode { "dark" } else { "" },
    )
}

/// Sidebar entries per role, in display order.
pub fn nav_sections(role: Role) -> &'static [(&'static str, &'static str)] {
    match role {
        Role::Admin => &[
            ("dashboard", "Dashboard"),
            ("students", "Students"),
            ("teachers", "Teachers"),
            ("classes", "Classes"),
            ("fees", "Fees"),
            ("announcements", "Announcements"),
            ("reports", "Reports"),
            ("messages", "Messages"),
            ("calendar", "Calendar"),
            ("library", "Library"),
            ("transport", "Transport"),
            ("exams", "Exams"),
            ("certificates", "Certificates"),
            ("account", "My Account"),
        ],
        Role::Teacher => &[
            ("dashboard", "Dashboard"),
            ("classes", "My Classes"),
            ("attendance", "Attendance"),
            ("marks", "Marks"),
            ("homework", "Homework"),
            ("timetable", "Timetable"),
            ("messages", "Messages"),
            ("calendar", "Calendar"),
            ("exams", "Exams"),
            ("account", "My Account"),
        ],
        Role::Parent => &[
            ("dashboard", "Dashboard"),
            ("profile", "Child Profile"),
            ("attendance", "Attendance"),
            ("progress", "Progress"),
            ("homework", "Homework"),
            ("fees", "Fees"),
            ("messages", "Messages"),
            ("calendar", "Calendar"),
            ("library", "Library"),
            ("transport", "Transport"),
            ("account", "My Account"),
        ],
    }
}

/// Page heading for a section. Unknown sections fall back to "Dashboard".
pub fn section_title(section: &str, role: Role) -> &'static str {
    match section {
        "students" => "Student Management",
        "teachers" => "Teacher Management",
        "classes" if role == Role::Admin => "Class Management",
        "classes" => "My Classes",
        "fees" if role == Role::Admin => "Fee Management",
        "fees" => "Fee Status",
        "announcements" => "Announcements",
        "reports" => "Reports",
        "messages" => "Messages",
        "attendance" => "Attendance",
        "marks" => "Marks",
        "homework" => "Homework",
        "timetable" => "Timetable",
        "profile" => "Child Profile",
        "progress" => "Academic Progress",
        "calendar" => "Calendar",
        "library" => "Library Management",
        "transport" => "Transport Management",
        "exams" => "Exam Management",
        "certificates" => "Certificate Generator",
        "account" => "My Account",
        _ => "Dashboard",
    }
}

/// Dashboard frame: sidebar, header controls and the section content.
pub fn dashboard_shell(role: Role, section: &str, user_name: &str, content: &str) -> String {
    let mut nav = String::new();
    for (id, label) in nav_sections(role) {
        let _ = write!(
            nav,
            "<a href=\"/app/{id}\" class=\"{active}\">{label}</a>",
            active = if *id == section { "active" } else { "" },
        );
    }

    format!(
        "<div class=\"dashboard\"><nav class=\"sidebar\">\
         <h3>Southern Cross</h3><h4>{role_label} Panel</h4>{nav}</nav>\
         <div class=\"main\"><div class=\"header\"><h2 id=\"page-title\">{title}</h2>\
         <div><span>{user}</span> \
         <button class=\"btn btn-secondary\" data-api=\"/api/data/theme\">Theme</button> \
         <button class=\"btn btn-danger\" data-api=\"/api/auth/logout\">Logout</button></div></div>\
         <div id=\"session-warning\" class=\"warning\" style=\"display:none\">\
         Your session will expire soon. \
         <button class=\"btn\" data-api=\"/api/auth/session/extend\">Stay signed in</button></div>\
         <div id=\"content\">{content}</div></div></div>",
        role_label = role.label(),
        title = section_title(section, role),
        user = escape(user_name),
    )
}

/// `<option>` list with `selected` on the matching value.
pub fn options<'a>(values: impl IntoIterator<Item = &'a str>, selected: Option<&str>) -> String {
    let mut out = String::new();
    for value in values {
        let _ = write!(
            out,
            "<option value=\"{v}\"{sel}>{v}</option>",
            v = escape(value),
            sel = if Some(value) == selected { " selected" } else { "" },
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_money() {
        assert_eq!(money(3000.0), "$3000");
        assert_eq!(money(12.5), "$12.50");
    }

    #[test]
    fn test_section_titles_depend_on_role() {
        assert_eq!(section_title("classes", Role::Admin), "Class Management");
        assert_eq!(section_title("classes", Role::Teacher), "My Classes");
        assert_eq!(section_title("fees", Role::Parent), "Fee Status");
        assert_eq!(section_title("nonsense", Role::Parent), "Dashboard");
    }

    #[test]
    fn test_shell_marks_active_section() {
        let html = dashboard_shell(Role::Teacher, "marks", "Mr. <Wilson>", "<p>x</p>");
        assert!(html.contains("<a href=\"/app/marks\" class=\"active\">Marks</a>"));
        assert!(html.contains("Mr. &lt;Wilson&gt;"));
        assert!(html.contains("Teacher Panel"));
        assert!(!html.contains("/app/students"));
    }

    #[test]
    fn test_options_selects_value() {
        let html = options(["10A", "10B"], Some("10B"));
        assert_eq!(
            html,
            "<option value=\"10A\">10A</option><option value=\"10B\" selected>10B</option>"
        );
    }
}
