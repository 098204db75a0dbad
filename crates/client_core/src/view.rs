//! Pure rendering of a [`DashboardSession`] into table rows, form, notification and debug panel.
//!
//! [`render`] builds a [`DashboardView`]; the view prints as plain text via `Display` and as
//! markup via [`DashboardView::to_html`].

use std::{fmt, time::Instant};

use shared::domain::{FormMode, PageState, User, UserForm, UserId};

use crate::{
    dashboard::{DashboardSession, NotificationKind},
    debug::{ApiAction, ApiCallRecord},
};

pub const EMPTY_TABLE_MESSAGE: &str = "No users found";
pub const DELETE_SIMULATED_NOTE: &str = "User deleted successfully (simulated in UI)";
const TABLE_COLUMNS: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: UserId,
    pub avatar: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub job: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRow {
    User(UserRow),
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationView {
    pub current_page: u32,
    pub total_pages: u32,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

impl PaginationView {
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub title: &'static str,
    pub form: UserForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugPanelView {
    pub action: ApiAction,
    pub success: bool,
    pub status: Option<u16>,
    pub url: String,
    pub error: Option<String>,
    /// Pretty-printed JSON body.
    pub data: Option<String>,
}

impl DebugPanelView {
    pub fn from_record(record: &ApiCallRecord) -> Self {
        Self {
            action: record.action,
            success: record.is_success(),
            status: record.status,
            url: record.url.clone(),
            error: record.error().map(str::to_string),
            data: record
                .data()
                .and_then(|data| serde_json::to_string_pretty(data).ok()),
        }
    }

    fn status_label(&self) -> String {
        self.status
            .map_or_else(|| "no response".to_string(), |status| status.to_string())
    }

    fn shows_delete_note(&self) -> bool {
        self.success && self.action == ApiAction::Delete
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub rows: Vec<TableRow>,
    pub pagination: PaginationView,
    pub loading: bool,
    pub search_term: Option<String>,
    pub notification: Option<NotificationView>,
    pub form: Option<FormView>,
    pub debug_panel: Option<DebugPanelView>,
}

pub fn render(session: &DashboardSession, now: Instant) -> DashboardView {
    let search = session.search();
    DashboardView {
        rows: table_rows(&session.visible_users()),
        pagination: pagination(session.page()),
        loading: session.is_loading(),
        search_term: search.is_searching().then(|| search.term().to_string()),
        notification: session
            .notification()
            .filter(|notification| notification.is_visible_at(now))
            .map(|notification| NotificationView {
                kind: notification.kind(),
                message: notification.message().to_string(),
            }),
        form: form_view(session.form_mode(), session.form()),
        debug_panel: session.last_call().map(DebugPanelView::from_record),
    }
}

pub fn table_rows(users: &[&User]) -> Vec<TableRow> {
    if users.is_empty() {
        return vec![TableRow::Empty];
    }
    users
        .iter()
        .map(|user| {
            TableRow::User(UserRow {
                id: user.id,
                avatar: user.avatar.clone(),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                email: user.email.clone(),
                job: user.job.clone(),
            })
        })
        .collect()
}

pub fn pagination(page: PageState) -> PaginationView {
    PaginationView {
        current_page: page.current_page(),
        total_pages: page.total_pages(),
        prev_disabled: page.is_first(),
        next_disabled: page.is_last(),
    }
}

fn form_view(mode: FormMode, form: &UserForm) -> Option<FormView> {
    let title = match mode {
        FormMode::Closed => return None,
        FormMode::Create => "Add New User",
        FormMode::Edit(_) => "Edit User",
    };
    Some(FormView {
        title,
        form: form.clone(),
    })
}

impl DashboardView {
    pub fn to_html(&self) -> String {
        Html(self).to_string()
    }
}

/// Compact terminal table: avatars are left out and each row is acted on by its id
/// (`edit <id>`, `delete <id>`) instead of per-row controls. [`DashboardView::to_html`] has both.
impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.loading {
            writeln!(f, "[loading...]")?;
        }
        if let Some(notification) = &self.notification {
            writeln!(
                f,
                "[{}] {}",
                notification.kind.as_str(),
                notification.message
            )?;
        }
        if let Some(term) = &self.search_term {
            writeln!(f, "Search: \"{term}\" (current page only)")?;
        }

        let headers = ["ID", "First Name", "Last Name", "Email", "Job"];
        let cells: Vec<[String; 5]> = self
            .rows
            .iter()
            .filter_map(|row| match row {
                TableRow::User(user) => Some([
                    user.id.to_string(),
                    user.first_name.clone(),
                    user.last_name.clone(),
                    user.email.clone(),
                    user.job.clone(),
                ]),
                TableRow::Empty => None,
            })
            .collect();

        let mut widths = headers.map(|header| header.chars().count());
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        write_text_row(f, &headers.map(str::to_string), &widths)?;
        let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
        writeln!(f, "{}", rule.join("-+-"))?;
        if cells.is_empty() {
            writeln!(f, "{EMPTY_TABLE_MESSAGE}")?;
        }
        for row in &cells {
            write_text_row(f, row, &widths)?;
        }

        let pagination = &self.pagination;
        writeln!(
            f,
            "{} {} {}",
            if pagination.prev_disabled { "[ prev ]" } else { "< prev" },
            pagination.label(),
            if pagination.next_disabled { "[ next ]" } else { "next >" }
        )?;

        if let Some(form) = &self.form {
            writeln!(f, "{}", form.title)?;
        }
        Ok(())
    }
}

fn write_text_row(
    f: &mut fmt::Formatter<'_>,
    row: &[String; 5],
    widths: &[usize; 5],
) -> fmt::Result {
    let padded: Vec<String> = row
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    writeln!(f, "{}", padded.join(" | ").trim_end())
}

impl fmt::Display for DebugPanelView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.success { "Success" } else { "Error" };
        writeln!(f, "API Response ({verdict}) [{}]", self.action.as_str())?;
        writeln!(f, "Status: {}", self.status_label())?;
        writeln!(f, "Endpoint: {}", self.url)?;
        if let Some(error) = &self.error {
            writeln!(f, "Error: {error}")?;
        }
        if let Some(data) = &self.data {
            writeln!(f, "Response Data:")?;
            writeln!(f, "{data}")?;
        }
        if self.shows_delete_note() {
            writeln!(f, "{DELETE_SIMULATED_NOTE}")?;
        }
        Ok(())
    }
}

struct Html<'a>(&'a DashboardView);

impl fmt::Display for Html<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        writeln!(f, "<div class=\"dashboard\">")?;

        if view.loading {
            writeln!(
                f,
                "<div id=\"loadingSpinner\" class=\"loading-spinner\"><div class=\"spinner\"></div></div>"
            )?;
        }

        if let Some(notification) = &view.notification {
            writeln!(
                f,
                "<div id=\"notification\" class=\"notification {} show\">{}</div>",
                notification.kind.as_str(),
                escape_html(&notification.message)
            )?;
        }

        if let Some(term) = &view.search_term {
            writeln!(
                f,
                "<p class=\"search-banner\">Filtering current page by <strong>{}</strong></p>",
                escape_html(term)
            )?;
        }

        writeln!(f, "<table class=\"user-table\">")?;
        writeln!(
            f,
            "<thead><tr><th>ID</th><th>Avatar</th><th>First Name</th><th>Last Name</th>\
             <th>Email</th><th>Job</th><th>Actions</th></tr></thead>"
        )?;
        writeln!(f, "<tbody id=\"userTableBody\">")?;
        for row in &view.rows {
            write_html_row(f, row)?;
        }
        writeln!(f, "</tbody>")?;
        writeln!(f, "</table>")?;

        let pagination = &view.pagination;
        writeln!(
            f,
            "<div class=\"pagination\"><button id=\"prevPageBtn\"{}>Previous</button>\
             <span id=\"pageInfo\">{}</span><button id=\"nextPageBtn\"{}>Next</button></div>",
            disabled_attr(pagination.prev_disabled),
            pagination.label(),
            disabled_attr(pagination.next_disabled)
        )?;

        if let Some(form) = &view.form {
            write_html_form(f, form)?;
        }
        if let Some(panel) = &view.debug_panel {
            write_html_debug_panel(f, panel)?;
        }

        writeln!(f, "</div>")
    }
}

fn write_html_row(f: &mut fmt::Formatter<'_>, row: &TableRow) -> fmt::Result {
    let user = match row {
        TableRow::Empty => {
            return writeln!(
                f,
                "<tr><td colspan=\"{TABLE_COLUMNS}\" style=\"text-align: center;\">{EMPTY_TABLE_MESSAGE}</td></tr>"
            );
        }
        TableRow::User(user) => user,
    };

    writeln!(
        f,
        "<tr><td>{id}</td><td><img src=\"{avatar}\" alt=\"Avatar\" class=\"avatar\"></td>\
         <td>{first}</td><td>{last}</td><td>{email}</td><td>{job}</td>\
         <td class=\"action-buttons\">\
         <button class=\"btn btn-secondary edit-btn\" data-id=\"{id}\">Edit</button>\
         <button class=\"btn btn-danger delete-btn\" data-id=\"{id}\">Delete</button></td></tr>",
        id = user.id,
        avatar = escape_html(&user.avatar),
        first = escape_html(&user.first_name),
        last = escape_html(&user.last_name),
        email = escape_html(&user.email),
        job = escape_html(&user.job),
    )
}

fn write_html_form(f: &mut fmt::Formatter<'_>, form: &FormView) -> fmt::Result {
    let values = &form.form;
    writeln!(f, "<div id=\"userModal\" class=\"modal\">")?;
    writeln!(f, "<h2 id=\"modalTitle\">{}</h2>", form.title)?;
    writeln!(f, "<form id=\"userForm\">")?;
    let user_id = values.id.map(|id| id.to_string()).unwrap_or_default();
    writeln!(f, "<input type=\"hidden\" id=\"userId\" value=\"{user_id}\">")?;
    for (id, label, value, required) in [
        ("firstName", "First Name", &values.first_name, true),
        ("lastName", "Last Name", &values.last_name, true),
        ("email", "Email", &values.email, true),
        ("job", "Job", &values.job, false),
    ] {
        writeln!(
            f,
            "<label for=\"{id}\">{label}</label><input id=\"{id}\" value=\"{}\"{}>",
            escape_html(value),
            if required { " required" } else { "" }
        )?;
    }
    writeln!(f, "<button type=\"submit\" class=\"btn btn-primary\">Save</button>")?;
    writeln!(f, "</form>")?;
    writeln!(f, "</div>")
}

fn write_html_debug_panel(f: &mut fmt::Formatter<'_>, panel: &DebugPanelView) -> fmt::Result {
    let (class, verdict) = if panel.success {
        ("success", "Success")
    } else {
        ("error", "Error")
    };
    writeln!(f, "<div id=\"responseModal\" class=\"modal\">")?;
    writeln!(f, "<div class=\"response-header {class}\">")?;
    writeln!(f, "<h3>API Response ({verdict})</h3>")?;
    writeln!(
        f,
        "<p><strong>Status:</strong> <span class=\"status-code\">{}</span></p>",
        panel.status_label()
    )?;
    writeln!(
        f,
        "<p><strong>Endpoint:</strong> <code>{}</code></p>",
        escape_html(&panel.url)
    )?;
    if let Some(error) = &panel.error {
        writeln!(
            f,
            "<div class=\"error-message\"><p><strong>Error:</strong> {}</p></div>",
            escape_html(error)
        )?;
    }
    if let Some(data) = &panel.data {
        writeln!(
            f,
            "<div class=\"response-data\"><p><strong>Response Data:</strong></p><pre>{}</pre></div>",
            escape_html(data)
        )?;
    }
    if panel.shows_delete_note() {
        writeln!(
            f,
            "<div class=\"success-message\"><p>{DELETE_SIMULATED_NOTE}</p></div>"
        )?;
    }
    writeln!(f, "</div>")?;
    writeln!(f, "</div>")
}

fn disabled_attr(disabled: bool) -> &'static str {
    if disabled {
        " disabled"
    } else {
        ""
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
