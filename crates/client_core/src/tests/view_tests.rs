use std::time::{Duration, Instant};

use shared::domain::{FormMode, PageState, SearchState, User, UserForm, UserId};

use crate::{
    dashboard::{DashboardSession, Notification, NotificationKind},
    debug::{ApiAction, ApiCallRecord},
    view::{
        escape_html, pagination, render, table_rows, DebugPanelView, TableRow,
        DELETE_SIMULATED_NOTE, EMPTY_TABLE_MESSAGE,
    },
};

fn user(id: i64, first_name: &str, last_name: &str) -> User {
    User {
        id: UserId(id),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!("{}@reqres.in", first_name.to_lowercase()),
        avatar: format!("https://reqres.in/img/faces/{id}-image.jpg"),
        job: "Unknown".to_string(),
    }
}

fn session_with(users: Vec<User>) -> DashboardSession {
    DashboardSession {
        users,
        page: PageState::new(1, 2),
        ..DashboardSession::default()
    }
}

#[test]
fn empty_list_renders_single_placeholder_row() {
    assert_eq!(table_rows(&[]), vec![TableRow::Empty]);

    let view = render(&DashboardSession::default(), Instant::now());
    assert!(view.to_string().contains(EMPTY_TABLE_MESSAGE));
    assert!(view.to_html().contains("colspan=\"7\""));
}

#[test]
fn search_with_no_matches_renders_placeholder() {
    let mut session = session_with(vec![user(1, "George", "Bluth")]);
    session.search = SearchState::new("nobody");

    let view = render(&session, Instant::now());

    assert_eq!(view.rows, vec![TableRow::Empty]);
    assert_eq!(view.search_term.as_deref(), Some("nobody"));
}

#[test]
fn pagination_disables_buttons_at_the_edges() {
    let single = pagination(PageState::default());
    assert!(single.prev_disabled && single.next_disabled);
    assert_eq!(single.label(), "Page 1 of 1");

    let middle = pagination(PageState::new(2, 3));
    assert!(!middle.prev_disabled && !middle.next_disabled);

    let view = render(&session_with(vec![user(1, "George", "Bluth")]), Instant::now());
    let html = view.to_html();
    assert!(html.contains("<button id=\"prevPageBtn\" disabled>"));
    assert!(html.contains("<button id=\"nextPageBtn\">"));
    assert!(html.contains("<span id=\"pageInfo\">Page 1 of 2</span>"));
}

#[test]
fn text_table_lists_users_in_order() {
    let view = render(
        &session_with(vec![user(7, "Michael", "Lawson"), user(1, "George", "Bluth")]),
        Instant::now(),
    );
    let text = view.to_string();

    let michael = text.find("Michael").expect("first row");
    let george = text.find("George").expect("second row");
    assert!(michael < george);
    assert!(text.contains("[ prev ] Page 1 of 2 next >"));
}

#[test]
fn user_supplied_text_is_escaped() {
    let session = session_with(vec![user(1, "<script>alert(1)</script>", "O'Brien")]);

    let html = render(&session, Instant::now()).to_html();

    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(html.contains("O&#39;Brien"));
    assert_eq!(escape_html("a & \"b\""), "a &amp; &quot;b&quot;");
}

#[test]
fn expired_notification_is_hidden() {
    let mut session = DashboardSession::default();
    session.notification = Some(Notification::new(
        NotificationKind::Success,
        "User created successfully",
        Duration::from_secs(3),
    ));

    let now = Instant::now();
    let shown = render(&session, now).notification.expect("visible");
    assert_eq!(shown.kind, NotificationKind::Success);
    assert_eq!(shown.message, "User created successfully");

    let later = now + Duration::from_secs(4);
    assert!(render(&session, later).notification.is_none());
}

#[test]
fn form_title_follows_mode() {
    let mut session = session_with(vec![user(7, "Michael", "Lawson")]);
    assert!(render(&session, Instant::now()).form.is_none());

    session.form_mode = FormMode::Create;
    let form = render(&session, Instant::now()).form.expect("form");
    assert_eq!(form.title, "Add New User");

    session.form_mode = FormMode::Edit(UserId(7));
    session.form = UserForm::for_user(&session.users[0]);
    let view = render(&session, Instant::now());
    assert_eq!(view.form.as_ref().map(|form| form.title), Some("Edit User"));
    assert!(view.to_html().contains("value=\"Michael\""));
}

#[test]
fn debug_panel_shows_successful_delete_note() {
    let record = ApiCallRecord::success(
        ApiAction::Delete,
        204,
        "https://reqres.in/api/users/7",
        None,
    );

    let panel = DebugPanelView::from_record(&record);
    let text = panel.to_string();

    assert!(text.contains("API Response (Success) [delete]"));
    assert!(text.contains("Status: 204"));
    assert!(text.contains(DELETE_SIMULATED_NOTE));
}

#[test]
fn debug_panel_shows_error_and_missing_status() {
    let record = ApiCallRecord::failure(
        ApiAction::List,
        None,
        "https://reqres.in/api/users?page=1",
        "connection refused",
    );

    let mut session = DashboardSession::default();
    session.last_call = Some(record);
    let view = render(&session, Instant::now());
    let panel = view.debug_panel.as_ref().expect("panel");

    assert!(!panel.success);
    let text = panel.to_string();
    assert!(text.contains("Status: no response"));
    assert!(text.contains("Error: connection refused"));
    assert!(!text.contains(DELETE_SIMULATED_NOTE));
    assert!(view.to_html().contains("id=\"responseModal\""));
}

#[test]
fn debug_panel_pretty_prints_response_data() {
    let record = ApiCallRecord::success(
        ApiAction::Create,
        201,
        "https://reqres.in/api/users",
        Some(serde_json::json!({ "id": "512", "name": "Jane Doe" })),
    );

    let panel = DebugPanelView::from_record(&record);

    let data = panel.data.expect("data");
    assert!(data.contains("\"name\": \"Jane Doe\""));
}

#[test]
fn text_table_is_compact_and_html_carries_row_controls() {
    let view = render(&session_with(vec![user(7, "Michael", "Lawson")]), Instant::now());

    let text = view.to_string();
    assert!(text.starts_with("ID"));
    assert!(!text.contains("reqres.in/img"));

    let html = view.to_html();
    assert!(html.contains("src=\"https://reqres.in/img/faces/7-image.jpg\""));
    assert!(html.contains("class=\"btn btn-secondary edit-btn\" data-id=\"7\""));
    assert!(html.contains("class=\"btn btn-danger delete-btn\" data-id=\"7\""));
}
