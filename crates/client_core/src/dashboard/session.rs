use std::time::{Duration, Instant};

use shared::domain::{FormMode, PageState, SearchState, User, UserForm};

use crate::debug::ApiCallRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    kind: NotificationKind,
    message: String,
    expires_at: Instant,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            kind,
            message: message.into(),
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Everything the dashboard shows, owned by the controller.
#[derive(Debug, Clone, Default)]
pub struct DashboardSession {
    pub(crate) users: Vec<User>,
    pub(crate) page: PageState,
    pub(crate) search: SearchState,
    pub(crate) load_state: LoadState,
    pub(crate) form_mode: FormMode,
    pub(crate) form: UserForm,
    pub(crate) notification: Option<Notification>,
    pub(crate) last_call: Option<ApiCallRecord>,
}

impl DashboardSession {
    /// Users of the loaded page, in server order with local creations first.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// The loaded page narrowed by the active search, if any.
    pub fn visible_users(&self) -> Vec<&User> {
        self.search.filter(&self.users)
    }

    pub fn page(&self) -> PageState {
        self.page
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    pub fn form_mode(&self) -> FormMode {
        self.form_mode
    }

    pub fn form(&self) -> &UserForm {
        &self.form
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn last_call(&self) -> Option<&ApiCallRecord> {
        self.last_call.as_ref()
    }

    pub(crate) fn open_form(&mut self, mode: FormMode, form: UserForm) {
        self.form_mode = mode;
        self.form = form;
    }

    pub(crate) fn close_form(&mut self) {
        self.form_mode = FormMode::Closed;
        self.form = UserForm::default();
    }
}
