use shared::domain::{UserForm, UserId};

/// A user action, handled by [`DashboardController::dispatch`](super::DashboardController::dispatch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCommand {
    /// Show the cached snapshot, then fetch the current page.
    Init,
    Refresh,
    NextPage,
    PrevPage,
    ChangePage(i64),
    JumpToPage(u32),
    OpenCreateForm,
    OpenEditForm(UserId),
    CloseForm,
    SubmitForm(UserForm),
    Search(String),
    Delete(UserId),
    DismissNotification,
}

impl DashboardCommand {
    pub fn name(&self) -> &'static str {
        match self {
            DashboardCommand::Init => "init",
            DashboardCommand::Refresh => "refresh",
            DashboardCommand::NextPage => "next_page",
            DashboardCommand::PrevPage => "prev_page",
            DashboardCommand::ChangePage(_) => "change_page",
            DashboardCommand::JumpToPage(_) => "jump_to_page",
            DashboardCommand::OpenCreateForm => "open_create_form",
            DashboardCommand::OpenEditForm(_) => "open_edit_form",
            DashboardCommand::CloseForm => "close_form",
            DashboardCommand::SubmitForm(_) => "submit_form",
            DashboardCommand::Search(_) => "search",
            DashboardCommand::Delete(_) => "delete",
            DashboardCommand::DismissNotification => "dismiss_notification",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Completed,
    /// Nothing to do, e.g. paging past either end.
    Unchanged,
    /// The user declined a confirmation.
    Cancelled,
}
