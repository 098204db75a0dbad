pub mod api;
pub mod dashboard;
pub mod debug;
pub mod error;
pub mod view;

pub use api::{
    CreatedUser, HttpUsersApi, UpdatedUser, UsersApi, UsersPage, DEFAULT_API_KEY,
    DEFAULT_BASE_URL,
};
pub use dashboard::{
    CommandOutcome, ConfirmPrompt, DashboardCommand, DashboardController, DashboardSession,
    FixedAnswer, LoadState, Notification, NotificationKind,
};
pub use debug::{ApiAction, ApiCallRecord, CallOutcome};
pub use error::ClientError;

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod api_tests;
#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;
#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod view_tests;
