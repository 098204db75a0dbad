//! Controller layer: session state, named commands and their orchestration.

mod command;
mod controller;
mod session;

pub use command::{CommandOutcome, DashboardCommand};
pub use controller::{
    ConfirmPrompt, DashboardController, FixedAnswer, DEFAULT_NOTIFICATION_TTL,
    DELETE_CONFIRMATION,
};
pub use session::{DashboardSession, LoadState, Notification, NotificationKind};
