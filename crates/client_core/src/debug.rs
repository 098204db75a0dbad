//! Records of every API call, fed to the debug panel.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiAction {
    List,
    Create,
    Update,
    Delete,
}

impl ApiAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiAction::List => "list",
            ApiAction::Create => "create",
            ApiAction::Update => "update",
            ApiAction::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum CallOutcome {
    Success(Option<serde_json::Value>),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiCallRecord {
    pub action: ApiAction,
    pub url: String,
    /// Absent when the request never got a response.
    pub status: Option<u16>,
    pub outcome: CallOutcome,
    pub recorded_at: DateTime<Utc>,
}

impl ApiCallRecord {
    pub fn success(
        action: ApiAction,
        status: u16,
        url: impl Into<String>,
        data: Option<serde_json::Value>,
    ) -> Self {
        Self {
            action,
            url: url.into(),
            status: Some(status),
            outcome: CallOutcome::Success(data),
            recorded_at: Utc::now(),
        }
    }

    pub fn failure(
        action: ApiAction,
        status: Option<u16>,
        url: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            action,
            url: url.into(),
            status,
            outcome: CallOutcome::Failure(error.into()),
            recorded_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, CallOutcome::Success(_))
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            CallOutcome::Failure(error) => Some(error),
            CallOutcome::Success(_) => None,
        }
    }

    pub fn data(&self) -> Option<&serde_json::Value> {
        match &self.outcome {
            CallOutcome::Success(data) => data.as_ref(),
            CallOutcome::Failure(_) => None,
        }
    }
}
