use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{User, UserId};

/// Body of create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub job: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUsersQuery {
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub data: Vec<User>,
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
    pub total_pages: u32,
}

/// Summary of a list response kept for the debug panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUsersSummary {
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
    pub total_pages: u32,
    pub users_count: usize,
}

impl From<&ListUsersResponse> for ListUsersSummary {
    fn from(value: &ListUsersResponse) -> Self {
        Self {
            page: value.page,
            per_page: value.per_page,
            total: value.total,
            total_pages: value.total_pages,
            users_count: value.data.len(),
        }
    }
}

/// The service answers with string ids for created users and numeric ids elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(i64),
    Text(String),
}

impl WireId {
    pub fn to_user_id(&self) -> Option<UserId> {
        match self {
            WireId::Number(id) => Some(UserId(*id)),
            WireId::Text(text) => text.trim().parse().ok().map(UserId),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub id: WireId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Error body shape used by the service; every field may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
