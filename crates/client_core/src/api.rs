use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{User, UserId},
    protocol::{
        CreateUserResponse, ErrorBody, ListUsersQuery, ListUsersResponse, ListUsersSummary,
        UpdateUserResponse, UserDraft,
    },
};
use tokio::sync::broadcast;

use crate::{
    debug::{ApiAction, ApiCallRecord},
    error::ClientError,
};

pub const DEFAULT_BASE_URL: &str = "https://reqres.in/api";
pub const DEFAULT_API_KEY: &str = "reqres-free-v1";
const API_KEY_HEADER: &str = "x-api-key";
const CALL_FEED_CAPACITY: usize = 64;
const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsersPage {
    pub items: Vec<User>,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    pub total_count: u32,
}

impl From<ListUsersResponse> for UsersPage {
    fn from(value: ListUsersResponse) -> Self {
        Self {
            items: value.data,
            page: value.page,
            per_page: value.per_page,
            total_pages: value.total_pages,
            total_count: value.total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedUser {
    pub id: UserId,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatedUser {
    pub updated_at: Option<DateTime<Utc>>,
}

/// The remote user-management service.
///
/// Create and update are not persisted remotely; callers keep their own copy of the record.
#[async_trait]
pub trait UsersApi: Send + Sync {
    async fn list_users(&self, page: u32) -> Result<UsersPage, ClientError>;
    async fn create_user(&self, draft: &UserDraft) -> Result<CreatedUser, ClientError>;
    async fn update_user(
        &self,
        user_id: UserId,
        draft: &UserDraft,
    ) -> Result<UpdatedUser, ClientError>;
    async fn delete_user(&self, user_id: UserId) -> Result<(), ClientError>;
    /// Every call, successful or not, is published here.
    fn subscribe_calls(&self) -> broadcast::Receiver<ApiCallRecord>;
}

pub struct HttpUsersApi {
    http: Client,
    base_url: String,
    api_key: String,
    request_delay: Option<u32>,
    calls: broadcast::Sender<ApiCallRecord>,
}

struct DecodedBody<T> {
    status: u16,
    url: String,
    body: T,
    raw: serde_json::Value,
}

impl HttpUsersApi {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let (calls, _) = broadcast::channel(CALL_FEED_CAPACITY);
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            request_delay: None,
            calls,
        }
    }

    /// Server-side delay in seconds added to list calls; the demo service supports it.
    pub fn with_request_delay(mut self, delay_secs: Option<u32>) -> Self {
        self.request_delay = delay_secs;
        self
    }

    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn user_url(&self, user_id: UserId) -> String {
        format!("{}/users/{}", self.base_url, user_id.0)
    }

    fn publish(&self, record: ApiCallRecord) {
        tracing::debug!(
            action = record.action.as_str(),
            status = ?record.status,
            url = %record.url,
            success = record.is_success(),
            "api call recorded"
        );
        // No subscribers is fine; the feed is best effort.
        let _ = self.calls.send(record);
    }

    async fn send(
        &self,
        action: ApiAction,
        url: &str,
        request: RequestBuilder,
    ) -> Result<Response, ClientError> {
        match request.header(API_KEY_HEADER, &self.api_key).send().await {
            Ok(response) => Ok(response),
            Err(source) => {
                self.publish(ApiCallRecord::failure(
                    action,
                    None,
                    url,
                    source.to_string(),
                ));
                Err(ClientError::Transport {
                    url: url.to_string(),
                    source,
                })
            }
        }
    }

    /// Turns a rejected response into an error, tolerating a missing or non-JSON body.
    async fn rejection(
        &self,
        action: ApiAction,
        response: Response,
        fallback: &str,
    ) -> ClientError {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body: ErrorBody = response.json().await.unwrap_or_default();

        self.publish(ApiCallRecord::failure(
            action,
            Some(status),
            url.clone(),
            body.error.as_deref().unwrap_or(UNKNOWN_ERROR),
        ));

        ClientError::Status {
            status,
            url,
            message: body.error.unwrap_or_else(|| fallback.to_string()),
        }
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        action: ApiAction,
        response: Response,
    ) -> Result<DecodedBody<T>, ClientError> {
        let status = response.status().as_u16();
        let url = response.url().to_string();

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(source) => {
                self.publish(ApiCallRecord::failure(
                    action,
                    Some(status),
                    url.clone(),
                    source.to_string(),
                ));
                return Err(ClientError::Transport { url, source });
            }
        };

        let parsed = serde_json::from_slice::<serde_json::Value>(&bytes).and_then(|raw| {
            let body = serde_json::from_value::<T>(raw.clone())?;
            Ok((body, raw))
        });

        match parsed {
            Ok((body, raw)) => Ok(DecodedBody {
                status,
                url,
                body,
                raw,
            }),
            Err(err) => {
                let reason = err.to_string();
                self.publish(ApiCallRecord::failure(
                    action,
                    Some(status),
                    url.clone(),
                    reason.clone(),
                ));
                Err(ClientError::MalformedBody { url, reason })
            }
        }
    }
}

#[async_trait]
impl UsersApi for HttpUsersApi {
    async fn list_users(&self, page: u32) -> Result<UsersPage, ClientError> {
        let url = self.users_url();
        let query = ListUsersQuery {
            page,
            delay: self.request_delay,
        };
        let response = self
            .send(ApiAction::List, &url, self.http.get(&url).query(&query))
            .await?;
        if !response.status().is_success() {
            return Err(self
                .rejection(ApiAction::List, response, "Failed to fetch users")
                .await);
        }

        let decoded: DecodedBody<ListUsersResponse> =
            self.decode(ApiAction::List, response).await?;
        let summary = serde_json::to_value(ListUsersSummary::from(&decoded.body)).ok();
        self.publish(ApiCallRecord::success(
            ApiAction::List,
            decoded.status,
            decoded.url,
            summary,
        ));

        Ok(decoded.body.into())
    }

    async fn create_user(&self, draft: &UserDraft) -> Result<CreatedUser, ClientError> {
        let url = self.users_url();
        let response = self
            .send(ApiAction::Create, &url, self.http.post(&url).json(draft))
            .await?;
        if !response.status().is_success() {
            return Err(self
                .rejection(ApiAction::Create, response, "Failed to create user")
                .await);
        }

        let decoded: DecodedBody<CreateUserResponse> =
            self.decode(ApiAction::Create, response).await?;
        let Some(id) = decoded.body.id.to_user_id() else {
            let reason = format!("created id {:?} is not an integer", decoded.body.id);
            self.publish(ApiCallRecord::failure(
                ApiAction::Create,
                Some(decoded.status),
                decoded.url.clone(),
                reason.clone(),
            ));
            return Err(ClientError::MalformedBody {
                url: decoded.url,
                reason,
            });
        };

        self.publish(ApiCallRecord::success(
            ApiAction::Create,
            decoded.status,
            decoded.url,
            Some(decoded.raw),
        ));
        Ok(CreatedUser {
            id,
            created_at: decoded.body.created_at,
        })
    }

    async fn update_user(
        &self,
        user_id: UserId,
        draft: &UserDraft,
    ) -> Result<UpdatedUser, ClientError> {
        let url = self.user_url(user_id);
        let response = self
            .send(ApiAction::Update, &url, self.http.put(&url).json(draft))
            .await?;
        if !response.status().is_success() {
            return Err(self
                .rejection(ApiAction::Update, response, "Failed to update user")
                .await);
        }

        let decoded: DecodedBody<UpdateUserResponse> =
            self.decode(ApiAction::Update, response).await?;
        self.publish(ApiCallRecord::success(
            ApiAction::Update,
            decoded.status,
            decoded.url,
            Some(decoded.raw),
        ));
        Ok(UpdatedUser {
            updated_at: decoded.body.updated_at,
        })
    }

    async fn delete_user(&self, user_id: UserId) -> Result<(), ClientError> {
        let url = self.user_url(user_id);
        let response = self
            .send(ApiAction::Delete, &url, self.http.delete(&url))
            .await?;
        if response.status() != StatusCode::NO_CONTENT {
            return Err(self
                .rejection(ApiAction::Delete, response, "Failed to delete user")
                .await);
        }

        self.publish(ApiCallRecord::success(
            ApiAction::Delete,
            response.status().as_u16(),
            response.url().to_string(),
            None,
        ));
        Ok(())
    }

    fn subscribe_calls(&self) -> broadcast::Receiver<ApiCallRecord> {
        self.calls.subscribe()
    }
}
