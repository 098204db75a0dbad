//! The dashboard's cached view: user list, current page and total pages.

use anyhow::{Context, Result};
use shared::domain::{PageState, User};

use crate::Storage;

pub const CACHED_USERS_KEY: &str = "cachedUsers";
pub const CURRENT_PAGE_KEY: &str = "currentPage";
pub const TOTAL_PAGES_KEY: &str = "totalPages";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSnapshot {
    pub users: Vec<User>,
    pub current_page: u32,
    pub total_pages: u32,
}

impl CacheSnapshot {
    pub fn page_state(&self) -> PageState {
        PageState::new(self.current_page, self.total_pages)
    }
}

/// Reads and writes the three independent snapshot entries.
///
/// Values carry no version or checksum; whatever was stored last is returned.
#[derive(Clone, Debug)]
pub struct SnapshotCache {
    storage: Storage,
}

impl SnapshotCache {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Full snapshot, present only when all three entries exist.
    pub async fn load(&self) -> Result<Option<CacheSnapshot>> {
        let users = self.storage.get(CACHED_USERS_KEY).await?;
        let current_page = self.storage.get(CURRENT_PAGE_KEY).await?;
        let total_pages = self.storage.get(TOTAL_PAGES_KEY).await?;

        let (Some(users), Some(current_page), Some(total_pages)) =
            (users, current_page, total_pages)
        else {
            return Ok(None);
        };

        Ok(Some(CacheSnapshot {
            users: decode_users(&users)?,
            current_page: decode_page(CURRENT_PAGE_KEY, &current_page)?,
            total_pages: decode_page(TOTAL_PAGES_KEY, &total_pages)?,
        }))
    }

    /// Only the cached user list, regardless of the page entries.
    pub async fn load_users(&self) -> Result<Option<Vec<User>>> {
        match self.storage.get(CACHED_USERS_KEY).await? {
            Some(raw) => decode_users(&raw).map(Some),
            None => Ok(None),
        }
    }

    pub async fn save(&self, snapshot: &CacheSnapshot) -> Result<()> {
        self.save_users(&snapshot.users).await?;
        self.storage
            .set(CURRENT_PAGE_KEY, &snapshot.current_page.to_string())
            .await?;
        self.storage
            .set(TOTAL_PAGES_KEY, &snapshot.total_pages.to_string())
            .await?;
        Ok(())
    }

    pub async fn save_users(&self, users: &[User]) -> Result<()> {
        let encoded = serde_json::to_string(users).context("failed to encode cached users")?;
        self.storage.set(CACHED_USERS_KEY, &encoded).await
    }

    pub async fn clear(&self) -> Result<()> {
        for key in [CACHED_USERS_KEY, CURRENT_PAGE_KEY, TOTAL_PAGES_KEY] {
            self.storage.remove(key).await?;
        }
        tracing::debug!("cleared cached snapshot");
        Ok(())
    }
}

fn decode_users(raw: &str) -> Result<Vec<User>> {
    serde_json::from_str(raw)
        .with_context(|| format!("cached entry '{CACHED_USERS_KEY}' is not a user list"))
}

fn decode_page(key: &str, raw: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .with_context(|| format!("cached entry '{key}' is not a page number: '{raw}'"))
}
