use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{error::ValidationError, protocol::UserDraft};

pub const DEFAULT_JOB: &str = "Unknown";
const SYNTHESIZED_EMAIL_DOMAIN: &str = "example.com";
const AVATAR_BASE_URL: &str = "https://i.pravatar.cc/150";

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(UserId);

fn default_job() -> String {
    DEFAULT_JOB.to_string()
}

/// A user row as the dashboard knows it.
///
/// The remote listing never carries `job`, so it is defaulted on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar: String,
    #[serde(default = "default_job")]
    pub job: String,
}

impl User {
    /// Case-insensitive substring match over first name, last name, email and job.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        [&self.first_name, &self.last_name, &self.email, &self.job]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Splits a full name at the first run of whitespace.
///
/// The first token becomes the first name; everything after it (trimmed) the last name.
pub fn split_full_name(name: &str) -> (String, String) {
    let name = name.trim();
    match name.split_once(char::is_whitespace) {
        Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
        None => (name.to_string(), String::new()),
    }
}

pub fn synthesized_email(first_name: &str, last_name: &str) -> String {
    let local = if last_name.is_empty() {
        first_name.to_string()
    } else {
        format!("{first_name}.{last_name}")
    };
    let local = local.split_whitespace().collect::<Vec<_>>().join(".");
    format!("{}@{SYNTHESIZED_EMAIL_DOMAIN}", local.to_lowercase())
}

pub fn avatar_url(user_id: UserId) -> String {
    format!("{AVATAR_BASE_URL}?u={user_id}")
}

/// Builds the full record for a freshly created user.
///
/// The remote service only echoes an id, so every other field is derived from the draft.
pub fn synthesize_created_user(user_id: UserId, draft: &UserDraft) -> User {
    let (first_name, last_name) = split_full_name(&draft.name);
    User {
        id: user_id,
        email: synthesized_email(&first_name, &last_name),
        avatar: avatar_url(user_id),
        first_name,
        last_name,
        job: draft.job.clone(),
    }
}

/// Applies an accepted update to a local record. Id and avatar are kept.
pub fn apply_update(user: &mut User, draft: &UserDraft) {
    let (first_name, last_name) = split_full_name(&draft.name);
    user.email = synthesized_email(&first_name, &last_name);
    user.first_name = first_name;
    user.last_name = last_name;
    user.job = draft.job.clone();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    current_page: u32,
    total_pages: u32,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
        }
    }
}

impl PageState {
    /// Clamps both values to at least 1 and the current page to the total.
    pub fn new(current_page: u32, total_pages: u32) -> Self {
        let total_pages = total_pages.max(1);
        Self {
            current_page: current_page.clamp(1, total_pages),
            total_pages,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn is_first(&self) -> bool {
        self.current_page == 1
    }

    pub fn is_last(&self) -> bool {
        self.current_page == self.total_pages
    }

    /// Page reached by moving `delta` pages, or `None` when it falls outside `1..=total_pages`.
    pub fn offset(&self, delta: i64) -> Option<u32> {
        let target = i64::from(self.current_page).checked_add(delta)?;
        if (1..=i64::from(self.total_pages)).contains(&target) {
            u32::try_from(target).ok()
        } else {
            None
        }
    }

    pub fn contains(&self, page: u32) -> bool {
        (1..=self.total_pages).contains(&page)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    term: String,
}

impl SearchState {
    pub fn new(term: &str) -> Self {
        Self {
            term: term.trim().to_string(),
        }
    }

    pub fn is_searching(&self) -> bool {
        !self.term.is_empty()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn clear(&mut self) {
        self.term.clear();
    }

    /// Users of the loaded page that match the term; all of them when no search is active.
    pub fn filter<'a>(&self, users: &'a [User]) -> Vec<&'a User> {
        if !self.is_searching() {
            return users.iter().collect();
        }
        let needle = self.term.to_lowercase();
        users
            .iter()
            .filter(|user| user.matches_lowercase(&needle))
            .collect()
    }
}

/// Contents of the add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub id: Option<UserId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub job: String,
}

impl UserForm {
    pub fn for_user(user: &User) -> Self {
        Self {
            id: Some(user.id),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            job: user.job.clone(),
        }
    }

    /// Trims every field and turns the form into a request draft.
    ///
    /// Email is required but not sent; the remote API only accepts `{name, job}`.
    pub fn validate(&self) -> Result<UserDraft, ValidationError> {
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        let email = self.email.trim();

        let missing: Vec<&'static str> = [
            ("first name", first_name),
            ("last name", last_name),
            ("email", email),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let job = match self.job.trim() {
            "" => DEFAULT_JOB,
            job => job,
        };

        Ok(UserDraft {
            name: format!("{first_name} {last_name}"),
            job: job.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Closed,
    Create,
    Edit(UserId),
}
