use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use shared::{
    domain::{
        apply_update, synthesize_created_user, FormMode, PageState, SearchState, UserForm, UserId,
    },
    protocol::UserDraft,
};
use storage::{CacheSnapshot, SnapshotCache};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use crate::{
    api::{UsersApi, UsersPage},
    debug::ApiCallRecord,
    error::ClientError,
};

use super::{
    command::{CommandOutcome, DashboardCommand},
    session::{DashboardSession, LoadState, Notification, NotificationKind},
};

pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(3);
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this user?";

/// Asks the user to confirm a destructive action.
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

/// Answers every confirmation the same way, for unattended use.
pub struct FixedAnswer(pub bool);

#[async_trait]
impl ConfirmPrompt for FixedAnswer {
    async fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}

/// Runs fetch, cache and render cycles for the user table.
///
/// All state lives in the owned [`DashboardSession`]; it only changes after an awaited
/// call has resolved, one command at a time.
pub struct DashboardController {
    api: Arc<dyn UsersApi>,
    cache: SnapshotCache,
    confirm: Arc<dyn ConfirmPrompt>,
    calls: broadcast::Receiver<ApiCallRecord>,
    notification_ttl: Duration,
    session: DashboardSession,
}

impl DashboardController {
    pub fn new(
        api: Arc<dyn UsersApi>,
        cache: SnapshotCache,
        confirm: Arc<dyn ConfirmPrompt>,
    ) -> Self {
        let calls = api.subscribe_calls();
        Self {
            api,
            cache,
            confirm,
            calls,
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
            session: DashboardSession::default(),
        }
    }

    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }

    pub fn session(&self) -> &DashboardSession {
        &self.session
    }

    pub async fn dispatch(
        &mut self,
        command: DashboardCommand,
    ) -> Result<CommandOutcome, ClientError> {
        let name = command.name();
        debug!(command = name, "dispatching dashboard command");

        let result = match command {
            DashboardCommand::Init => self.init().await,
            DashboardCommand::Refresh => self.refresh().await,
            DashboardCommand::NextPage => self.go_to_page(1).await,
            DashboardCommand::PrevPage => self.go_to_page(-1).await,
            DashboardCommand::ChangePage(delta) => self.go_to_page(delta).await,
            DashboardCommand::JumpToPage(page) => {
                let delta = i64::from(page) - i64::from(self.session.page.current_page());
                self.go_to_page(delta).await
            }
            DashboardCommand::OpenCreateForm => Ok(self.open_create_form()),
            DashboardCommand::OpenEditForm(user_id) => self.open_edit_form(user_id),
            DashboardCommand::CloseForm => Ok(self.close_form()),
            DashboardCommand::SubmitForm(form) => self.submit_user(form).await,
            DashboardCommand::Search(term) => self.search(&term).await,
            DashboardCommand::Delete(user_id) => self.delete(user_id).await,
            DashboardCommand::DismissNotification => {
                self.session.notification = None;
                Ok(CommandOutcome::Completed)
            }
        };

        match &result {
            Ok(outcome) => debug!(command = name, ?outcome, "dashboard command finished"),
            Err(err) => warn!(
                command = name,
                category = ?err.category(),
                "dashboard command failed: {err}"
            ),
        }
        result
    }

    /// Renders the cached snapshot, if complete, before fetching the current page.
    pub async fn init(&mut self) -> Result<CommandOutcome, ClientError> {
        match self.cache.load().await {
            Ok(Some(snapshot)) => {
                info!(
                    users = snapshot.users.len(),
                    page = snapshot.current_page,
                    "loaded cached snapshot"
                );
                self.session.page = snapshot.page_state();
                self.session.users = snapshot.users;
                self.notify(NotificationKind::Success, "Loaded cached data");
            }
            Ok(None) => {}
            Err(err) => warn!("ignoring unreadable cached snapshot: {err:#}"),
        }

        let page = self.session.page.current_page();
        self.fetch_users(page).await?;
        Ok(CommandOutcome::Completed)
    }

    pub async fn refresh(&mut self) -> Result<CommandOutcome, ClientError> {
        if let Err(err) = self.cache.clear().await {
            warn!("failed to clear cached snapshot: {err:#}");
        }
        self.fetch_users(1).await?;
        self.notify(NotificationKind::Success, "Data refreshed successfully");
        Ok(CommandOutcome::Completed)
    }

    /// Moves `delta` pages; out-of-range targets leave everything as it is.
    ///
    /// An active search stays applied to the newly loaded page.
    pub async fn go_to_page(&mut self, delta: i64) -> Result<CommandOutcome, ClientError> {
        if delta == 0 {
            return Ok(CommandOutcome::Unchanged);
        }
        let Some(target) = self.session.page.offset(delta) else {
            debug!(delta, page = ?self.session.page, "page change out of range");
            return Ok(CommandOutcome::Unchanged);
        };
        self.fetch_users(target).await?;
        Ok(CommandOutcome::Completed)
    }

    pub fn open_create_form(&mut self) -> CommandOutcome {
        self.session.open_form(FormMode::Create, UserForm::default());
        CommandOutcome::Completed
    }

    pub fn open_edit_form(&mut self, user_id: UserId) -> Result<CommandOutcome, ClientError> {
        let Some(user) = self.session.users.iter().find(|user| user.id == user_id) else {
            let err = ClientError::UnknownUser(user_id);
            self.notify(NotificationKind::Error, err.to_string());
            return Err(err);
        };
        let form = UserForm::for_user(user);
        self.session.open_form(FormMode::Edit(user_id), form);
        Ok(CommandOutcome::Completed)
    }

    pub fn close_form(&mut self) -> CommandOutcome {
        self.session.close_form();
        CommandOutcome::Completed
    }

    /// Creates when the form has no id, updates otherwise. The form closes only on success.
    pub async fn submit_user(&mut self, form: UserForm) -> Result<CommandOutcome, ClientError> {
        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(err) => {
                self.notify(NotificationKind::Error, err.to_string());
                self.keep_form(form);
                return Err(err.into());
            }
        };

        let result = match form.id {
            Some(user_id) => self.update_user(user_id, &draft).await,
            None => self.create_user(&draft).await,
        };

        match result {
            Ok(()) => {
                self.session.close_form();
                Ok(CommandOutcome::Completed)
            }
            Err(err) => {
                self.notify(NotificationKind::Error, err.to_string());
                self.keep_form(form);
                Err(err)
            }
        }
    }

    /// Filters the loaded page; a blank term drops the filter and re-fetches the page.
    pub async fn search(&mut self, term: &str) -> Result<CommandOutcome, ClientError> {
        let search = SearchState::new(term);
        if !search.is_searching() {
            self.session.search.clear();
            let page = self.session.page.current_page();
            self.fetch_users(page).await?;
            return Ok(CommandOutcome::Completed);
        }

        self.session.search = search;
        debug!(
            term = self.session.search.term(),
            matches = self.session.visible_users().len(),
            "applied search filter"
        );
        Ok(CommandOutcome::Completed)
    }

    pub async fn delete(&mut self, user_id: UserId) -> Result<CommandOutcome, ClientError> {
        if !self.confirm.confirm(DELETE_CONFIRMATION).await {
            debug!(user_id = user_id.0, "delete declined");
            return Ok(CommandOutcome::Cancelled);
        }

        self.session.load_state = LoadState::Loading;
        let result = self.api.delete_user(user_id).await;
        self.drain_calls();
        self.session.load_state = LoadState::Idle;

        if let Err(err) = result {
            self.notify(NotificationKind::Error, err.to_string());
            return Err(err);
        }

        if let Some(index) = self.session.users.iter().position(|user| user.id == user_id) {
            self.session.users.remove(index);
        }
        self.persist_users().await;
        info!(user_id = user_id.0, "deleted user");
        Ok(CommandOutcome::Completed)
    }

    async fn create_user(&mut self, draft: &UserDraft) -> Result<(), ClientError> {
        self.session.load_state = LoadState::Loading;
        let result = self.api.create_user(draft).await;
        self.drain_calls();
        self.session.load_state = LoadState::Idle;

        let created = result?;
        let user = synthesize_created_user(created.id, draft);
        info!(user_id = user.id.0, "created user");
        self.session.users.insert(0, user);
        self.persist_users().await;
        Ok(())
    }

    async fn update_user(
        &mut self,
        user_id: UserId,
        draft: &UserDraft,
    ) -> Result<(), ClientError> {
        self.session.load_state = LoadState::Loading;
        let result = self.api.update_user(user_id, draft).await;
        self.drain_calls();
        self.session.load_state = LoadState::Idle;

        result?;
        let Some(user) = self.session.users.iter_mut().find(|user| user.id == user_id) else {
            debug!(user_id = user_id.0, "updated user is not on the loaded page");
            return Ok(());
        };
        apply_update(user, draft);
        info!(user_id = user_id.0, "updated user");
        self.persist_users().await;
        Ok(())
    }

    async fn fetch_users(&mut self, page: u32) -> Result<(), ClientError> {
        self.session.load_state = LoadState::Loading;
        let result = self.api.list_users(page).await;
        self.drain_calls();

        let outcome = match result {
            Ok(listing) => {
                self.apply_listing(listing).await;
                Ok(())
            }
            Err(err) => {
                self.notify(NotificationKind::Error, err.to_string());
                self.fall_back_to_cache().await;
                Err(err)
            }
        };

        self.session.load_state = LoadState::Idle;
        outcome
    }

    async fn apply_listing(&mut self, listing: UsersPage) {
        self.session.page = PageState::new(listing.page, listing.total_pages);
        self.session.users = listing.items;
        info!(
            page = self.session.page.current_page(),
            total_pages = self.session.page.total_pages(),
            users = self.session.users.len(),
            "fetched users"
        );

        let snapshot = CacheSnapshot {
            users: self.session.users.clone(),
            current_page: self.session.page.current_page(),
            total_pages: self.session.page.total_pages(),
        };
        if let Err(err) = self.cache.save(&snapshot).await {
            warn!("failed to cache snapshot: {err:#}");
        }
    }

    async fn fall_back_to_cache(&mut self) {
        match self.cache.load_users().await {
            Ok(Some(users)) => {
                warn!(users = users.len(), "showing cached users after failed fetch");
                self.session.users = users;
                self.notify(NotificationKind::Warning, "Showing cached data");
            }
            Ok(None) => self.session.users.clear(),
            Err(err) => {
                warn!("cached users are unreadable: {err:#}");
                self.session.users.clear();
            }
        }
    }

    async fn persist_users(&self) {
        if let Err(err) = self.cache.save_users(&self.session.users).await {
            warn!("failed to cache users: {err:#}");
        }
    }

    fn keep_form(&mut self, form: UserForm) {
        let mode = match form.id {
            Some(user_id) => FormMode::Edit(user_id),
            None => FormMode::Create,
        };
        self.session.open_form(mode, form);
    }

    fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        let notification = Notification::new(kind, message, self.notification_ttl);
        debug!(kind = kind.as_str(), message = notification.message(), "notification");
        self.session.notification = Some(notification);
    }

    fn drain_calls(&mut self) {
        loop {
            match self.calls.try_recv() {
                Ok(record) => self.session.last_call = Some(record),
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "api call feed lagged");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }
}
