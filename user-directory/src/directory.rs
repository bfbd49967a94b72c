//! The directory as a view sees it.
//!
//! [`UserDirectory`] owns the store for one mounted screen. Each operation
//! returns as soon as its network call is started; the returned
//! [`EffectHandle`] resolves once the call's outcome has been applied.

use crate::actions::DirectoryAction;
use crate::api::UserApi;
use crate::config::Config;
use crate::reducer::{UserDirectoryEnvironment, UserDirectoryReducer};
use crate::types::{DirectoryState, User, UserForm, UserId};
use composable_admin_runtime::{EffectHandle, Store, StoreConfig, StoreError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Store type backing a [`UserDirectory`]
pub type DirectoryStore<A> = Store<
    DirectoryState,
    DirectoryAction,
    UserDirectoryEnvironment<A>,
    UserDirectoryReducer<A>,
>;

/// User directory for one mounted screen
pub struct UserDirectory<A>
where
    A: UserApi + 'static,
{
    store: DirectoryStore<A>,
}

impl<A> UserDirectory<A>
where
    A: UserApi + 'static,
{
    /// Mount a directory with default state and store settings
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        Self::with_state(api, DirectoryState::new(), StoreConfig::default())
    }

    /// Mount a directory using loaded configuration
    #[must_use]
    pub fn from_config(api: Arc<A>, config: &Config) -> Self {
        Self::with_state(
            api,
            DirectoryState::with_per_page(config.directory.per_page),
            StoreConfig::default().with_shutdown_timeout(config.shutdown_timeout()),
        )
    }

    /// Mount a directory over an explicit initial state
    #[must_use]
    pub fn with_state(api: Arc<A>, state: DirectoryState, config: StoreConfig) -> Self {
        Self {
            store: Store::with_config(
                state,
                UserDirectoryReducer::new(),
                UserDirectoryEnvironment::new(api),
                config,
            ),
        }
    }

    // ========== Operations ==========

    /// Fetch the user list
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once the directory is unmounted.
    pub async fn get_users(&self) -> Result<EffectHandle, StoreError> {
        self.store.send(DirectoryAction::GetUsers).await
    }

    /// Create a user
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once the directory is unmounted.
    pub async fn create_user(&self, form: UserForm) -> Result<EffectHandle, StoreError> {
        self.store.send(DirectoryAction::CreateUser { form }).await
    }

    /// Update a user
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once the directory is unmounted.
    pub async fn edit_user(&self, id: UserId, form: UserForm) -> Result<EffectHandle, StoreError> {
        self.store.send(DirectoryAction::EditUser { id, form }).await
    }

    /// Delete a user
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once the directory is unmounted.
    pub async fn delete_user(&self, id: UserId) -> Result<EffectHandle, StoreError> {
        self.store.send(DirectoryAction::DeleteUser { id }).await
    }

    // ========== Mutations ==========

    /// Rename a held record in place
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once the directory is unmounted.
    pub async fn update_username(
        &self,
        username: impl Into<String>,
        id: UserId,
    ) -> Result<(), StoreError> {
        self.mutate(DirectoryAction::UpdateUsername {
            username: username.into(),
            id,
        })
        .await
    }

    /// Stage or clear the record being edited
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once the directory is unmounted.
    pub async fn update_user_to_edit(&self, user: Option<User>) -> Result<(), StoreError> {
        self.mutate(DirectoryAction::UpdateUserToEdit(user)).await
    }

    /// Stage a record for delete confirmation
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once the directory is unmounted.
    pub async fn update_user_to_delete(
        &self,
        username: impl Into<String>,
        id: UserId,
    ) -> Result<(), StoreError> {
        self.mutate(DirectoryAction::UpdateUserToDelete {
            username: username.into(),
            id,
        })
        .await
    }

    /// Record how many rows survive the table filter
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once the directory is unmounted.
    pub async fn filter_users_table(&self, filtered_count: usize) -> Result<(), StoreError> {
        self.mutate(DirectoryAction::FilterUsersTable { filtered_count })
            .await
    }

    async fn mutate(&self, action: DirectoryAction) -> Result<(), StoreError> {
        self.store.send(action).await.map(drop)
    }

    // ========== Reading ==========

    /// Copy of the current state
    pub async fn snapshot(&self) -> DirectoryState {
        self.store.state(DirectoryState::clone).await
    }

    /// Read part of the current state
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&DirectoryState) -> T,
    {
        self.store.state(f).await
    }

    /// Observe network results as they are applied
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DirectoryAction> {
        self.store.subscribe_actions()
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &DirectoryStore<A> {
        &self.store
    }

    // ========== Lifecycle ==========

    /// Whether results are still being applied
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.store.is_live()
    }

    /// The view went away; drop whatever in-flight calls produce
    pub fn unmount(&self) {
        self.store.unmount();
    }

    /// Stop accepting work and wait for in-flight calls to finish
    ///
    /// `None` uses the configured shutdown timeout.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if calls are still running
    /// when the timeout elapses.
    pub async fn shutdown(&self, timeout: Option<Duration>) -> Result<(), StoreError> {
        let timeout = timeout.unwrap_or_else(|| self.store.default_shutdown_timeout());
        self.store.shutdown(timeout).await
    }
}

impl<A> Clone for UserDirectory<A>
where
    A: UserApi + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}
