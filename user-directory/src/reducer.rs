//! Reducer logic for the user directory.
//!
//! Commands turn into exactly one network call each. The call's outcome
//! comes back as a result action, and only result actions apply the
//! success or failure transition of an operation.

use crate::actions::DirectoryAction;
use crate::api::UserApi;
use crate::error::UserApiError;
use crate::types::{Alert, DirectoryState, Operation, PendingDeletion, UserForm, UserId};
use composable_admin_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use std::marker::PhantomData;
use std::sync::Arc;

/// Environment dependencies for the directory reducer
pub struct UserDirectoryEnvironment<A> {
    /// Users REST API
    pub api: Arc<A>,
}

impl<A> UserDirectoryEnvironment<A> {
    /// Creates a new `UserDirectoryEnvironment`
    #[must_use]
    pub const fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

impl<A> Clone for UserDirectoryEnvironment<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

/// Reducer for the user directory
pub struct UserDirectoryReducer<A> {
    _api: PhantomData<fn() -> A>,
}

impl<A> UserDirectoryReducer<A> {
    /// Creates a new `UserDirectoryReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self { _api: PhantomData }
    }
}

impl<A> Default for UserDirectoryReducer<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for UserDirectoryReducer<A> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<A> std::fmt::Debug for UserDirectoryReducer<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("UserDirectoryReducer")
    }
}

/// Log a failed call and turn it into the failure result
fn request_failed(operation: Operation, error: &UserApiError) -> DirectoryAction {
    tracing::warn!(%operation, status = ?error.status(), %error, "User API call failed");
    DirectoryAction::RequestFailed {
        operation,
        error: error.to_string(),
    }
}

impl<A> UserDirectoryReducer<A>
where
    A: UserApi + 'static,
{
    fn load_users(env: &UserDirectoryEnvironment<A>) -> Effect<DirectoryAction> {
        let api = Arc::clone(&env.api);
        async_effect! {
            Some(match api.list_users().await {
                Ok(users) => DirectoryAction::UsersLoaded { users },
                Err(error) => request_failed(Operation::Load, &error),
            })
        }
    }

    fn create_user(env: &UserDirectoryEnvironment<A>, form: UserForm) -> Effect<DirectoryAction> {
        let api = Arc::clone(&env.api);
        async_effect! {
            Some(match api.create_user(&form).await {
                Ok(user) => DirectoryAction::UserCreated { user },
                Err(error) => request_failed(Operation::Create, &error),
            })
        }
    }

    fn update_user(
        env: &UserDirectoryEnvironment<A>,
        id: UserId,
        form: UserForm,
    ) -> Effect<DirectoryAction> {
        let api = Arc::clone(&env.api);
        async_effect! {
            Some(match api.update_user(id, &form).await {
                Ok(()) => DirectoryAction::UserUpdated { id },
                Err(error) => request_failed(Operation::Edit, &error),
            })
        }
    }

    fn delete_user(env: &UserDirectoryEnvironment<A>, id: UserId) -> Effect<DirectoryAction> {
        let api = Arc::clone(&env.api);
        async_effect! {
            Some(match api.delete_user(id).await {
                Ok(()) => DirectoryAction::UserDeleted { id },
                Err(error) => request_failed(Operation::Delete, &error),
            })
        }
    }

    fn succeed(state: &mut DirectoryState, operation: Operation) {
        if let Some(message) = operation.success_message() {
            state.alert = Alert::success(message);
        }
    }
}

impl<A> Reducer for UserDirectoryReducer<A>
where
    A: UserApi + 'static,
{
    type State = DirectoryState;
    type Action = DirectoryAction;
    type Environment = UserDirectoryEnvironment<A>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            DirectoryAction::GetUsers => {
                state.is_busy = true;
                smallvec![Self::load_users(env)]
            },
            DirectoryAction::CreateUser { form } => smallvec![Self::create_user(env, form)],
            DirectoryAction::EditUser { id, form } => smallvec![Self::update_user(env, id, form)],
            DirectoryAction::DeleteUser { id } => smallvec![Self::delete_user(env, id)],

            // ========== Mutations ==========
            DirectoryAction::UpdateUsername { username, id } => {
                if let Some(user) = state.users.iter_mut().find(|user| user.id == id) {
                    user.username = username;
                } else {
                    tracing::warn!(%id, "Ignoring username update for unknown user");
                }
                SmallVec::new()
            },
            DirectoryAction::UpdateUserToEdit(user) => {
                state.user_to_edit = user;
                SmallVec::new()
            },
            DirectoryAction::UpdateUserToDelete { username, id } => {
                state.user_to_delete = Some(PendingDeletion { id, username });
                SmallVec::new()
            },
            DirectoryAction::FilterUsersTable { filtered_count } => {
                state.total_rows = filtered_count;
                SmallVec::new()
            },

            // ========== Results ==========
            DirectoryAction::UsersLoaded { users } => {
                state.total_rows = users.len();
                state.users = users;
                state.is_busy = false;
                SmallVec::new()
            },
            DirectoryAction::UserCreated { user } => {
                state.users.push(user);
                Self::succeed(state, Operation::Create);
                SmallVec::new()
            },
            DirectoryAction::UserUpdated { .. } => {
                Self::succeed(state, Operation::Edit);
                SmallVec::new()
            },
            DirectoryAction::UserDeleted { id } => {
                Self::succeed(state, Operation::Delete);
                state.user_to_delete = None;
                state.users.retain(|user| user.id != id);
                state.total_rows = state.users.len();
                SmallVec::new()
            },
            DirectoryAction::RequestFailed { operation, .. } => {
                state.alert = Alert::danger(operation.failure_message());
                if operation == Operation::Load {
                    state.is_busy = false;
                }
                SmallVec::new()
            },
        }
    }
}
