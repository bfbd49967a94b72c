//! In-memory [`UserApi`] for tests and offline demos.
//!
//! Behaves like a tiny users backend: ids are assigned on create, deletes
//! of unknown ids answer 404. Individual operations can be switched to
//! fail, and every call is counted.

use crate::api::UserApi;
use crate::error::{Result, UserApiError};
use crate::types::{Operation, User, UserForm, UserId};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
struct Backend {
    users: Vec<User>,
    next_id: u64,
    failing: HashSet<Operation>,
    calls: HashMap<Operation, usize>,
}

/// Mock users API
///
/// Clones share the same backend, so a test can keep a handle for
/// assertions while the store owns another.
#[derive(Debug, Clone, Default)]
pub struct MockUserApi {
    backend: Arc<Mutex<Backend>>,
    latency: Option<Duration>,
}

impl MockUserApi {
    /// Create an empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend seeded with records
    ///
    /// New ids continue after the highest seeded id.
    #[must_use]
    pub fn with_users(users: Vec<User>) -> Self {
        let next_id = users.iter().map(|user| user.id.get()).max().unwrap_or(0);
        Self {
            backend: Arc::new(Mutex::new(Backend {
                users,
                next_id,
                ..Backend::default()
            })),
            latency: None,
        }
    }

    /// Delay every response by `latency`
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make `operation` fail with a 500 until [`recover`](Self::recover) is called
    pub fn fail(&self, operation: Operation) {
        self.backend().failing.insert(operation);
    }

    /// Make `operation` succeed again
    pub fn recover(&self, operation: Operation) {
        self.backend().failing.remove(&operation);
    }

    /// Number of calls issued for `operation`
    #[must_use]
    pub fn calls(&self, operation: Operation) -> usize {
        self.backend().calls.get(&operation).copied().unwrap_or(0)
    }

    /// Number of calls issued across all operations
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.backend().calls.values().sum()
    }

    /// Records currently held by the backend
    #[must_use]
    pub fn users(&self) -> Vec<User> {
        self.backend().users.clone()
    }

    fn backend(&self) -> MutexGuard<'_, Backend> {
        self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count the call, then run `respond` against the backend after the latency
    fn call<T, F>(&self, operation: Operation, respond: F) -> impl Future<Output = Result<T>> + Send + use<T, F>
    where
        T: Send,
        F: FnOnce(&mut Backend) -> Result<T> + Send,
    {
        *self.backend().calls.entry(operation).or_insert(0) += 1;

        let backend = Arc::clone(&self.backend);
        let latency = self.latency;

        async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }

            let mut backend = backend.lock().unwrap_or_else(PoisonError::into_inner);
            if backend.failing.contains(&operation) {
                return Err(UserApiError::Status {
                    status: 500,
                    message: format!("mock {operation} failure"),
                });
            }
            respond(&mut *backend)
        }
    }
}

impl UserApi for MockUserApi {
    fn list_users(&self) -> impl Future<Output = Result<Vec<User>>> + Send {
        self.call(Operation::Load, |backend| Ok(backend.users.clone()))
    }

    fn create_user(&self, form: &UserForm) -> impl Future<Output = Result<User>> + Send {
        let form = form.clone();
        self.call(Operation::Create, move |backend| {
            backend.next_id += 1;
            let user = User {
                id: UserId::new(backend.next_id),
                username: form.username,
                attributes: form.fields,
            };
            backend.users.push(user.clone());
            Ok(user)
        })
    }

    fn update_user(&self, id: UserId, form: &UserForm) -> impl Future<Output = Result<()>> + Send {
        let form = form.clone();
        self.call(Operation::Edit, move |backend| {
            let user = backend
                .users
                .iter_mut()
                .find(|user| user.id == id)
                .ok_or_else(|| UserApiError::NotFound(format!("No user with id {id}")))?;
            user.username = form.username;
            user.attributes.extend(form.fields);
            Ok(())
        })
    }

    fn delete_user(&self, id: UserId) -> impl Future<Output = Result<()>> + Send {
        self.call(Operation::Delete, move |backend| {
            let index = backend
                .users
                .iter()
                .position(|user| user.id == id)
                .ok_or_else(|| UserApiError::NotFound(format!("No user with id {id}")))?;
            backend.users.remove(index);
            Ok(())
        })
    }
}
