//! The collaborator the directory talks to.
//!
//! One method per REST call. Implementations return `Send` futures so the
//! store can run them on spawned tasks.

use crate::error::Result;
use crate::types::{User, UserForm, UserId};
use std::future::Future;

/// Agency users REST API
pub trait UserApi: Send + Sync {
    /// `GET /api/agencies/users`
    fn list_users(&self) -> impl Future<Output = Result<Vec<User>>> + Send;

    /// `POST /api/agencies/users`, returns the created record
    fn create_user(&self, form: &UserForm) -> impl Future<Output = Result<User>> + Send;

    /// `PUT /api/agencies/users/{id}`
    ///
    /// The response body is not used by the directory.
    fn update_user(&self, id: UserId, form: &UserForm) -> impl Future<Output = Result<()>> + Send;

    /// `DELETE /api/agencies/users/{id}`
    fn delete_user(&self, id: UserId) -> impl Future<Output = Result<()>> + Send;
}
