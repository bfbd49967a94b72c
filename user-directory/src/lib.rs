//! User directory store for the agency admin screen.
//!
//! A single-writer state container holding the agency's users and the
//! flags the table view renders from. All changes go through the
//! [`UserDirectoryReducer`]; the four REST calls run as effects and report
//! back through result actions.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use user_directory::{HttpUserApi, UserDirectory, UserForm};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = Arc::new(HttpUserApi::new("http://localhost:8000")?);
//! let directory = UserDirectory::new(api);
//!
//! // Load the table and wait until the rows are in
//! directory.get_users().await?.wait().await;
//!
//! // Create a user; the alert reports the outcome
//! directory.create_user(UserForm::new("ana")).await?.wait().await;
//! let alert = directory.state(|s| s.alert.clone()).await;
//! println!("{}: {}", alert.status.as_str(), alert.message);
//!
//! directory.shutdown(None).await?;
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod api;
pub mod client;
pub mod config;
pub mod directory;
pub mod error;
pub mod mocks;
pub mod reducer;
pub mod types;

// Re-export commonly used types
pub use actions::DirectoryAction;
pub use api::UserApi;
pub use client::HttpUserApi;
pub use config::Config;
pub use directory::UserDirectory;
pub use error::UserApiError;
pub use mocks::MockUserApi;
pub use reducer::{UserDirectoryEnvironment, UserDirectoryReducer};
pub use types::{
    Alert, AlertStatus, DirectoryState, Operation, PendingDeletion, User, UserForm, UserId,
};
