//! Domain types for the user directory screen.
//!
//! Records arrive as JSON from the agency users API. Only `id` and
//! `username` are interpreted; every other attribute is carried through
//! untouched so the table can render whatever columns the server sends.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Default number of rows per table page
pub const DEFAULT_PER_PAGE: usize = 10;

/// Server-assigned user identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wraps a raw identifier
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user record as returned by the server
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,
    /// Login name shown in the table
    pub username: String,
    /// Any other attributes the server returned, kept verbatim
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl User {
    /// Creates a record with no extra attributes
    #[must_use]
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            attributes: Map::new(),
        }
    }

    /// Adds an extra attribute
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Form body sent when creating or updating a user
///
/// Serialized flat: `{"username": "...", "email": "...", ...}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserForm {
    /// Requested username
    pub username: String,
    /// Additional form fields (email, password, role, ...)
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl UserForm {
    /// Creates a form carrying only a username
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            fields: Map::new(),
        }
    }

    /// Adds a form field
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// A record staged for deletion, waiting for confirmation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDeletion {
    /// Identifier of the staged record
    pub id: UserId,
    /// Username shown in the confirmation prompt
    pub username: String,
}

/// Visual style of the alert banner
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertStatus {
    /// No banner
    #[default]
    #[serde(rename = "")]
    None,
    /// Green banner
    #[serde(rename = "success")]
    Success,
    /// Red banner
    #[serde(rename = "danger")]
    Danger,
}

impl AlertStatus {
    /// The status as the view layer names it
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Success => "success",
            Self::Danger => "danger",
        }
    }
}

/// The single alert slot; every outcome overwrites it
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Banner style
    pub status: AlertStatus,
    /// Human-readable message
    pub message: String,
}

impl Alert {
    /// A success banner
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: AlertStatus::Success,
            message: message.into(),
        }
    }

    /// A danger banner
    #[must_use]
    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            status: AlertStatus::Danger,
            message: message.into(),
        }
    }

    /// Whether a banner should be shown
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.status != AlertStatus::None
    }
}

/// The asynchronous operations the directory performs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// `GET /api/agencies/users`
    Load,
    /// `POST /api/agencies/users`
    Create,
    /// `PUT /api/agencies/users/{id}`
    Edit,
    /// `DELETE /api/agencies/users/{id}`
    Delete,
}

impl Operation {
    /// Banner text shown when the operation succeeds, if any
    #[must_use]
    pub const fn success_message(self) -> Option<&'static str> {
        match self {
            Self::Load => None,
            Self::Create => Some("A user has been successfully created"),
            Self::Edit => Some("A user has been successfully updated!"),
            Self::Delete => Some("A user has been successfully deleted!"),
        }
    }

    /// Banner text shown when the operation fails
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Load => "There is an error in loading users",
            Self::Create => "There is an error in creating a user",
            Self::Edit => "There is an error in updating a user",
            Self::Delete => "There is an error in deleting a user",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load => "load",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
        })
    }
}

/// State of the user directory screen
///
/// `total_rows` is a display hint for the pager. It follows `users.len()`
/// after loads and deletes but is overwritten by table filtering, so use
/// [`DirectoryState::user_count`] for the real number of records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectoryState {
    /// Records in server response order
    pub users: Vec<User>,
    /// Rows the pager should account for
    pub total_rows: usize,
    /// Rows per page
    pub per_page: usize,
    /// Outcome banner
    pub alert: Alert,
    /// Record awaiting delete confirmation
    pub user_to_delete: Option<PendingDeletion>,
    /// Record open in the edit form
    pub user_to_edit: Option<User>,
    /// True until the first list fetch resolves
    pub is_busy: bool,
}

impl DirectoryState {
    /// Creates the initial screen state
    #[must_use]
    pub const fn new() -> Self {
        Self::with_per_page(DEFAULT_PER_PAGE)
    }

    /// Creates the initial screen state with a custom page size
    #[must_use]
    pub const fn with_per_page(per_page: usize) -> Self {
        Self {
            users: Vec::new(),
            total_rows: 1,
            per_page,
            alert: Alert {
                status: AlertStatus::None,
                message: String::new(),
            },
            user_to_delete: None,
            user_to_edit: None,
            is_busy: true,
        }
    }

    /// Number of records actually held
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Looks up a record by id
    #[must_use]
    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Number of pages the pager should show
    #[must_use]
    pub fn page_count(&self) -> usize {
        if self.per_page == 0 {
            return 1;
        }
        self.total_rows.div_ceil(self.per_page).max(1)
    }
}

impl Default for DirectoryState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;
    use serde_json::json;

    #[test]
    fn initial_state_matches_screen_defaults() {
        let state = DirectoryState::new();
        assert!(state.users.is_empty());
        assert_eq!(state.total_rows, 1);
        assert_eq!(state.per_page, 10);
        assert_eq!(state.alert, Alert::default());
        assert!(state.user_to_delete.is_none());
        assert!(state.user_to_edit.is_none());
        assert!(state.is_busy);
    }

    #[test]
    fn user_keeps_unknown_attributes() {
        let raw = json!({
            "id": 7,
            "username": "ana",
            "email": "ana@example.com",
            "roles": ["admin"]
        });

        let user: User = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(user.id, UserId::new(7));
        assert_eq!(user.username, "ana");
        assert_eq!(user.attributes["email"], "ana@example.com");
        assert_eq!(serde_json::to_value(&user).unwrap(), raw);
    }

    #[test]
    fn user_without_username_is_rejected() {
        let result: Result<User, _> = serde_json::from_value(json!({ "id": 1 }));
        assert!(result.is_err());
    }

    #[test]
    fn form_serializes_flat() {
        let form = UserForm::new("bo").with_field("email", "bo@example.com");
        assert_eq!(
            serde_json::to_value(&form).unwrap(),
            json!({ "username": "bo", "email": "bo@example.com" })
        );
    }

    #[test]
    fn alert_status_uses_view_names() {
        assert_eq!(serde_json::to_value(AlertStatus::None).unwrap(), json!(""));
        assert_eq!(serde_json::to_value(AlertStatus::Danger).unwrap(), json!("danger"));
        assert_eq!(AlertStatus::Success.as_str(), "success");
    }

    #[test]
    fn page_count_rounds_up() {
        let mut state = DirectoryState::with_per_page(10);
        state.total_rows = 21;
        assert_eq!(state.page_count(), 3);

        state.total_rows = 0;
        assert_eq!(state.page_count(), 1);
    }
}
