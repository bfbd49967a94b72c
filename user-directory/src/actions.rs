//! Every input the directory reducer accepts.

use crate::types::{Operation, User, UserForm, UserId};

/// Actions for the user directory
///
/// Commands start a network call; result actions are produced by those
/// calls and are the only way a response reaches the state. Mutations are
/// applied synchronously by the view.
#[derive(Clone, Debug, PartialEq)]
pub enum DirectoryAction {
    // ========== Commands ==========
    /// Fetch the full user list
    GetUsers,

    /// Create a user from a form
    CreateUser {
        /// Form body
        form: UserForm,
    },

    /// Update a user from a form
    EditUser {
        /// Target record
        id: UserId,
        /// Form body
        form: UserForm,
    },

    /// Delete a user
    DeleteUser {
        /// Target record
        id: UserId,
    },

    // ========== Mutations ==========
    /// Overwrite the username of a held record
    UpdateUsername {
        /// New username
        username: String,
        /// Target record
        id: UserId,
    },

    /// Stage (or clear) the record open in the edit form
    UpdateUserToEdit(Option<User>),

    /// Stage a record for delete confirmation
    UpdateUserToDelete {
        /// Username shown in the prompt
        username: String,
        /// Target record
        id: UserId,
    },

    /// The table was filtered; `filtered_count` rows remain visible
    FilterUsersTable {
        /// Rows left after filtering
        filtered_count: usize,
    },

    // ========== Results ==========
    /// The user list arrived
    UsersLoaded {
        /// Records in response order
        users: Vec<User>,
    },

    /// The server created a user
    UserCreated {
        /// Record as returned by the server
        user: User,
    },

    /// The server accepted an update
    UserUpdated {
        /// Updated record
        id: UserId,
    },

    /// The server deleted a user
    UserDeleted {
        /// Deleted record
        id: UserId,
    },

    /// A network call failed
    RequestFailed {
        /// Which call failed
        operation: Operation,
        /// Error detail, for logs only
        error: String,
    },
}

impl DirectoryAction {
    /// Whether this action is the outcome of `operation`
    ///
    /// Used by request/response callers to wait for a specific result.
    #[must_use]
    pub fn concludes(&self, operation: Operation) -> bool {
        match self {
            Self::UsersLoaded { .. } => operation == Operation::Load,
            Self::UserCreated { .. } => operation == Operation::Create,
            Self::UserUpdated { .. } => operation == Operation::Edit,
            Self::UserDeleted { .. } => operation == Operation::Delete,
            Self::RequestFailed { operation: failed, .. } => *failed == operation,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_conclude_their_own_operation_only() {
        let deleted = DirectoryAction::UserDeleted { id: UserId::new(3) };
        assert!(deleted.concludes(Operation::Delete));
        assert!(!deleted.concludes(Operation::Edit));

        let failed = DirectoryAction::RequestFailed {
            operation: Operation::Create,
            error: "boom".to_string(),
        };
        assert!(failed.concludes(Operation::Create));
        assert!(!failed.concludes(Operation::Load));

        assert!(!DirectoryAction::GetUsers.concludes(Operation::Load));
    }
}
