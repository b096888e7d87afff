//! Session payload types.

use serde::{Deserialize, Serialize};

use vitrina_core::{UserId, UserRole};

/// Keys under which values are stored in the tower-sessions session.
pub mod session_keys {
    /// The authenticated user ([`CurrentUser`](super::CurrentUser)).
    pub const CURRENT_USER: &str = "current_user";
}

/// The authenticated user as stored in the session cookie's backing record.
///
/// Kept deliberately small; full profile data is re-read from the database
/// when a handler needs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User ID.
    pub id: UserId,
    /// Permission role at login time.
    pub role: UserRole,
    /// Email, for tracing context.
    pub email: String,
}

impl CurrentUser {
    /// Whether this session belongs to an admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }
}
