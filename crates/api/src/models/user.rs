//! User domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use vitrina_core::{Email, Gender, PhoneNumber, UserId, UserRole};

/// A storefront user (domain type).
///
/// The password hash never travels with this type; repositories return it
/// separately where verification needs it.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Serbian-format phone number.
    pub phone: PhoneNumber,
    /// Optional gender.
    pub gender: Option<Gender>,
    /// Optional date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Whether the user accepted the terms of service at registration.
    pub accepted_terms: bool,
    /// Permission role.
    pub role: UserRole,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether this user may use the back-office endpoints.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }
}

/// JSON representation of a user, sent to the SPA.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.as_str().to_owned(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.as_str().to_owned(),
            gender: user.gender,
            date_of_birth: user.date_of_birth,
            role: user.role,
            created_at: user.created_at,
        }
    }
}
