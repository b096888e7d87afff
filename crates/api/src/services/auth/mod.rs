//! Authentication service.
//!
//! Registration, login, and profile updates with argon2 password hashing.
//! Sessions themselves are handled by tower-sessions in the middleware
//! layer; this service only authenticates and mutates users.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::NaiveDate;
use sqlx::PgPool;

use vitrina_core::{Email, Gender, PhoneNumber, UserId, UserRole};

use crate::db::RepositoryError;
use crate::db::users::{NewUser, ProfileUpdate, UserRepository};
use crate::models::user::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Registration input, as submitted by the client.
#[derive(Debug)]
pub struct RegisterData<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub accepted_terms: bool,
}

/// Profile update input.
#[derive(Debug)]
pub struct ProfileData<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new customer account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail`/`InvalidPhone` on malformed input,
    /// `AuthError::MissingField` on empty names, `AuthError::WeakPassword`
    /// on a short password, `AuthError::TermsNotAccepted` if the terms flag
    /// is unset, and `AuthError::UserAlreadyExists` on a duplicate email.
    pub async fn register(&self, data: RegisterData<'_>) -> Result<User, AuthError> {
        if data.first_name.trim().is_empty() {
            return Err(AuthError::MissingField("firstName"));
        }
        if data.last_name.trim().is_empty() {
            return Err(AuthError::MissingField("lastName"));
        }

        let email = Email::parse(data.email)?;
        let phone = PhoneNumber::parse(data.phone)?;

        validate_password(data.password)?;

        if !data.accepted_terms {
            return Err(AuthError::TermsNotAccepted);
        }

        let password_hash = hash_password(data.password)?;

        let user = self
            .users
            .create(NewUser {
                email: &email,
                password_hash: &password_hash,
                first_name: data.first_name.trim(),
                last_name: data.last_name.trim(),
                phone: &phone,
                gender: data.gender,
                date_of_birth: data.date_of_birth,
                accepted_terms: data.accepted_terms,
                role: UserRole::Customer,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Update a user's profile.
    ///
    /// Email and role are immutable through this path.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField`/`InvalidPhone` on bad input and
    /// `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        data: ProfileData<'_>,
    ) -> Result<User, AuthError> {
        if data.first_name.trim().is_empty() {
            return Err(AuthError::MissingField("firstName"));
        }
        if data.last_name.trim().is_empty() {
            return Err(AuthError::MissingField("lastName"));
        }

        let phone = PhoneNumber::parse(data.phone)?;

        let user = self
            .users
            .update_profile(
                user_id,
                ProfileUpdate {
                    first_name: data.first_name.trim(),
                    last_name: data.last_name.trim(),
                    phone: &phone,
                    gender: data.gender,
                    date_of_birth: data.date_of_birth,
                },
            )
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// Public so the CLI can create admin accounts with the same parameters.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("kratka"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_password_ok() {
        assert!(validate_password("dovoljnoduga1").is_ok());
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("lozinka123").unwrap();
        assert!(verify_password("lozinka123", &hash).is_ok());
        assert!(matches!(
            verify_password("pogresna", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_against_garbage_hash() {
        assert!(matches!(
            verify_password("lozinka123", "not-a-hash"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
