//! Admin account management.

use vitrina_api::db::users::{NewUser, UserRepository};
use vitrina_api::services::auth::hash_password;
use vitrina_core::{Email, PhoneNumber, UserRole};

use super::{CliError, connect};

/// Create an admin user.
///
/// # Errors
///
/// Returns `CliError::InvalidInput` for malformed email/phone and
/// `CliError::Repository` if the insert fails (e.g. duplicate email).
pub async fn create(
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
    phone: &str,
) -> Result<(), CliError> {
    let email = Email::parse(email).map_err(|e| CliError::InvalidInput(e.to_string()))?;
    let phone = PhoneNumber::parse(phone).map_err(|e| CliError::InvalidInput(e.to_string()))?;

    if password.len() < 8 {
        return Err(CliError::InvalidInput(
            "password must be at least 8 characters".to_owned(),
        ));
    }

    let password_hash = hash_password(password).map_err(|_| CliError::PasswordHash)?;

    let pool = connect().await?;

    let user = UserRepository::new(&pool)
        .create(NewUser {
            email: &email,
            password_hash: &password_hash,
            first_name,
            last_name,
            phone: &phone,
            gender: None,
            date_of_birth: None,
            accepted_terms: true,
            role: UserRole::Admin,
        })
        .await?;

    tracing::info!(user_id = %user.id, email = %user.email, "admin user created");
    Ok(())
}
