//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! Internal error text (logs, Sentry) is English; the `message` field sent
//! to the client is Serbian, and server-side details never leak into it.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, CartError, CheckoutError, OrderError};

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Order operation failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Resource not found. Carries the client-facing Serbian message.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized")]
    Unauthorized,

    /// User is authenticated but lacks the required role.
    #[error("Forbidden")]
    Forbidden,

    /// Bad request from client. Carries the client-facing Serbian message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error should be captured to Sentry.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Database(_) | Self::Internal(_) => true,
            Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash)
            | Self::Cart(CartError::Repository(_))
            | Self::Checkout(CheckoutError::Repository(_))
            | Self::Order(OrderError::Repository(_)) => true,
            _ => false,
        }
    }

    /// HTTP status for this error.
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::UserNotFound => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::InvalidEmail(_)
                | AuthError::InvalidPhone(_)
                | AuthError::MissingField(_)
                | AuthError::WeakPassword(_)
                | AuthError::TermsNotAccepted => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Cart(err) => match err {
                CartError::InvalidQuantity | CartError::UnknownPromo(_) => {
                    StatusCode::BAD_REQUEST
                }
                CartError::ProductNotFound | CartError::NotInCart => StatusCode::NOT_FOUND,
                CartError::InsufficientStock { .. } => StatusCode::CONFLICT,
                CartError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Checkout(err) => match err {
                CheckoutError::Validation { .. }
                | CheckoutError::EmptyCart
                | CheckoutError::UnknownPromo(_) => StatusCode::BAD_REQUEST,
                CheckoutError::InsufficientStock { .. } => StatusCode::CONFLICT,
                CheckoutError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Order(err) => match err {
                OrderError::NotFound => StatusCode::NOT_FOUND,
                OrderError::MissingStatus | OrderError::ImmutableField(_) => {
                    StatusCode::BAD_REQUEST
                }
                OrderError::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                OrderError::ConcurrentModification => StatusCode::CONFLICT,
                OrderError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Serbian, user-facing message. Never exposes internal details.
    fn client_message(&self) -> String {
        const SERVER_ERROR: &str = "Došlo je do greške na serveru";

        match self {
            Self::Database(_) | Self::Internal(_) => SERVER_ERROR.to_owned(),
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) => "Unesite ispravnu email adresu".to_owned(),
                AuthError::InvalidPhone(_) => "Unesite ispravan broj telefona".to_owned(),
                AuthError::MissingField(field) => match *field {
                    "firstName" => "Ime je obavezno".to_owned(),
                    "lastName" => "Prezime je obavezno".to_owned(),
                    _ => "Obavezno polje nedostaje".to_owned(),
                },
                AuthError::InvalidCredentials | AuthError::UserNotFound => {
                    "Pogrešan email ili lozinka".to_owned()
                }
                AuthError::UserAlreadyExists => {
                    "Nalog sa ovom email adresom već postoji".to_owned()
                }
                AuthError::WeakPassword(_) => {
                    "Lozinka mora imati najmanje 8 karaktera".to_owned()
                }
                AuthError::TermsNotAccepted => {
                    "Morate prihvatiti uslove korišćenja".to_owned()
                }
                AuthError::Repository(_) | AuthError::PasswordHash => SERVER_ERROR.to_owned(),
            },
            Self::Cart(err) => match err {
                CartError::InvalidQuantity => "Količina mora biti najmanje 1".to_owned(),
                CartError::ProductNotFound => "Proizvod nije pronađen".to_owned(),
                CartError::NotInCart => "Proizvod nije u korpi".to_owned(),
                CartError::InsufficientStock { available } => {
                    format!("Nema dovoljno na stanju (dostupno: {available})")
                }
                CartError::UnknownPromo(_) => "Promo kod nije važeći".to_owned(),
                CartError::Repository(_) => SERVER_ERROR.to_owned(),
            },
            Self::Checkout(err) => match err {
                CheckoutError::Validation { message, .. } => (*message).to_owned(),
                CheckoutError::EmptyCart => "Korpa je prazna".to_owned(),
                CheckoutError::InsufficientStock { name, available } => {
                    format!("Nema dovoljno na stanju za {name} (dostupno: {available})")
                }
                CheckoutError::UnknownPromo(_) => "Promo kod nije važeći".to_owned(),
                CheckoutError::Repository(_) => SERVER_ERROR.to_owned(),
            },
            Self::Order(err) => match err {
                OrderError::NotFound => "Porudžbina nije pronađena".to_owned(),
                OrderError::MissingStatus => "Nedostaje status".to_owned(),
                OrderError::ImmutableField(_) => {
                    "Stavke i adresa porudžbine se ne mogu menjati".to_owned()
                }
                OrderError::InvalidTransition { from, to } => {
                    format!("Promena statusa iz '{from}' u '{to}' nije dozvoljena")
                }
                OrderError::ConcurrentModification => {
                    "Porudžbina je u međuvremenu izmenjena".to_owned()
                }
                OrderError::Repository(_) => SERVER_ERROR.to_owned(),
            },
            Self::NotFound(message) | Self::BadRequest(message) => message.clone(),
            Self::Unauthorized => "Niste prijavljeni".to_owned(),
            Self::Forbidden => "Nemate dozvolu za ovu akciju".to_owned(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        let body = Json(json!({ "message": self.client_message() }));

        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Proizvod nije pronađen".to_owned());
        assert_eq!(err.to_string(), "Not found: Proizvod nije pronađen");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::Cart(CartError::InsufficientStock { available: 2 }).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Order(OrderError::InvalidTransition {
                from: vitrina_core::OrderStatus::Completed,
                to: vitrina_core::OrderStatus::Pending,
            })
            .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_internal_details_do_not_leak() {
        let err = AppError::Internal("connection pool exhausted".to_owned());
        assert!(!err.client_message().contains("pool"));
        assert_eq!(err.client_message(), "Došlo je do greške na serveru");
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = AppError::Checkout(CheckoutError::Validation {
            field: "email",
            message: "Unesite ispravnu email adresu",
        });
        assert_eq!(err.client_message(), "Unesite ispravnu email adresu");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
