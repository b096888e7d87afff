//! Authentication route handlers.
//!
//! The session cookie is the only credential the SPA holds; bodies carry
//! user data and Serbian status messages, never tokens.

use axum::{Json, extract::State, http::StatusCode};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use vitrina_core::Gender;

use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::models::user::{User, UserView};
use crate::services::auth::{AuthService, ProfileData, RegisterData};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub accepted_terms: bool,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile update request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Put the user into the session after successful authentication.
async fn establish_session(session: &Session, user: &User) -> Result<()> {
    // Fresh session ID so an attacker-supplied cookie cannot be promoted
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    let current = CurrentUser {
        id: user.id,
        role: user.role,
        email: user.email.as_str().to_owned(),
    };

    set_current_user(session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    Ok(())
}

/// Create an account and log the user in.
#[instrument(skip(state, session, request))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let auth = AuthService::new(state.pool());

    let user = auth
        .register(RegisterData {
            email: &request.email,
            password: &request.password,
            first_name: &request.first_name,
            last_name: &request.last_name,
            phone: &request.phone,
            gender: request.gender,
            date_of_birth: request.date_of_birth,
            accepted_terms: request.accepted_terms,
        })
        .await?;

    establish_session(&session, &user).await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Nalog je uspešno kreiran",
            "user": UserView::from(&user),
        })),
    ))
}

/// Log in with email and password.
#[instrument(skip(state, session, request))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let auth = AuthService::new(state.pool());

    let user = auth.login(&request.email, &request.password).await?;

    establish_session(&session, &user).await?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(json!({
        "message": "Uspešno ste prijavljeni",
        "user": UserView::from(&user),
    })))
}

/// Log out: clear the user and destroy the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<Value>> {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    Ok(Json(json!({ "message": "Uspešno ste odjavljeni" })))
}

/// Session probe for the SPA.
///
/// Never fails: an absent or stale session reports `authenticated: false`.
#[instrument(skip(state, current))]
pub async fn check_auth(
    State(state): State<AppState>,
    OptionalAuth(current): OptionalAuth,
) -> Json<Value> {
    let Some(current) = current else {
        return Json(json!({ "authenticated": false }));
    };

    // Re-read the profile so the SPA sees fresh data, not login-time state.
    match AuthService::new(state.pool()).get_user(current.id).await {
        Ok(user) => Json(json!({
            "authenticated": true,
            "user": UserView::from(&user),
        })),
        Err(e) => {
            tracing::warn!(user_id = %current.id, "stale session: {e}");
            Json(json!({ "authenticated": false }))
        }
    }
}

/// Current user's profile.
#[instrument(skip(state, user))]
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let user = AuthService::new(state.pool()).get_user(user.id).await?;

    Ok(Json(json!({ "user": UserView::from(&user) })))
}

/// Update the current user's profile.
#[instrument(skip(state, user, request))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Value>> {
    let updated = AuthService::new(state.pool())
        .update_profile(
            user.id,
            ProfileData {
                first_name: &request.first_name,
                last_name: &request.last_name,
                phone: &request.phone,
                gender: request.gender,
                date_of_birth: request.date_of_birth,
            },
        )
        .await?;

    Ok(Json(json!({
        "message": "Profil je uspešno izmenjen",
        "user": UserView::from(&updated),
    })))
}
