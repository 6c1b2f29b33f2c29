//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for member registration, login, and logout.
//! The active session is the store's single mirrored record; the cookie
//! only carries the member-id claim that the guards check against it.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Duration;
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use membership_core::domain::{AuthProvider, MemberDetails, SocialLinks};
use membership_core::lifecycle::NewRegistration;
use membership_core::ports::PortError;

use crate::passwords;
use crate::web::protocol::MemberView;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

fn default_provider() -> AuthProvider {
    AuthProvider::Password
}

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "a valid email address is required"))]
    pub email: String,
    /// Required for password accounts; social-login accounts omit it.
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: Option<String>,
    #[serde(default = "default_provider")]
    #[schema(value_type = String)]
    pub auth_provider: AuthProvider,
    #[schema(value_type = Object)]
    pub details: MemberDetails,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub social_links: SocialLinks,
}

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "a valid email address is required"))]
    pub email: String,
    pub password: String,
}

fn session_cookie(member_id: Uuid) -> String {
    format!(
        "session={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        member_id,
        Duration::days(30).num_seconds()
    )
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/register - Submit a membership application and open a session
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Application recorded; the membership starts as PENDING", body = MemberView),
        (status = 400, description = "Invalid or incomplete application"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Shape checks before anything touches the store
    req.validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    // 2. Hash the password; the core only ever sees the PHC string
    let password_hash = match &req.password {
        Some(password) => Some(passwords::hash_password(password).map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to secure the password".to_string(),
            )
        })?),
        None => None,
    };

    // 3. Create the record; the duplicate scan and code issue happen inside
    let record = state
        .lifecycle
        .register(NewRegistration {
            email: req.email,
            auth_provider: req.auth_provider,
            password_hash,
            details: req.details,
            social_links: req.social_links,
        })
        .await
        .map_err(|e| match e {
            PortError::Conflict(_) => (
                StatusCode::CONFLICT,
                "This email is already registered. Please login.".to_string(),
            ),
            PortError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            other => {
                error!("Failed to register member: {:?}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to save the application".to_string(),
                )
            }
        })?;

    // 4. Promote the fresh record to the active session
    state.sessions.login(&record).await.map_err(|e| {
        error!("Failed to open session: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to open the session".to_string(),
        )
    })?;

    // 5. Hand the id claim to the client
    let cookie = session_cookie(record.id);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(MemberView::from(record)),
    ))
}

/// POST /auth/login - Login with an existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = MemberView),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Shape check
    req.validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    // 2. Look up the account
    let record = state
        .store
        .find_member_by_email(&req.email)
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
            )
        })?;

    // 3. Verify the password. Accounts provisioned by a social login carry
    //    no hash and cannot sign in this way.
    let valid = record
        .password_hash
        .as_deref()
        .map_or(false, |hash| passwords::verify_password(&req.password, hash));
    if !valid {
        return Err((
            StatusCode::UNAUTHORIZED,
            "Invalid email or password".to_string(),
        ));
    }

    // 4. Mirror the record into the session slot
    state.sessions.login(&record).await.map_err(|e| {
        error!("Failed to open session: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to open the session".to_string(),
        )
    })?;

    // 5. Return the claim cookie and the sanitized record
    let cookie = session_cookie(record.id);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MemberView::from(record)),
    ))
}

/// POST /auth/logout - Clear the active session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Clear the mirrored session record
    state.sessions.logout().await.map_err(|e| {
        error!("Failed to clear session: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to logout".to_string(),
        )
    })?;

    // 2. Expire the cookie
    let cookie = "session=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0";

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie.to_string())]))
}
