//! services/api/src/web/middleware.rs
//!
//! Session guards for the member and admin route groups.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use membership_core::domain::MemberRecord;
use membership_core::ports::PortError;

use crate::web::state::AppState;

/// The resolved active member, attached to request extensions behind the guards.
#[derive(Clone)]
pub struct CurrentMember(pub MemberRecord);

/// Pulls the claimed member id out of the session cookie, if any.
fn claimed_member_id(headers: &HeaderMap) -> Option<Uuid> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    let claim = cookie_header
        .split(';')
        .find_map(|c| c.trim().strip_prefix("session="))?;
    Uuid::parse_str(claim).ok()
}

async fn resolve_member(state: &AppState, headers: &HeaderMap) -> Result<MemberRecord, StatusCode> {
    // 1. Parse the id claim from the cookie
    let claimed_id = claimed_member_id(headers).ok_or(StatusCode::UNAUTHORIZED)?;

    // 2. Check the claim against the mirrored session record. A stale or
    //    foreign claim is treated the same as no session.
    state.sessions.active(claimed_id).await.map_err(|e| {
        if !matches!(e, PortError::Unauthorized) {
            error!("Failed to resolve session: {:?}", e);
        }
        StatusCode::UNAUTHORIZED
    })
}

/// Requires an active session and inserts the member into request extensions.
pub async fn require_member(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let member = resolve_member(&state, req.headers()).await?;
    req.extensions_mut().insert(CurrentMember(member));
    Ok(next.run(req).await)
}

/// Requires an active session holding the administrator role.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let member = resolve_member(&state, req.headers()).await?;
    if !member.is_admin() {
        return Err(StatusCode::FORBIDDEN);
    }
    req.extensions_mut().insert(CurrentMember(member));
    Ok(next.run(req).await)
}
