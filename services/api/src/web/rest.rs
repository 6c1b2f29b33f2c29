//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification. Reads go straight to the
//! store; every mutation of the member collection goes through the
//! lifecycle so its rules hold everywhere.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    Extension,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;
use tracing::error;
use utoipa::{IntoParams, OpenApi};
use uuid::Uuid;
use validator::Validate;

use membership_core::domain::{MemberRecord, OrgAssets};
use membership_core::lifecycle::{MediaUpload, NewPost, ProfileEdit};
use membership_core::ports::PortError;

use crate::adapters::export::{export, ExportArtifact, ExportFormat};
use crate::links;
use crate::passwords;
use crate::render::{application_form_svg, id_card_svg, letter_svg};
use crate::web::middleware::CurrentMember;
use crate::web::protocol::{
    GalleryItemView, LinksView, MediaUploadRequest, MemberView, PostRequest, ProfileUpdateRequest,
    ShareView, VerificationView,
};
use crate::web::state::AppState;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::register_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        verify_handler,
        org_handler,
        gallery_handler,
        posts_handler,
        me_handler,
        update_me_handler,
        my_gallery_handler,
        my_links_handler,
        my_card_handler,
        my_letter_handler,
        my_application_handler,
        my_card_share_handler,
        list_members_handler,
        get_member_handler,
        update_member_handler,
        approve_member_handler,
        reject_member_handler,
        regenerate_letter_handler,
        approve_media_handler,
        update_org_handler,
        create_post_handler,
        member_card_handler,
        member_letter_handler,
        member_application_handler,
    ),
    components(schemas(
        crate::web::auth::RegisterRequest,
        crate::web::auth::LoginRequest,
        MemberView,
        VerificationView,
        GalleryItemView,
        LinksView,
        ShareView,
        ProfileUpdateRequest,
        MediaUploadRequest,
        PostRequest,
    )),
    tags(
        (name = "Membership API", description = "API endpoints for the membership registry, the review workflow, and document exports.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Query Parameters
//=========================================================================================

#[derive(Deserialize, IntoParams)]
pub struct ExportQuery {
    /// `png` (default) or `pdf`.
    pub format: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Case-insensitive needle matched against name, code, and district.
    pub search: Option<String>,
}

//=========================================================================================
// Shared Handler Plumbing
//=========================================================================================

/// Maps a port failure onto the HTTP status and the user-facing notice.
pub(crate) fn port_error_response(err: PortError) -> (StatusCode, String) {
    match err {
        PortError::NotFound(what) => (StatusCode::NOT_FOUND, format!("Not found: {what}")),
        PortError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        PortError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        PortError::Unauthorized => (StatusCode::UNAUTHORIZED, "Not authorized".to_string()),
        PortError::Persistence(msg) => {
            error!("Storage failure: {msg}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save your data. Please try again.".to_string(),
            )
        }
        PortError::Unexpected(msg) => {
            error!("Unexpected failure: {msg}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong. Please try again.".to_string(),
            )
        }
    }
}

fn parse_format(raw: Option<&str>) -> Result<ExportFormat, (StatusCode, String)> {
    match raw {
        None => Ok(ExportFormat::Png),
        Some(s) if s.eq_ignore_ascii_case("png") => Ok(ExportFormat::Png),
        Some(s) if s.eq_ignore_ascii_case("pdf") => Ok(ExportFormat::Pdf),
        Some(other) => Err((
            StatusCode::BAD_REQUEST,
            format!("'{other}' is not an export format; use png or pdf"),
        )),
    }
}

fn hash_optional(password: Option<&str>) -> Result<Option<String>, (StatusCode, String)> {
    match password {
        Some(plain) => passwords::hash_password(plain).map(Some).map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to secure the password".to_string(),
            )
        }),
        None => Ok(None),
    }
}

/// Only approved memberships produce artifacts; everyone else is refused
/// before any rendering work happens.
fn ensure_exportable(record: &MemberRecord) -> Result<(), (StatusCode, String)> {
    if record.is_approved() {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            "Membership is not approved yet.".to_string(),
        ))
    }
}

enum Surface {
    Card,
    Letter,
    Application,
}

async fn export_surface(
    state: &AppState,
    record: &MemberRecord,
    surface: Surface,
    format: ExportFormat,
) -> Result<ExportArtifact, (StatusCode, String)> {
    ensure_exportable(record)?;

    let assets = state.store.org_assets().await.map_err(port_error_response)?;
    let org = &state.config.org;
    let (svg, title, stem) = match surface {
        Surface::Card => (
            id_card_svg(record, &assets, org),
            format!("{} Identity Card", org.name),
            format!("{}-card", record.membership_code),
        ),
        Surface::Letter => (
            letter_svg(record, &assets, org),
            format!("{} Appointment Letter", org.name),
            format!("{}-appointment-letter", record.membership_code),
        ),
        Surface::Application => (
            application_form_svg(record, org),
            format!("{} Membership Application", org.name),
            format!("{}-application", record.membership_code),
        ),
    };

    export(&svg, &title, &stem, format).map_err(|e| {
        error!("Failed to export document: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to prepare the document. Please try again.".to_string(),
        )
    })
}

fn artifact_response(artifact: ExportArtifact) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.filename),
            ),
        ],
        artifact.bytes,
    )
}

const PUBLIC_GALLERY_LIMIT: usize = 9;

/// Flattens approved gallery items across all members, newest first,
/// capped at the public wall size.
fn public_gallery(members: &[MemberRecord]) -> Vec<GalleryItemView> {
    let mut items: Vec<GalleryItemView> = members
        .iter()
        .flat_map(|member| {
            member
                .gallery
                .iter()
                .filter(|item| item.approved)
                .map(|item| GalleryItemView {
                    id: item.id,
                    kind: item.kind,
                    url: item.url.clone(),
                    caption: item.caption.clone(),
                    uploaded_at: item.uploaded_at,
                    member_name: member.details.full_name.clone(),
                })
        })
        .collect();
    items.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
    items.truncate(PUBLIC_GALLERY_LIMIT);
    items
}

/// Case-insensitive match against the fields the admin roster searches on.
fn matches_search(record: &MemberRecord, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    record.details.full_name.to_lowercase().contains(&needle)
        || record.membership_code.to_lowercase().contains(&needle)
        || record.details.district.to_lowercase().contains(&needle)
}

//=========================================================================================
// Public Handlers
//=========================================================================================

/// Look up a membership code printed on a card.
#[utoipa::path(
    get,
    path = "/verify/{code}",
    params(("code" = String, Path, description = "The membership code, case-insensitive.")),
    responses(
        (status = 200, description = "The code belongs to an approved member", body = VerificationView),
        (status = 404, description = "No approved member holds this code")
    )
)]
pub async fn verify_handler(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let not_found = || {
        (
            StatusCode::NOT_FOUND,
            "No approved member holds this code.".to_string(),
        )
    };

    let record = state
        .store
        .find_member_by_code(&code)
        .await
        .map_err(|_| not_found())?;

    // A pending or rejected card must be indistinguishable from an
    // unknown one.
    if !record.is_approved() {
        return Err(not_found());
    }

    Ok(Json(VerificationView::from(record)))
}

/// The public organization assets: logos, card theme, social links.
#[utoipa::path(
    get,
    path = "/org",
    responses((status = 200, description = "The organization asset bundle"))
)]
pub async fn org_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let assets = state.store.org_assets().await.map_err(port_error_response)?;
    Ok(Json(assets))
}

/// The public media wall: approved gallery items across all members.
#[utoipa::path(
    get,
    path = "/gallery",
    responses(
        (status = 200, description = "Approved gallery items, newest first", body = Vec<GalleryItemView>)
    )
)]
pub async fn gallery_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let members = state.store.list_members().await.map_err(port_error_response)?;
    Ok(Json(public_gallery(&members)))
}

/// Published posts, most recent first.
#[utoipa::path(
    get,
    path = "/posts",
    responses((status = 200, description = "Posts, most recent first"))
)]
pub async fn posts_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let posts = state.store.list_posts().await.map_err(port_error_response)?;
    Ok(Json(posts))
}

//=========================================================================================
// Member Handlers (session required)
//=========================================================================================

/// The active member's own record.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "The active member", body = MemberView),
        (status = 401, description = "No active session")
    )
)]
pub async fn me_handler(
    Extension(CurrentMember(member)): Extension<CurrentMember>,
) -> Json<MemberView> {
    Json(MemberView::from(member))
}

/// Self-service profile edit.
#[utoipa::path(
    put,
    path = "/me",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "The updated record", body = MemberView),
        (status = 400, description = "Invalid update"),
        (status = 401, description = "No active session")
    )
)]
pub async fn update_me_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentMember(member)): Extension<CurrentMember>,
    Json(req): Json<ProfileUpdateRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Shape checks
    req.validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    // 2. Hash the replacement password, when one was supplied
    let new_password_hash = hash_optional(req.new_password.as_deref())?;

    // 3. Apply the edit; the store refreshes the session mirror itself
    let record = state
        .lifecycle
        .edit_profile(
            member.id,
            ProfileEdit {
                details: req.details,
                social_links: req.social_links,
                new_password_hash,
            },
        )
        .await
        .map_err(port_error_response)?;

    Ok(Json(MemberView::from(record)))
}

/// Upload a gallery item; it stays hidden until an administrator approves it.
#[utoipa::path(
    post,
    path = "/me/gallery",
    request_body = MediaUploadRequest,
    responses(
        (status = 201, description = "The record with the new unapproved item", body = MemberView),
        (status = 400, description = "Invalid upload"),
        (status = 401, description = "No active session")
    )
)]
pub async fn my_gallery_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentMember(member)): Extension<CurrentMember>,
    Json(req): Json<MediaUploadRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    req.validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let record = state
        .lifecycle
        .add_media(
            member.id,
            MediaUpload {
                kind: req.kind,
                url: req.url,
                caption: req.caption,
            },
        )
        .await
        .map_err(port_error_response)?;

    Ok((StatusCode::CREATED, Json(MemberView::from(record))))
}

/// The verification QR and payment links for the active member.
#[utoipa::path(
    get,
    path = "/me/links",
    responses(
        (status = 200, description = "Deep links for verification and fee payment", body = LinksView),
        (status = 401, description = "No active session")
    )
)]
pub async fn my_links_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentMember(member)): Extension<CurrentMember>,
) -> Json<LinksView> {
    let config = &state.config;
    Json(LinksView {
        verification_qr_url: links::verification_qr_url(
            &config.qr_api_base,
            &config.org.name,
            &member,
        ),
        payment_qr_url: links::payment_qr_url(&config.qr_api_base, &config.payment, &config.org.name),
        upi_link: links::upi_link(&config.payment, &config.org.name),
        payment_proof_link: links::payment_proof_link(&config.payment, &member),
        fee_amount: config.payment.fee_amount,
    })
}

/// Download the active member's identity card.
#[utoipa::path(
    get,
    path = "/me/card",
    params(ExportQuery),
    responses(
        (status = 200, description = "The card artifact as an attachment"),
        (status = 401, description = "No active session"),
        (status = 403, description = "Membership not approved")
    )
)]
pub async fn my_card_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentMember(member)): Extension<CurrentMember>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let format = parse_format(query.format.as_deref())?;
    let artifact = export_surface(&state, &member, Surface::Card, format).await?;
    Ok(artifact_response(artifact))
}

/// Download the active member's appointment letter.
#[utoipa::path(
    get,
    path = "/me/letter",
    params(ExportQuery),
    responses(
        (status = 200, description = "The letter artifact as an attachment"),
        (status = 401, description = "No active session"),
        (status = 403, description = "Membership not approved")
    )
)]
pub async fn my_letter_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentMember(member)): Extension<CurrentMember>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let format = parse_format(query.format.as_deref())?;
    let artifact = export_surface(&state, &member, Surface::Letter, format).await?;
    Ok(artifact_response(artifact))
}

/// Download the active member's application form.
#[utoipa::path(
    get,
    path = "/me/application",
    params(ExportQuery),
    responses(
        (status = 200, description = "The application artifact as an attachment"),
        (status = 401, description = "No active session"),
        (status = 403, description = "Membership not approved")
    )
)]
pub async fn my_application_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentMember(member)): Extension<CurrentMember>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let format = parse_format(query.format.as_deref())?;
    let artifact = export_surface(&state, &member, Surface::Application, format).await?;
    Ok(artifact_response(artifact))
}

/// The card snapshot packaged for a native share sheet.
#[utoipa::path(
    post,
    path = "/me/card/share",
    responses(
        (status = 200, description = "The card PNG base64-wrapped with share metadata", body = ShareView),
        (status = 401, description = "No active session"),
        (status = 403, description = "Membership not approved")
    )
)]
pub async fn my_card_share_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentMember(member)): Extension<CurrentMember>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let artifact = export_surface(&state, &member, Surface::Card, ExportFormat::Png).await?;
    Ok(Json(ShareView {
        title: format!("{} Identity Card", state.config.org.name),
        text: format!(
            "Membership card for {} ({})",
            member.details.full_name, member.membership_code
        ),
        filename: artifact.filename,
        content_type: artifact.content_type.to_string(),
        data_base64: BASE64.encode(&artifact.bytes),
    }))
}

//=========================================================================================
// Admin Handlers (session + administrator role)
//=========================================================================================

/// The member roster, optionally filtered. Administrators are excluded.
#[utoipa::path(
    get,
    path = "/members",
    params(SearchQuery),
    responses(
        (status = 200, description = "Member records matching the filter", body = Vec<MemberView>),
        (status = 401, description = "No active session"),
        (status = 403, description = "Administrator role required")
    )
)]
pub async fn list_members_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let members = state.store.list_members().await.map_err(port_error_response)?;
    let views: Vec<MemberView> = members
        .into_iter()
        .filter(|m| !m.is_admin())
        .filter(|m| {
            query
                .search
                .as_deref()
                .map_or(true, |needle| matches_search(m, needle))
        })
        .map(MemberView::from)
        .collect();
    Ok(Json(views))
}

/// One member record by id.
#[utoipa::path(
    get,
    path = "/members/{id}",
    params(("id" = Uuid, Path, description = "The member record id.")),
    responses(
        (status = 200, description = "The member record", body = MemberView),
        (status = 404, description = "No such member")
    )
)]
pub async fn get_member_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let record = state.store.find_member(id).await.map_err(port_error_response)?;
    Ok(Json(MemberView::from(record)))
}

/// Administrative edit of any member's profile.
#[utoipa::path(
    put,
    path = "/members/{id}",
    params(("id" = Uuid, Path, description = "The member record id.")),
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "The updated record", body = MemberView),
        (status = 400, description = "Invalid update"),
        (status = 404, description = "No such member")
    )
)]
pub async fn update_member_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ProfileUpdateRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    req.validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let new_password_hash = hash_optional(req.new_password.as_deref())?;

    let record = state
        .lifecycle
        .edit_profile(
            id,
            ProfileEdit {
                details: req.details,
                social_links: req.social_links,
                new_password_hash,
            },
        )
        .await
        .map_err(port_error_response)?;

    Ok(Json(MemberView::from(record)))
}

/// Approve a pending application. The appointment letter is written on the
/// first approval only.
#[utoipa::path(
    post,
    path = "/members/{id}/approve",
    params(("id" = Uuid, Path, description = "The member record id.")),
    responses(
        (status = 200, description = "The approved record", body = MemberView),
        (status = 404, description = "No such member")
    )
)]
pub async fn approve_member_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let record = state.lifecycle.approve(id).await.map_err(port_error_response)?;
    Ok(Json(MemberView::from(record)))
}

/// Reject an application. Any existing letter text is left in place.
#[utoipa::path(
    post,
    path = "/members/{id}/reject",
    params(("id" = Uuid, Path, description = "The member record id.")),
    responses(
        (status = 200, description = "The rejected record", body = MemberView),
        (status = 404, description = "No such member")
    )
)]
pub async fn reject_member_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let record = state.lifecycle.reject(id).await.map_err(port_error_response)?;
    Ok(Json(MemberView::from(record)))
}

/// Rewrite the appointment letter, replacing any existing content.
#[utoipa::path(
    post,
    path = "/members/{id}/letter",
    params(("id" = Uuid, Path, description = "The member record id.")),
    responses(
        (status = 200, description = "The record with the fresh letter", body = MemberView),
        (status = 404, description = "No such member")
    )
)]
pub async fn regenerate_letter_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let record = state
        .lifecycle
        .regenerate_letter(id)
        .await
        .map_err(port_error_response)?;
    Ok(Json(MemberView::from(record)))
}

/// Release one gallery item to the public wall.
#[utoipa::path(
    post,
    path = "/members/{id}/gallery/{media_id}/approve",
    params(
        ("id" = Uuid, Path, description = "The member record id."),
        ("media_id" = Uuid, Path, description = "The gallery item id.")
    ),
    responses(
        (status = 200, description = "The record with the item approved", body = MemberView),
        (status = 404, description = "No such member or item")
    )
)]
pub async fn approve_media_handler(
    State(state): State<Arc<AppState>>,
    Path((id, media_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let record = state
        .lifecycle
        .approve_media(id, media_id)
        .await
        .map_err(port_error_response)?;
    Ok(Json(MemberView::from(record)))
}

/// Replace the organization asset bundle.
#[utoipa::path(
    put,
    path = "/org",
    responses(
        (status = 200, description = "The stored asset bundle"),
        (status = 401, description = "No active session"),
        (status = 403, description = "Administrator role required")
    )
)]
pub async fn update_org_handler(
    State(state): State<Arc<AppState>>,
    Json(assets): Json<OrgAssets>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .store
        .save_org_assets(&assets)
        .await
        .map_err(port_error_response)?;
    Ok(Json(assets))
}

/// Publish a post under the acting administrator's name.
#[utoipa::path(
    post,
    path = "/posts",
    request_body = PostRequest,
    responses(
        (status = 201, description = "The published post"),
        (status = 400, description = "Invalid post"),
        (status = 403, description = "Administrator role required")
    )
)]
pub async fn create_post_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentMember(admin)): Extension<CurrentMember>,
    Json(req): Json<PostRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    req.validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let post = state
        .lifecycle
        .publish_post(NewPost {
            content: req.content,
            image_url: req.image_url,
            author: admin.details.full_name,
        })
        .await
        .map_err(port_error_response)?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// Download any member's identity card.
#[utoipa::path(
    get,
    path = "/members/{id}/card",
    params(("id" = Uuid, Path, description = "The member record id."), ExportQuery),
    responses(
        (status = 200, description = "The card artifact as an attachment"),
        (status = 403, description = "Membership not approved"),
        (status = 404, description = "No such member")
    )
)]
pub async fn member_card_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let format = parse_format(query.format.as_deref())?;
    let record = state.store.find_member(id).await.map_err(port_error_response)?;
    let artifact = export_surface(&state, &record, Surface::Card, format).await?;
    Ok(artifact_response(artifact))
}

/// Download any member's appointment letter.
#[utoipa::path(
    get,
    path = "/members/{id}/letter",
    params(("id" = Uuid, Path, description = "The member record id."), ExportQuery),
    responses(
        (status = 200, description = "The letter artifact as an attachment"),
        (status = 403, description = "Membership not approved"),
        (status = 404, description = "No such member")
    )
)]
pub async fn member_letter_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let format = parse_format(query.format.as_deref())?;
    let record = state.store.find_member(id).await.map_err(port_error_response)?;
    let artifact = export_surface(&state, &record, Surface::Letter, format).await?;
    Ok(artifact_response(artifact))
}

/// Download any member's application form.
#[utoipa::path(
    get,
    path = "/members/{id}/application",
    params(("id" = Uuid, Path, description = "The member record id."), ExportQuery),
    responses(
        (status = 200, description = "The application artifact as an attachment"),
        (status = 403, description = "Membership not approved"),
        (status = 404, description = "No such member")
    )
)]
pub async fn member_application_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let format = parse_format(query.format.as_deref())?;
    let record = state.store.find_member(id).await.map_err(port_error_response)?;
    let artifact = export_surface(&state, &record, Surface::Application, format).await?;
    Ok(artifact_response(artifact))
}
