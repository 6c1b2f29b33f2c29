//! services/api/src/web/protocol.rs
//!
//! The request and response payloads shared across the REST handlers.
//! Views re-serialize domain records under the same camelCase contract the
//! records persist with; the password hash never leaves the service.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use membership_core::domain::{
    AuthProvider, MediaItem, MediaKind, MemberDetails, MemberDocuments, MemberRecord,
    MemberStatus, Role, SocialLinks,
};

//=========================================================================================
// Response Views
//=========================================================================================

/// A member record as handed to clients. Identical to the stored shape
/// except that the credential hash is dropped.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    pub id: Uuid,
    pub membership_code: String,
    pub email: String,
    #[schema(value_type = String)]
    pub auth_provider: AuthProvider,
    #[schema(value_type = String)]
    pub role: Role,
    #[schema(value_type = String)]
    pub status: MemberStatus,
    #[schema(value_type = Object)]
    pub social_links: SocialLinks,
    #[schema(value_type = Vec<Object>)]
    pub gallery: Vec<MediaItem>,
    #[schema(value_type = Object)]
    pub details: MemberDetails,
    #[schema(value_type = Object)]
    pub documents: MemberDocuments,
    pub registered_at: DateTime<Utc>,
}

impl From<MemberRecord> for MemberView {
    fn from(record: MemberRecord) -> Self {
        Self {
            id: record.id,
            membership_code: record.membership_code,
            email: record.email,
            auth_provider: record.auth_provider,
            role: record.role,
            status: record.status,
            social_links: record.social_links,
            gallery: record.gallery,
            details: record.details,
            documents: record.documents,
            registered_at: record.registered_at,
        }
    }
}

/// What the public code-verification endpoint reveals about a member.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificationView {
    pub full_name: String,
    pub membership_code: String,
    pub designation: String,
    pub department: String,
    pub district: String,
    pub state: String,
    pub photo_url: String,
    pub joining_date: NaiveDate,
}

impl From<MemberRecord> for VerificationView {
    fn from(record: MemberRecord) -> Self {
        Self {
            full_name: record.details.full_name,
            membership_code: record.membership_code,
            designation: record.details.designation,
            department: record.details.department,
            district: record.details.district,
            state: record.details.state,
            photo_url: record.details.photo_url,
            joining_date: record.details.joining_date,
        }
    }
}

/// One approved gallery item on the public wall, with its uploader's name.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItemView {
    pub id: Uuid,
    #[serde(rename = "type")]
    #[schema(value_type = String)]
    pub kind: MediaKind,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(rename = "timestamp")]
    pub uploaded_at: DateTime<Utc>,
    pub member_name: String,
}

/// The deep links a member needs for card verification and fee payment.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinksView {
    pub verification_qr_url: String,
    pub payment_qr_url: String,
    pub upi_link: String,
    pub payment_proof_link: String,
    pub fee_amount: u32,
}

/// A share-sheet payload: the card snapshot carried inline as base64 so a
/// client can hand it to a native share target, plus the text around it.
/// Clients without file sharing fall back to the download endpoint.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShareView {
    pub title: String,
    pub text: String,
    pub filename: String,
    pub content_type: String,
    pub data_base64: String,
}

//=========================================================================================
// Request Payloads
//=========================================================================================

fn default_media_kind() -> MediaKind {
    MediaKind::Image
}

/// Wholesale replacement of the editable profile sections. Identity changes
/// do not re-trigger review; clients warn the user before submitting.
#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    #[schema(value_type = Object)]
    pub details: MemberDetails,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub social_links: SocialLinks,
    /// Replaces the stored credential when present; absent keeps it.
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub new_password: Option<String>,
}

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaUploadRequest {
    #[serde(rename = "type", default = "default_media_kind")]
    #[schema(value_type = String)]
    pub kind: MediaKind,
    /// A data URL; media is stored inline like every other image.
    #[validate(length(min = 1, message = "media payload is required"))]
    pub url: String,
    pub caption: Option<String>,
}

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    #[validate(length(min = 1, message = "post content is required"))]
    pub content: String,
    pub image_url: Option<String>,
}
