//! crates/membership_core/src/domain.rs
//!
//! Defines the core data structures for the application.
//! These structs double as the persisted layout: the record store writes
//! them to the slot files exactly as serialized here, so the serde shape
//! (camelCase keys, upper-case status/role values) is part of the contract.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Member,
    Administrator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Password,
    Google,
    Facebook,
}

/// One applicant or administrator. The central persisted entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub id: Uuid,
    /// Human-facing code of the form `PREFIX-YEAR-NNNNN`, issued at creation.
    pub membership_code: String,
    pub email: String,
    pub auth_provider: AuthProvider,
    /// Argon2 PHC string. Absent for federated-identity records.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub password_hash: Option<String>,
    pub role: Role,
    pub status: MemberStatus,
    #[serde(default)]
    pub social_links: SocialLinks,
    #[serde(default)]
    pub gallery: Vec<MediaItem>,
    pub details: MemberDetails,
    #[serde(default)]
    pub documents: MemberDocuments,
    pub registered_at: DateTime<Utc>,
}

impl MemberRecord {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Administrator
    }

    pub fn is_approved(&self) -> bool {
        self.status == MemberStatus::Approved
    }
}

/// Personal, address, and organizational fields captured at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetails {
    pub full_name: String,
    pub father_name: String,
    pub dob: NaiveDate,
    pub mobile: String,
    pub village: String,
    pub post: String,
    pub block: String,
    pub district: String,
    pub state: String,
    pub department: String,
    pub designation: String,
    /// Profile photo as a data URL.
    pub photo_url: String,
    // Identity document faces, also data URLs.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id_front_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id_back_url: Option<String>,
    pub joining_date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub instagram: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// A gallery entry uploaded by a member; hidden from the public
/// gallery until an administrator approves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Data URL of the media payload.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub caption: Option<String>,
    #[serde(rename = "timestamp")]
    pub uploaded_at: DateTime<Utc>,
    pub approved: bool,
}

/// Generated appointment-letter state. Empty until approval.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDocuments {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub joining_letter_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub generated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CardTheme {
    #[default]
    Patriotic,
    Blue,
    Dark,
    Minimal,
    Red,
}

/// Singleton record holding the organization's branding assets.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrgAssets {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stamp_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub signature_url: Option<String>,
    #[serde(default)]
    pub card_theme: CardTheme,
    #[serde(default)]
    pub social_links: OrgSocialLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrgSocialLinks {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub youtube: Option<String>,
}

/// A news post published by the administrator, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image_url: Option<String>,
    pub author: String,
    #[serde(rename = "timestamp")]
    pub posted_at: DateTime<Utc>,
}

/// Issues a membership code: `PREFIX-<current year>-<random 5-digit serial>`.
/// Uniqueness is probabilistic; collisions are not checked.
pub fn new_membership_code(prefix: &str) -> String {
    let year = Utc::now().year();
    let serial: u32 = rand::thread_rng().gen_range(10_000..=99_999);
    format!("{prefix}-{year}-{serial}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_code_shape() {
        let code = new_membership_code("CSM");
        let parts: Vec<&str> = code.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "CSM");
        assert_eq!(parts[1], Utc::now().year().to_string());
        let serial: u32 = parts[2].parse().unwrap();
        assert!((10_000..=99_999).contains(&serial));
        assert_eq!(parts[2].len(), 5);
    }

    #[test]
    fn test_member_record_serializes_camel_case() {
        let record = MemberRecord {
            id: Uuid::new_v4(),
            membership_code: "CSM-2026-12345".into(),
            email: "a@b.c".into(),
            auth_provider: AuthProvider::Password,
            password_hash: None,
            role: Role::Member,
            status: MemberStatus::Pending,
            social_links: SocialLinks::default(),
            gallery: vec![],
            details: MemberDetails {
                full_name: "Asha Verma".into(),
                father_name: "R. Verma".into(),
                dob: NaiveDate::from_ymd_opt(1994, 4, 2).unwrap(),
                mobile: "9000000001".into(),
                village: "Rampur".into(),
                post: "Rampur".into(),
                block: "Sadar".into(),
                district: "Budaun".into(),
                state: "Uttar Pradesh".into(),
                department: "Outreach".into(),
                designation: "Field Officer".into(),
                photo_url: "data:image/png;base64,AAAA".into(),
                id_front_url: None,
                id_back_url: None,
                joining_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            },
            documents: MemberDocuments::default(),
            registered_at: Utc::now(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["membershipCode"], "CSM-2026-12345");
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["role"], "MEMBER");
        assert_eq!(json["authProvider"], "password");
        assert_eq!(json["details"]["fullName"], "Asha Verma");
        // The hash must never leak into serialized output when unset.
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn test_media_item_uses_stored_field_names() {
        let item = MediaItem {
            id: Uuid::new_v4(),
            kind: MediaKind::Video,
            url: "data:video/mp4;base64,AAAA".into(),
            caption: None,
            uploaded_at: Utc::now(),
            approved: false,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "video");
        assert!(json.get("timestamp").is_some());
        assert!(json.get("uploadedAt").is_none());
    }

    #[test]
    fn test_org_assets_default_from_empty_object() {
        let assets: OrgAssets = serde_json::from_str("{}").unwrap();
        assert!(assets.logo_url.is_none());
        assert_eq!(assets.card_theme, CardTheme::Patriotic);
    }
}
