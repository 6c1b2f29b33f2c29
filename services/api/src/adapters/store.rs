//! services/api/src/adapters/store.rs
//!
//! This module contains the slot-file store adapter, the concrete
//! implementation of the `RecordStore` port from the `core` crate. Each slot
//! is one JSON file in the data directory; every write rewrites the whole
//! slot. One service process owns the data directory; in-process writers are
//! serialized by a mutex, cross-process writers are not coordinated.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use membership_core::domain::{
    AuthProvider, MemberDetails, MemberDocuments, MemberRecord, MemberStatus, OrgAssets, Post,
    Role, SocialLinks,
};
use membership_core::ports::{PortError, PortResult, RecordStore};

use crate::config::OrgProfile;
use crate::passwords;

//=========================================================================================
// Slot Names
//=========================================================================================

const MEMBERS_SLOT: &str = "members.json";
const ORG_ASSETS_SLOT: &str = "org_assets.json";
const POSTS_SLOT: &str = "posts.json";
const SESSION_SLOT: &str = "session.json";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A file-backed store adapter that implements the `RecordStore` port.
pub struct JsonStoreAdapter {
    data_dir: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonStoreAdapter {
    /// Creates the adapter, making sure the data directory exists.
    pub async fn new(data_dir: impl Into<PathBuf>) -> PortResult<Self> {
        let data_dir = data_dir.into();
        tokio::fs::create_dir_all(&data_dir).await.map_err(|e| {
            PortError::Persistence(format!(
                "could not create data directory {}: {e}",
                data_dir.display()
            ))
        })?;
        Ok(Self {
            data_dir,
            write_lock: Mutex::new(()),
        })
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.data_dir.join(slot)
    }

    /// Reads and deserializes a slot. An absent file or unparsable content
    /// yields the empty value; read failures never surface to callers.
    async fn read_slot<T: DeserializeOwned + Default>(&self, slot: &str) -> T {
        let path = self.slot_path(slot);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
            Err(e) => {
                warn!("Reading slot {slot} failed, treating as empty: {e}");
                return T::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                warn!("Slot {slot} holds unparsable JSON, treating as empty: {e}");
                T::default()
            }
        }
    }

    /// Serializes and rewrites a slot in full. Unlike reads, write failures
    /// are surfaced so the web layer can raise a blocking notice.
    async fn write_slot<T: Serialize>(&self, slot: &str, value: &T) -> PortResult<()> {
        let json = serde_json::to_string_pretty(value).map_err(|e| {
            PortError::Persistence(format!("could not serialize slot {slot}: {e}"))
        })?;
        tokio::fs::write(self.slot_path(slot), json).await.map_err(|e| {
            error!("Writing slot {slot} failed: {e}");
            PortError::Persistence(format!("could not write slot {slot}: {e}"))
        })
    }

    /// Startup reconciliation of the sole administrator account.
    ///
    /// Seeds the record on first run. On later runs it forces the stored
    /// email back to the configured value and re-hashes the password whenever
    /// the stored hash no longer verifies, so tampering with the member slot
    /// cannot lock the administrator out. Runs once at process
    /// initialization, never on reads; rotating the credentials is a
    /// configuration change followed by a restart.
    pub async fn reconcile_admin(
        &self,
        org: &OrgProfile,
        admin_email: &str,
        admin_password: &str,
    ) -> PortResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut members: Vec<MemberRecord> = self.read_slot(MEMBERS_SLOT).await;

        match members.iter_mut().find(|m| m.is_admin()) {
            Some(admin) => {
                let mut drifted = false;
                if !admin.email.eq_ignore_ascii_case(admin_email) {
                    admin.email = admin_email.to_string();
                    drifted = true;
                }
                let hash_matches = admin
                    .password_hash
                    .as_deref()
                    .map(|hash| passwords::verify_password(admin_password, hash))
                    .unwrap_or(false);
                if !hash_matches {
                    admin.password_hash = Some(passwords::hash_password(admin_password)?);
                    drifted = true;
                }
                if drifted {
                    warn!("Administrator record drifted from configuration, rewriting it");
                    self.write_slot(MEMBERS_SLOT, &members).await?;
                }
            }
            None => {
                info!("No administrator record found, seeding one");
                members.insert(0, admin_record(org, admin_email, admin_password)?);
                self.write_slot(MEMBERS_SLOT, &members).await?;
            }
        }
        Ok(())
    }
}

/// The fixed administrator record, created when the member slot has none.
fn admin_record(
    org: &OrgProfile,
    admin_email: &str,
    admin_password: &str,
) -> PortResult<MemberRecord> {
    Ok(MemberRecord {
        id: Uuid::new_v4(),
        membership_code: format!("{}-ADMIN-001", org.code_prefix),
        email: admin_email.to_string(),
        auth_provider: AuthProvider::Password,
        password_hash: Some(passwords::hash_password(admin_password)?),
        role: Role::Administrator,
        status: MemberStatus::Approved,
        social_links: SocialLinks::default(),
        gallery: Vec::new(),
        details: MemberDetails {
            full_name: "System Administrator".to_string(),
            father_name: "N/A".to_string(),
            dob: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or_default(),
            mobile: org.contact_phone.clone(),
            village: "Naushera".to_string(),
            post: "Medical College".to_string(),
            block: "Sadar".to_string(),
            district: "Budaun".to_string(),
            state: "Uttar Pradesh".to_string(),
            department: "IT Cell".to_string(),
            designation: "Super Admin".to_string(),
            photo_url: String::new(),
            id_front_url: None,
            id_back_url: None,
            joining_date: Utc::now().date_naive(),
        },
        documents: MemberDocuments::default(),
        registered_at: Utc::now(),
    })
}

//=========================================================================================
// `RecordStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl RecordStore for JsonStoreAdapter {
    async fn list_members(&self) -> PortResult<Vec<MemberRecord>> {
        Ok(self.read_slot(MEMBERS_SLOT).await)
    }

    async fn find_member(&self, id: Uuid) -> PortResult<MemberRecord> {
        let members: Vec<MemberRecord> = self.read_slot(MEMBERS_SLOT).await;
        members
            .into_iter()
            .find(|m| m.id == id)
            .ok_or_else(|| PortError::NotFound(format!("member {id}")))
    }

    async fn find_member_by_email(&self, email: &str) -> PortResult<MemberRecord> {
        let members: Vec<MemberRecord> = self.read_slot(MEMBERS_SLOT).await;
        members
            .into_iter()
            .find(|m| m.email.eq_ignore_ascii_case(email))
            .ok_or_else(|| PortError::NotFound(format!("member with email {email}")))
    }

    async fn find_member_by_code(&self, code: &str) -> PortResult<MemberRecord> {
        let needle = code.trim();
        let members: Vec<MemberRecord> = self.read_slot(MEMBERS_SLOT).await;
        members
            .into_iter()
            .find(|m| m.membership_code.eq_ignore_ascii_case(needle))
            .ok_or_else(|| PortError::NotFound(format!("member with code {needle}")))
    }

    async fn upsert_member(&self, record: &MemberRecord) -> PortResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut members: Vec<MemberRecord> = self.read_slot(MEMBERS_SLOT).await;
        match members.iter_mut().find(|m| m.id == record.id) {
            Some(slot) => *slot = record.clone(),
            None => members.push(record.clone()),
        }
        self.write_slot(MEMBERS_SLOT, &members).await?;

        // Keep the session mirror fresh when it points at this record.
        let session: Option<MemberRecord> = self.read_slot(SESSION_SLOT).await;
        if session.map_or(false, |s| s.id == record.id) {
            self.write_slot(SESSION_SLOT, &Some(record)).await?;
        }
        Ok(())
    }

    async fn org_assets(&self) -> PortResult<OrgAssets> {
        Ok(self.read_slot(ORG_ASSETS_SLOT).await)
    }

    async fn save_org_assets(&self, assets: &OrgAssets) -> PortResult<()> {
        self.write_slot(ORG_ASSETS_SLOT, assets).await
    }

    async fn list_posts(&self) -> PortResult<Vec<Post>> {
        Ok(self.read_slot(POSTS_SLOT).await)
    }

    async fn add_post(&self, post: &Post) -> PortResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut posts: Vec<Post> = self.read_slot(POSTS_SLOT).await;
        posts.insert(0, post.clone());
        self.write_slot(POSTS_SLOT, &posts).await
    }

    async fn read_session(&self) -> PortResult<Option<MemberRecord>> {
        Ok(self.read_slot(SESSION_SLOT).await)
    }

    async fn write_session(&self, record: Option<&MemberRecord>) -> PortResult<()> {
        self.write_slot(SESSION_SLOT, &record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;
    use membership_core::domain::{MediaItem, MediaKind};
    use tempfile::TempDir;

    async fn store() -> (TempDir, JsonStoreAdapter) {
        let dir = TempDir::new().unwrap();
        let adapter = JsonStoreAdapter::new(dir.path()).await.unwrap();
        (dir, adapter)
    }

    #[tokio::test]
    async fn test_missing_slots_read_as_empty() {
        let (_dir, adapter) = store().await;
        assert!(adapter.list_members().await.unwrap().is_empty());
        assert!(adapter.list_posts().await.unwrap().is_empty());
        assert!(adapter.read_session().await.unwrap().is_none());
        assert!(adapter.org_assets().await.unwrap().logo_url.is_none());
    }

    #[tokio::test]
    async fn test_round_trip_preserves_every_field() {
        let (_dir, adapter) = store().await;
        let mut record = testutil::member();
        record.social_links.facebook = Some("https://facebook.com/asha".to_string());
        record.gallery.push(MediaItem {
            id: Uuid::new_v4(),
            kind: MediaKind::Image,
            url: "data:image/png;base64,BBBB".to_string(),
            caption: Some("Community drive".to_string()),
            uploaded_at: Utc::now(),
            approved: true,
        });
        record.documents.joining_letter_content = Some("Dear Asha,".to_string());
        record.documents.generated_at = Some(Utc::now());

        adapter.upsert_member(&record).await.unwrap();

        let listed = adapter.list_members().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(
            serde_json::to_value(&listed[0]).unwrap(),
            serde_json::to_value(&record).unwrap()
        );
    }

    #[tokio::test]
    async fn test_corrupt_slot_reads_as_empty_then_recovers() {
        let (dir, adapter) = store().await;
        std::fs::write(dir.path().join(MEMBERS_SLOT), "{{not json").unwrap();

        assert!(adapter.list_members().await.unwrap().is_empty());

        // A subsequent write replaces the corrupt slot wholesale.
        let record = testutil::member();
        adapter.upsert_member(&record).await.unwrap();
        assert_eq!(adapter.list_members().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_replaces_in_place() {
        let (_dir, adapter) = store().await;
        let mut first = testutil::member();
        let mut second = testutil::member();
        second.id = Uuid::new_v4();
        second.email = "second@example.com".to_string();
        adapter.upsert_member(&first).await.unwrap();
        adapter.upsert_member(&second).await.unwrap();

        first.details.mobile = "9222222222".to_string();
        adapter.upsert_member(&first).await.unwrap();

        let listed = adapter.list_members().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[0].details.mobile, "9222222222");
    }

    #[tokio::test]
    async fn test_upsert_refreshes_session_mirror() {
        let (_dir, adapter) = store().await;
        let mut record = testutil::member();
        adapter.upsert_member(&record).await.unwrap();
        adapter.write_session(Some(&record)).await.unwrap();

        record.details.full_name = "Asha Sharma".to_string();
        adapter.upsert_member(&record).await.unwrap();

        let mirrored = adapter.read_session().await.unwrap().unwrap();
        assert_eq!(mirrored.details.full_name, "Asha Sharma");

        // Saving an unrelated record leaves the mirror alone.
        let mut other = testutil::member();
        other.id = Uuid::new_v4();
        other.email = "other@example.com".to_string();
        adapter.upsert_member(&other).await.unwrap();
        assert_eq!(adapter.read_session().await.unwrap().unwrap().id, record.id);
    }

    #[tokio::test]
    async fn test_session_slot_clears_to_null() {
        let (dir, adapter) = store().await;
        let record = testutil::member();
        adapter.write_session(Some(&record)).await.unwrap();
        adapter.write_session(None).await.unwrap();

        assert!(adapter.read_session().await.unwrap().is_none());
        let raw = std::fs::read_to_string(dir.path().join(SESSION_SLOT)).unwrap();
        assert_eq!(raw.trim(), "null");
    }

    #[tokio::test]
    async fn test_posts_persist_newest_first() {
        let (_dir, adapter) = store().await;
        let first = Post {
            id: Uuid::new_v4(),
            content: "First".to_string(),
            image_url: None,
            author: "System Administrator".to_string(),
            posted_at: Utc::now(),
        };
        let second = Post {
            id: Uuid::new_v4(),
            content: "Second".to_string(),
            ..first.clone()
        };
        adapter.add_post(&first).await.unwrap();
        adapter.add_post(&second).await.unwrap();

        let posts = adapter.list_posts().await.unwrap();
        assert_eq!(posts[0].content, "Second");
        assert_eq!(posts[1].content, "First");
    }

    #[tokio::test]
    async fn test_find_by_code_ignores_case_and_whitespace() {
        let (_dir, adapter) = store().await;
        let record = testutil::member();
        adapter.upsert_member(&record).await.unwrap();

        let found = adapter.find_member_by_code("  csm-2026-54321 ").await.unwrap();
        assert_eq!(found.id, record.id);
        assert!(matches!(
            adapter.find_member_by_code("CSM-2026-00000").await,
            Err(PortError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_reconcile_seeds_admin_once() {
        let (_dir, adapter) = store().await;
        let org = testutil::org_profile();
        adapter
            .reconcile_admin(&org, "admin.csm@example.org", "Guru563@#")
            .await
            .unwrap();

        let members = adapter.list_members().await.unwrap();
        assert_eq!(members.len(), 1);
        let admin = &members[0];
        assert!(admin.is_admin());
        assert_eq!(admin.membership_code, "CSM-ADMIN-001");
        assert_eq!(admin.status, MemberStatus::Approved);
        assert!(passwords::verify_password(
            "Guru563@#",
            admin.password_hash.as_deref().unwrap()
        ));

        // A clean second run rewrites nothing.
        let hash_before = admin.password_hash.clone();
        adapter
            .reconcile_admin(&org, "admin.csm@example.org", "Guru563@#")
            .await
            .unwrap();
        let members = adapter.list_members().await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].password_hash, hash_before);
    }

    #[tokio::test]
    async fn test_reconcile_heals_tampered_admin() {
        let (_dir, adapter) = store().await;
        let org = testutil::org_profile();
        adapter
            .reconcile_admin(&org, "admin.csm@example.org", "Guru563@#")
            .await
            .unwrap();
        let member = testutil::member();
        adapter.upsert_member(&member).await.unwrap();

        // Tamper with the admin credentials directly in the slot.
        let mut admin = adapter
            .find_member_by_email("admin.csm@example.org")
            .await
            .unwrap();
        admin.email = "hijacked@example.org".to_string();
        admin.password_hash = Some("$argon2id$forged".to_string());
        adapter.upsert_member(&admin).await.unwrap();

        adapter
            .reconcile_admin(&org, "admin.csm@example.org", "Guru563@#")
            .await
            .unwrap();

        let healed = adapter.find_member(admin.id).await.unwrap();
        assert_eq!(healed.email, "admin.csm@example.org");
        assert!(passwords::verify_password(
            "Guru563@#",
            healed.password_hash.as_deref().unwrap()
        ));
        // Ordinary members are untouched by reconciliation.
        assert_eq!(adapter.list_members().await.unwrap().len(), 2);
        assert!(adapter.find_member(member.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_data_dir_must_be_creatable() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let result = JsonStoreAdapter::new(blocker.join("nested")).await;
        assert!(matches!(result, Err(PortError::Persistence(_))));
    }
}
