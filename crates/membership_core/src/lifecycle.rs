//! crates/membership_core/src/lifecycle.rs
//!
//! Domain operations over the record store: registration, admin review,
//! profile edits, letter generation, gallery moderation, and posts.
//! Every operation is a read-modify-write of the full member collection;
//! the store serializes writers within this process (see the adapter).

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    new_membership_code, AuthProvider, MediaItem, MediaKind, MemberDetails, MemberDocuments,
    MemberRecord, MemberStatus, Post, Role, SocialLinks,
};
use crate::ports::{LetterService, PortError, PortResult, RecordStore};

/// Input for `register`. The password arrives pre-hashed; the core never
/// sees plaintext credentials.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub email: String,
    pub auth_provider: AuthProvider,
    pub password_hash: Option<String>,
    pub details: MemberDetails,
    pub social_links: SocialLinks,
}

/// Input for `edit_profile`. Details and links replace the stored values
/// wholesale; the password only changes when a new hash is supplied.
#[derive(Debug, Clone)]
pub struct ProfileEdit {
    pub details: MemberDetails,
    pub social_links: SocialLinks,
    pub new_password_hash: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub kind: MediaKind,
    pub url: String,
    pub caption: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub content: String,
    pub image_url: Option<String>,
    pub author: String,
}

/// Orchestrates membership-record transitions on top of the store and the
/// letter collaborator.
pub struct Lifecycle {
    store: Arc<dyn RecordStore>,
    letters: Arc<dyn LetterService>,
    code_prefix: String,
}

impl Lifecycle {
    pub fn new(
        store: Arc<dyn RecordStore>,
        letters: Arc<dyn LetterService>,
        code_prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            letters,
            code_prefix: code_prefix.into(),
        }
    }

    /// Creates a new member record with status PENDING, a freshly issued
    /// membership code, and today as the joining date. Nothing is persisted
    /// if a pre-check fails.
    pub async fn register(&self, registration: NewRegistration) -> PortResult<MemberRecord> {
        // 1. Informal pre-checks, all before any persistence.
        if registration.email.trim().is_empty() {
            return Err(PortError::Validation("email is required".to_string()));
        }
        if registration.details.full_name.trim().is_empty() {
            return Err(PortError::Validation("full name is required".to_string()));
        }
        if registration.details.mobile.trim().is_empty() {
            return Err(PortError::Validation("mobile number is required".to_string()));
        }
        if registration.details.photo_url.trim().is_empty() {
            return Err(PortError::Validation("profile photo is required".to_string()));
        }
        if registration.details.id_front_url.is_none() || registration.details.id_back_url.is_none()
        {
            return Err(PortError::Validation(
                "both identity-document faces are required".to_string(),
            ));
        }
        if registration.auth_provider == AuthProvider::Password
            && registration.password_hash.is_none()
        {
            return Err(PortError::Validation("password is required".to_string()));
        }

        // 2. Best-effort duplicate check. A linear scan with no transactional
        //    guarantee; two racing registrations can both pass it.
        match self
            .store
            .find_member_by_email(&registration.email)
            .await
        {
            Ok(_) => {
                return Err(PortError::Conflict(format!(
                    "an account already exists for {}",
                    registration.email
                )))
            }
            Err(PortError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        // 3. Issue identifiers and persist. The joining date is owned by the
        //    service, whatever the submitted details carried.
        let mut details = registration.details;
        details.joining_date = Utc::now().date_naive();
        let record = MemberRecord {
            id: Uuid::new_v4(),
            membership_code: new_membership_code(&self.code_prefix),
            email: registration.email,
            auth_provider: registration.auth_provider,
            password_hash: registration.password_hash,
            role: Role::Member,
            status: MemberStatus::Pending,
            social_links: registration.social_links,
            gallery: Vec::new(),
            details,
            documents: MemberDocuments::default(),
            registered_at: Utc::now(),
        };
        self.store.upsert_member(&record).await?;
        Ok(record)
    }

    /// Approves a member. Writes an appointment letter the first time only;
    /// re-approving keeps whatever letter text already exists.
    pub async fn approve(&self, id: Uuid) -> PortResult<MemberRecord> {
        let mut record = self.store.find_member(id).await?;
        record.status = MemberStatus::Approved;

        if record.documents.joining_letter_content.is_none() {
            let body = self.letters.compose_letter(&record).await?;
            record.documents.joining_letter_content = Some(body);
            record.documents.generated_at = Some(Utc::now());
        }

        self.store.upsert_member(&record).await?;
        Ok(record)
    }

    pub async fn reject(&self, id: Uuid) -> PortResult<MemberRecord> {
        let mut record = self.store.find_member(id).await?;
        record.status = MemberStatus::Rejected;
        self.store.upsert_member(&record).await?;
        Ok(record)
    }

    /// Replaces the mutable profile fields. Identity-relevant changes do not
    /// re-trigger review and uniqueness is not re-validated; callers are
    /// expected to warn the user before submitting.
    pub async fn edit_profile(&self, id: Uuid, edit: ProfileEdit) -> PortResult<MemberRecord> {
        let mut record = self.store.find_member(id).await?;
        record.details = edit.details;
        record.social_links = edit.social_links;
        if let Some(hash) = edit.new_password_hash {
            record.password_hash = Some(hash);
        }
        self.store.upsert_member(&record).await?;
        Ok(record)
    }

    /// Unconditionally rewrites the appointment letter, replacing any prior
    /// content and its timestamp.
    pub async fn regenerate_letter(&self, id: Uuid) -> PortResult<MemberRecord> {
        let mut record = self.store.find_member(id).await?;
        let body = self.letters.compose_letter(&record).await?;
        record.documents.joining_letter_content = Some(body);
        record.documents.generated_at = Some(Utc::now());
        self.store.upsert_member(&record).await?;
        Ok(record)
    }

    /// Appends a gallery item awaiting moderation.
    pub async fn add_media(&self, member_id: Uuid, upload: MediaUpload) -> PortResult<MemberRecord> {
        if upload.url.trim().is_empty() {
            return Err(PortError::Validation("media payload is required".to_string()));
        }
        let mut record = self.store.find_member(member_id).await?;
        record.gallery.push(MediaItem {
            id: Uuid::new_v4(),
            kind: upload.kind,
            url: upload.url,
            caption: upload.caption,
            uploaded_at: Utc::now(),
            approved: false,
        });
        self.store.upsert_member(&record).await?;
        Ok(record)
    }

    /// Marks one gallery item as approved for public display.
    pub async fn approve_media(
        &self,
        member_id: Uuid,
        media_id: Uuid,
    ) -> PortResult<MemberRecord> {
        let mut record = self.store.find_member(member_id).await?;
        let item = record
            .gallery
            .iter_mut()
            .find(|item| item.id == media_id)
            .ok_or_else(|| PortError::NotFound(format!("media item {media_id}")))?;
        item.approved = true;
        self.store.upsert_member(&record).await?;
        Ok(record)
    }

    pub async fn publish_post(&self, post: NewPost) -> PortResult<Post> {
        if post.content.trim().is_empty() {
            return Err(PortError::Validation("post content is required".to_string()));
        }
        let post = Post {
            id: Uuid::new_v4(),
            content: post.content,
            image_url: post.image_url,
            author: post.author,
            posted_at: Utc::now(),
        };
        self.store.add_post(&post).await?;
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrgAssets;
    use async_trait::async_trait;
    use chrono::{Datelike, NaiveDate};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeStore {
        members: Mutex<Vec<MemberRecord>>,
        session: Mutex<Option<MemberRecord>>,
        posts: Mutex<Vec<Post>>,
    }

    impl FakeStore {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                members: Mutex::new(Vec::new()),
                session: Mutex::new(None),
                posts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl RecordStore for FakeStore {
        async fn list_members(&self) -> PortResult<Vec<MemberRecord>> {
            Ok(self.members.lock().unwrap().clone())
        }

        async fn find_member(&self, id: Uuid) -> PortResult<MemberRecord> {
            self.members
                .lock()
                .unwrap()
                .iter()
                .find(|m| m.id == id)
                .cloned()
                .ok_or_else(|| PortError::NotFound(format!("member {id}")))
        }

        async fn find_member_by_email(&self, email: &str) -> PortResult<MemberRecord> {
            self.members
                .lock()
                .unwrap()
                .iter()
                .find(|m| m.email.eq_ignore_ascii_case(email))
                .cloned()
                .ok_or_else(|| PortError::NotFound(format!("member {email}")))
        }

        async fn find_member_by_code(&self, code: &str) -> PortResult<MemberRecord> {
            self.members
                .lock()
                .unwrap()
                .iter()
                .find(|m| m.membership_code == code)
                .cloned()
                .ok_or_else(|| PortError::NotFound(format!("member {code}")))
        }

        async fn upsert_member(&self, record: &MemberRecord) -> PortResult<()> {
            let mut members = self.members.lock().unwrap();
            match members.iter_mut().find(|m| m.id == record.id) {
                Some(slot) => *slot = record.clone(),
                None => members.push(record.clone()),
            }
            let mut session = self.session.lock().unwrap();
            if session.as_ref().map_or(false, |s| s.id == record.id) {
                *session = Some(record.clone());
            }
            Ok(())
        }

        async fn org_assets(&self) -> PortResult<OrgAssets> {
            Ok(OrgAssets::default())
        }

        async fn save_org_assets(&self, _assets: &OrgAssets) -> PortResult<()> {
            Ok(())
        }

        async fn list_posts(&self) -> PortResult<Vec<Post>> {
            Ok(self.posts.lock().unwrap().clone())
        }

        async fn add_post(&self, post: &Post) -> PortResult<()> {
            self.posts.lock().unwrap().insert(0, post.clone());
            Ok(())
        }

        async fn read_session(&self) -> PortResult<Option<MemberRecord>> {
            Ok(self.session.lock().unwrap().clone())
        }

        async fn write_session(&self, record: Option<&MemberRecord>) -> PortResult<()> {
            *self.session.lock().unwrap() = record.cloned();
            Ok(())
        }
    }

    struct FakeLetters {
        calls: AtomicUsize,
    }

    impl FakeLetters {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LetterService for FakeLetters {
        async fn compose_letter(&self, member: &MemberRecord) -> PortResult<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("Dear {}, (draft {n})", member.details.full_name))
        }
    }

    fn details(name: &str, mobile: &str) -> MemberDetails {
        MemberDetails {
            full_name: name.to_string(),
            father_name: "R. Verma".to_string(),
            dob: NaiveDate::from_ymd_opt(1994, 4, 2).unwrap(),
            mobile: mobile.to_string(),
            village: "Rampur".to_string(),
            post: "Rampur".to_string(),
            block: "Sadar".to_string(),
            district: "Budaun".to_string(),
            state: "Uttar Pradesh".to_string(),
            department: "Outreach".to_string(),
            designation: "Field Officer".to_string(),
            photo_url: "data:image/png;base64,AAAA".to_string(),
            id_front_url: Some("data:image/jpeg;base64,FFFF".to_string()),
            id_back_url: Some("data:image/jpeg;base64,KKKK".to_string()),
            joining_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        }
    }

    fn registration(email: &str) -> NewRegistration {
        NewRegistration {
            email: email.to_string(),
            auth_provider: AuthProvider::Password,
            password_hash: Some("$argon2id$stub".to_string()),
            details: details("Asha Verma", "9000000001"),
            social_links: SocialLinks::default(),
        }
    }

    fn lifecycle(store: Arc<FakeStore>, letters: Arc<FakeLetters>) -> Lifecycle {
        Lifecycle::new(store, letters, "CSM")
    }

    #[tokio::test]
    async fn test_register_issues_pending_record() {
        let store = FakeStore::new();
        let manager = lifecycle(store.clone(), FakeLetters::new());

        let record = manager.register(registration("asha@example.com")).await.unwrap();

        assert_eq!(record.status, MemberStatus::Pending);
        assert_eq!(record.role, Role::Member);
        assert_eq!(record.details.joining_date, Utc::now().date_naive());
        assert!(record.documents.joining_letter_content.is_none());
        assert!(record.gallery.is_empty());

        let parts: Vec<&str> = record.membership_code.split('-').collect();
        assert_eq!(parts[0], "CSM");
        assert_eq!(parts[1], Utc::now().year().to_string());
        assert_eq!(parts[2].len(), 5);
        assert!(parts[2].parse::<u32>().is_ok());

        // Persisted, and exactly once.
        assert_eq!(store.list_members().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let store = FakeStore::new();
        let manager = lifecycle(store.clone(), FakeLetters::new());

        manager.register(registration("asha@example.com")).await.unwrap();
        let err = manager
            .register(registration("ASHA@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, PortError::Conflict(_)));
        assert_eq!(store.list_members().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_requires_password_for_manual_accounts() {
        let manager = lifecycle(FakeStore::new(), FakeLetters::new());
        let mut registration = registration("asha@example.com");
        registration.password_hash = None;

        let err = manager.register(registration).await.unwrap_err();
        assert!(matches!(err, PortError::Validation(_)));
    }

    #[tokio::test]
    async fn test_register_requires_identity_documents() {
        let store = FakeStore::new();
        let manager = lifecycle(store.clone(), FakeLetters::new());

        let mut missing_front = registration("asha@example.com");
        missing_front.details.id_front_url = None;
        let err = manager.register(missing_front).await.unwrap_err();
        assert!(matches!(err, PortError::Validation(_)));

        let mut missing_back = registration("asha@example.com");
        missing_back.details.id_back_url = None;
        let err = manager.register(missing_back).await.unwrap_err();
        assert!(matches!(err, PortError::Validation(_)));

        assert!(store.list_members().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_approve_writes_letter_once() {
        let store = FakeStore::new();
        let letters = FakeLetters::new();
        let manager = lifecycle(store.clone(), letters.clone());

        let record = manager.register(registration("asha@example.com")).await.unwrap();
        let approved = manager.approve(record.id).await.unwrap();

        assert_eq!(approved.status, MemberStatus::Approved);
        let first_letter = approved.documents.joining_letter_content.clone().unwrap();
        assert!(!first_letter.is_empty());
        assert!(approved.documents.generated_at.is_some());
        assert_eq!(letters.call_count(), 1);

        // Approving again must not touch the letter.
        let again = manager.approve(record.id).await.unwrap();
        assert_eq!(letters.call_count(), 1);
        assert_eq!(again.documents.joining_letter_content.unwrap(), first_letter);
    }

    #[tokio::test]
    async fn test_reject_leaves_documents_empty() {
        let store = FakeStore::new();
        let letters = FakeLetters::new();
        let manager = lifecycle(store.clone(), letters.clone());

        let record = manager.register(registration("asha@example.com")).await.unwrap();
        let rejected = manager.reject(record.id).await.unwrap();

        assert_eq!(rejected.status, MemberStatus::Rejected);
        assert!(rejected.documents.joining_letter_content.is_none());
        assert_eq!(letters.call_count(), 0);
    }

    #[tokio::test]
    async fn test_regenerate_always_overwrites() {
        let store = FakeStore::new();
        let letters = FakeLetters::new();
        let manager = lifecycle(store.clone(), letters.clone());

        let record = manager.register(registration("asha@example.com")).await.unwrap();
        let approved = manager.approve(record.id).await.unwrap();
        let first = approved.documents.joining_letter_content.unwrap();

        let regenerated = manager.regenerate_letter(record.id).await.unwrap();
        let second = regenerated.documents.joining_letter_content.unwrap();

        assert_eq!(letters.call_count(), 2);
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_edit_profile_keeps_sequential_edits() {
        let store = FakeStore::new();
        let manager = lifecycle(store.clone(), FakeLetters::new());
        let record = manager.register(registration("asha@example.com")).await.unwrap();

        // First edit: rename.
        let mut edited = details("Asha Sharma", "9000000001");
        edited.photo_url = record.details.photo_url.clone();
        manager
            .edit_profile(
                record.id,
                ProfileEdit {
                    details: edited,
                    social_links: SocialLinks::default(),
                    new_password_hash: None,
                },
            )
            .await
            .unwrap();

        // Second edit: new mobile number, starting from the stored state.
        let current = store.find_member(record.id).await.unwrap();
        let mut edited = current.details.clone();
        edited.mobile = "9111111111".to_string();
        manager
            .edit_profile(
                record.id,
                ProfileEdit {
                    details: edited,
                    social_links: SocialLinks::default(),
                    new_password_hash: None,
                },
            )
            .await
            .unwrap();

        let stored = store.find_member(record.id).await.unwrap();
        assert_eq!(stored.details.full_name, "Asha Sharma");
        assert_eq!(stored.details.mobile, "9111111111");
    }

    #[tokio::test]
    async fn test_edit_profile_replaces_password_only_when_given() {
        let store = FakeStore::new();
        let manager = lifecycle(store.clone(), FakeLetters::new());
        let record = manager.register(registration("asha@example.com")).await.unwrap();
        let original_hash = record.password_hash.clone();

        manager
            .edit_profile(
                record.id,
                ProfileEdit {
                    details: record.details.clone(),
                    social_links: SocialLinks::default(),
                    new_password_hash: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(
            store.find_member(record.id).await.unwrap().password_hash,
            original_hash
        );

        manager
            .edit_profile(
                record.id,
                ProfileEdit {
                    details: record.details.clone(),
                    social_links: SocialLinks::default(),
                    new_password_hash: Some("$argon2id$rotated".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(
            store.find_member(record.id).await.unwrap().password_hash.as_deref(),
            Some("$argon2id$rotated")
        );
    }

    #[tokio::test]
    async fn test_media_moderation_flow() {
        let store = FakeStore::new();
        let manager = lifecycle(store.clone(), FakeLetters::new());
        let record = manager.register(registration("asha@example.com")).await.unwrap();

        let updated = manager
            .add_media(
                record.id,
                MediaUpload {
                    kind: MediaKind::Image,
                    url: "data:image/png;base64,BBBB".to_string(),
                    caption: Some("Community drive".to_string()),
                },
            )
            .await
            .unwrap();
        let item = &updated.gallery[0];
        assert!(!item.approved);

        let moderated = manager.approve_media(record.id, item.id).await.unwrap();
        assert!(moderated.gallery[0].approved);

        let missing = manager.approve_media(record.id, Uuid::new_v4()).await;
        assert!(matches!(missing, Err(PortError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_publish_post_is_newest_first() {
        let store = FakeStore::new();
        let manager = lifecycle(store.clone(), FakeLetters::new());

        manager
            .publish_post(NewPost {
                content: "First announcement".to_string(),
                image_url: None,
                author: "System Administrator".to_string(),
            })
            .await
            .unwrap();
        manager
            .publish_post(NewPost {
                content: "Second announcement".to_string(),
                image_url: None,
                author: "System Administrator".to_string(),
            })
            .await
            .unwrap();

        let posts = store.list_posts().await.unwrap();
        assert_eq!(posts[0].content, "Second announcement");
        assert_eq!(posts[1].content, "First announcement");
    }
}
