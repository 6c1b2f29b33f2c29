//! crates/membership_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like slot files or APIs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{MemberRecord, OrgAssets, Post};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., storage, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Persistence failure: {0}")]
    Persistence(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable persistence of the record collections, scoped by a fixed set of
/// named slots (members, organization assets, posts, session).
///
/// Reads of an absent or unparsable slot yield the empty value rather than an
/// error; only write failures surface as `PortError::Persistence`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // --- Member slot ---
    async fn list_members(&self) -> PortResult<Vec<MemberRecord>>;

    async fn find_member(&self, id: Uuid) -> PortResult<MemberRecord>;

    /// Lookup by email, case-insensitive. `NotFound` when no record matches.
    async fn find_member_by_email(&self, email: &str) -> PortResult<MemberRecord>;

    /// Lookup by membership code, for public card verification.
    async fn find_member_by_code(&self, code: &str) -> PortResult<MemberRecord>;

    /// Replaces the record with a matching id, or appends it; writes the full
    /// collection back. If the session slot mirrors the same id, the mirror is
    /// refreshed in the same call.
    async fn upsert_member(&self, record: &MemberRecord) -> PortResult<()>;

    // --- Organization assets slot ---
    async fn org_assets(&self) -> PortResult<OrgAssets>;

    async fn save_org_assets(&self, assets: &OrgAssets) -> PortResult<()>;

    // --- Posts slot ---
    /// Most recent first.
    async fn list_posts(&self) -> PortResult<Vec<Post>>;

    /// Inserts at the front of the collection.
    async fn add_post(&self, post: &Post) -> PortResult<()>;

    // --- Session slot ---
    async fn read_session(&self) -> PortResult<Option<MemberRecord>>;

    async fn write_session(&self, record: Option<&MemberRecord>) -> PortResult<()>;
}

/// Produces the prose body of an appointment letter for a member record.
#[async_trait]
pub trait LetterService: Send + Sync {
    async fn compose_letter(&self, member: &MemberRecord) -> PortResult<String>;
}
