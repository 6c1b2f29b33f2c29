//! services/api/src/web/state.rs
//!
//! Defines the application state shared by every request handler.

use crate::config::Config;
use membership_core::lifecycle::Lifecycle;
use membership_core::ports::RecordStore;
use membership_core::session::SessionHolder;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// Handlers reach the store directly for plain reads; every mutation of the
/// member collection goes through the lifecycle so its rules apply.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub lifecycle: Arc<Lifecycle>,
    pub sessions: Arc<SessionHolder>,
    pub config: Arc<Config>,
}
