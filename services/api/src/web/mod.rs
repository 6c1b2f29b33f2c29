pub mod auth;
pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;

// Re-export the guards and the OpenAPI master so the server binary can
// assemble the router without reaching into the submodules.
pub use middleware::{require_admin, require_member, CurrentMember};
pub use rest::ApiDoc;
