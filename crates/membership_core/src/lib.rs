pub mod domain;
pub mod lifecycle;
pub mod ports;
pub mod session;

pub use domain::{
    new_membership_code, AuthProvider, CardTheme, MediaItem, MediaKind, MemberDetails,
    MemberDocuments, MemberRecord, MemberStatus, OrgAssets, OrgSocialLinks, Post, Role,
    SocialLinks,
};
pub use lifecycle::{Lifecycle, MediaUpload, NewPost, NewRegistration, ProfileEdit};
pub use ports::{LetterService, PortError, PortResult, RecordStore};
pub use session::SessionHolder;
