//! services/api/src/testutil.rs
//!
//! Shared fixtures for the adapter, render, and web tests.

use chrono::{NaiveDate, Utc};
use membership_core::domain::{
    AuthProvider, MemberDetails, MemberDocuments, MemberRecord, MemberStatus, Role, SocialLinks,
};
use uuid::Uuid;

use crate::config::OrgProfile;

pub fn member() -> MemberRecord {
    MemberRecord {
        id: Uuid::new_v4(),
        membership_code: "CSM-2026-54321".to_string(),
        email: "asha@example.com".to_string(),
        auth_provider: AuthProvider::Password,
        password_hash: Some("$argon2id$stub".to_string()),
        role: Role::Member,
        status: MemberStatus::Pending,
        social_links: SocialLinks::default(),
        gallery: vec![],
        details: MemberDetails {
            full_name: "Asha Verma".to_string(),
            father_name: "R. Verma".to_string(),
            dob: NaiveDate::from_ymd_opt(1994, 4, 2).unwrap(),
            mobile: "9000000001".to_string(),
            village: "Rampur".to_string(),
            post: "Rampur".to_string(),
            block: "Sadar".to_string(),
            district: "Budaun".to_string(),
            state: "Uttar Pradesh".to_string(),
            department: "Outreach".to_string(),
            designation: "Field Officer".to_string(),
            photo_url: String::new(),
            id_front_url: None,
            id_back_url: None,
            joining_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        },
        documents: MemberDocuments::default(),
        registered_at: Utc::now(),
    }
}

pub fn approved_member() -> MemberRecord {
    let mut record = member();
    record.status = MemberStatus::Approved;
    record.documents = MemberDocuments {
        joining_letter_content: Some(
            "Dear Asha Verma,\n\nWelcome to the mission.\n\nSincerely,".to_string(),
        ),
        generated_at: Some(Utc::now()),
    };
    record
}

pub fn org_profile() -> OrgProfile {
    OrgProfile {
        name: "Civic Service Mission".to_string(),
        code_prefix: "CSM".to_string(),
        address: "Medical College Road, Naushera, Budaun".to_string(),
        contact_email: "contact.csm@example.org".to_string(),
        contact_phone: "+91 9410020563".to_string(),
        president_name: "Ad. Mohar Singh".to_string(),
        president_title: "National President".to_string(),
    }
}
