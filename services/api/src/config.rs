//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Identity of the organization, printed on cards, letters, and forms.
#[derive(Clone, Debug)]
pub struct OrgProfile {
    pub name: String,
    /// Prefix for issued membership codes, e.g. `CSM` in `CSM-2026-12345`.
    pub code_prefix: String,
    pub address: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub president_name: String,
    pub president_title: String,
}

/// The channel members use to submit the membership fee and its proof.
#[derive(Clone, Debug)]
pub struct PaymentChannel {
    pub upi_id: String,
    pub fee_amount: u32,
    /// International-format number for the messaging deep link, digits only.
    pub whatsapp_number: String,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub data_dir: PathBuf,
    pub log_level: Level,
    pub openai_api_key: Option<String>,
    pub letter_model: String,
    pub org: OrgProfile,
    pub payment: PaymentChannel,
    /// Remote QR rendering endpoint; payloads are passed as a query string.
    pub qr_api_base: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Storage Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load API Keys (as optional) ---
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        let letter_model =
            std::env::var("LETTER_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        // --- Load Organization Identity ---
        let org = OrgProfile {
            name: std::env::var("ORG_NAME")
                .unwrap_or_else(|_| "Civic Service Mission".to_string()),
            code_prefix: std::env::var("ORG_CODE_PREFIX").unwrap_or_else(|_| "CSM".to_string()),
            address: std::env::var("ORG_ADDRESS")
                .unwrap_or_else(|_| "Medical College Road, Naushera, Budaun".to_string()),
            contact_email: std::env::var("ORG_CONTACT_EMAIL")
                .unwrap_or_else(|_| "contact.csm@example.org".to_string()),
            contact_phone: std::env::var("ORG_CONTACT_PHONE")
                .unwrap_or_else(|_| "+91 9410020563".to_string()),
            president_name: std::env::var("ORG_PRESIDENT_NAME")
                .unwrap_or_else(|_| "Ad. Mohar Singh".to_string()),
            president_title: std::env::var("ORG_PRESIDENT_TITLE")
                .unwrap_or_else(|_| "National President".to_string()),
        };

        // --- Load Payment Channel ---
        let fee_amount_str = std::env::var("MEMBERSHIP_FEE").unwrap_or_else(|_| "100".to_string());
        let fee_amount = fee_amount_str.parse::<u32>().map_err(|_| {
            ConfigError::InvalidValue(
                "MEMBERSHIP_FEE".to_string(),
                format!("'{}' is not a whole rupee amount", fee_amount_str),
            )
        })?;
        let payment = PaymentChannel {
            upi_id: std::env::var("UPI_ID").unwrap_or_else(|_| "mission@upi".to_string()),
            fee_amount,
            whatsapp_number: std::env::var("WHATSAPP_NUMBER")
                .unwrap_or_else(|_| "918810572406".to_string()),
        };

        let qr_api_base = std::env::var("QR_API_BASE")
            .unwrap_or_else(|_| "https://api.qrserver.com/v1/create-qr-code/".to_string());

        // --- Load Administrator Credentials ---
        // The sole administrator account is owned by configuration; rotating it
        // means changing these variables and restarting, not editing data.
        let admin_email = std::env::var("ADMIN_EMAIL")
            .unwrap_or_else(|_| "admin.csm@example.org".to_string());
        let admin_password = std::env::var("ADMIN_PASSWORD")
            .map_err(|_| ConfigError::MissingVar("ADMIN_PASSWORD".to_string()))?;

        Ok(Self {
            bind_address,
            data_dir,
            log_level,
            openai_api_key,
            letter_model,
            org,
            payment,
            qr_api_base,
            admin_email,
            admin_password,
        })
    }
}
