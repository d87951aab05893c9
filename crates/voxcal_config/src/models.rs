// --- File: crates/voxcal_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Google Calendar Config ---
// Holds non-secret Google OAuth/calendar config. The client secret is
// loaded directly from the GOOGLE_CLIENT_SECRET env var, never from files.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GoogleConfig {
    pub client_id: String, // Mandatory
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_api_base() -> String {
    "https://www.googleapis.com/calendar/v3".to_string()
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

fn default_provider() -> String {
    "google".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    pub google: GoogleConfig,

    /// Provider tag under which integrations are stored.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Display timezone used when a request carries no timezone hint.
    #[serde(default = "default_timezone")]
    pub default_timezone: String,

    /// When set, an unresolvable user identity falls back to
    /// `test_user_id` instead of failing. Off in any real deployment.
    #[serde(default)]
    pub test_mode: bool,
    #[serde(default)]
    pub test_user_id: Option<String>,
}
