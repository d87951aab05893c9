// --- File: crates/voxcal_config/src/lib.rs ---
//! Unified configuration loading for VoxCal.
//!
//! Layers, lowest precedence first: `config/default.toml`, an optional
//! `config/{RUN_ENV}.toml` overlay, then `VOXCAL__`-prefixed environment
//! variables (`VOXCAL__SERVER__PORT=8080`). Secrets are read from plain
//! env vars by the crates that need them and never appear in files.

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;

pub mod models;
pub use models::{AppConfig, GoogleConfig, ServerConfig};

static DOTENV_LOADED: OnceCell<()> = OnceCell::new();

/// Load `.env` into the process environment exactly once.
pub fn ensure_dotenv_loaded() {
    DOTENV_LOADED.get_or_init(|| {
        let _ = dotenv::dotenv();
    });
}

/// Loads the application configuration.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();
    let run_env = std::env::var("RUN_ENV").unwrap_or_else(|_| "default".to_string());

    let config = Config::builder()
        .add_source(File::with_name("config/default"))
        .add_source(File::with_name(&format!("config/{}", run_env)).required(false))
        .add_source(Environment::with_prefix("VOXCAL").separator("__"))
        .build()?;

    config.try_deserialize()
}
