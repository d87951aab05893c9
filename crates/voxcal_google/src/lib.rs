// --- File: crates/voxcal_google/src/lib.rs ---
// Declare modules within this crate
pub mod auth;
pub mod service;

pub use auth::GoogleTokenExchanger;
pub use service::GoogleCalendarClient;
