// --- File: crates/voxcal_common/src/lib.rs ---

// Declare modules within this crate
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod services; // Service abstractions
pub mod store; // In-memory integration store

// Re-export the service abstractions for easier access
pub use services::{
    BoxFuture, CalendarEvent, CalendarProvider, CreateEventRequest, CreatedEvent, ExchangeError,
    Integration, IntegrationStore, ProviderError, RefreshedToken, StoreError, TokenExchanger,
};

// Re-export HTTP utilities for easier access
pub use http::client::HTTP_CLIENT;

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level};

pub use store::InMemoryIntegrationStore;
