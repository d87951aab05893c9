// --- File: crates/voxcal_common/src/services.rs ---
//! Service abstractions for external collaborators.
//!
//! This module provides trait definitions for the external services the
//! booking core depends on: the calendar provider, the integration
//! (credential) store, and the OAuth token-exchange endpoint. These traits
//! allow for dependency injection and easier testing by decoupling the
//! orchestration logic from specific implementations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Sentinel title used when the provider withholds an event's summary
/// (private events come back without one).
pub const BUSY_TITLE: &str = "Busy";

/// Errors returned by calendar provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("calendar query failed: {0}")]
    QueryFailed(String),
    #[error("event creation failed: {0}")]
    CreateFailed(String),
}

/// Errors returned by the integration store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("integration store error: {0}")]
    Backend(String),
}

/// Errors returned by the token-exchange endpoint client.
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("token endpoint unreachable: {0}")]
    Http(String),
    #[error("token endpoint rejected refresh: {0}")]
    Rejected(String),
    #[error("malformed token response: {0}")]
    Malformed(String),
}

/// A calendar integration record, one per (user, provider) pair.
///
/// Owned by the external persistence collaborator; the core holds it only
/// for the duration of one request. Mutated solely by the token lifecycle
/// manager on refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Integration {
    pub user_id: String,
    pub provider: String,
    /// Short-lived opaque secret. Usable without refresh while unexpired.
    pub access_token: Option<String>,
    /// Long-lived opaque secret. Absent means the integration cannot be
    /// refreshed once the access token expires.
    pub refresh_token: Option<String>,
    pub token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A read-only projection of a provider event. Fetched per query, never
/// persisted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    /// Falls back to [`BUSY_TITLE`] when the provider omits the summary.
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
}

/// Parameters for creating a provider event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub attendee_emails: Vec<String>,
}

/// Result of a successful event creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedEvent {
    pub event_id: String,
    pub event_url: Option<String>,
}

/// Result of a successful token refresh exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshedToken {
    pub access_token: String,
    pub expires_in_seconds: i64,
}

/// A trait for calendar provider operations.
///
/// Implementations act on behalf of a user via a per-call access token;
/// they hold no per-user state of their own.
pub trait CalendarProvider: Send + Sync {
    /// List events overlapping the given window, in provider order.
    fn list_events(
        &self,
        access_token: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<CalendarEvent>, ProviderError>;

    /// Create an event on the user's primary calendar.
    fn create_event(
        &self,
        access_token: &str,
        request: CreateEventRequest,
    ) -> BoxFuture<'_, CreatedEvent, ProviderError>;
}

/// A trait for the integration (credential) store.
///
/// The store must serialize `update_access_token` per (user, provider)
/// key; concurrent refreshes otherwise resolve last-writer-wins.
pub trait IntegrationStore: Send + Sync {
    fn get(&self, user_id: &str, provider: &str)
        -> BoxFuture<'_, Option<Integration>, StoreError>;

    fn update_access_token(
        &self,
        user_id: &str,
        provider: &str,
        access_token: &str,
        expires_at: DateTime<Utc>,
    ) -> BoxFuture<'_, (), StoreError>;
}

/// A trait for the OAuth token-exchange endpoint.
pub trait TokenExchanger: Send + Sync {
    fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> BoxFuture<'_, RefreshedToken, ExchangeError>;
}
