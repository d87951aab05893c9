// --- File: crates/voxcal_webhook/src/test_support.rs ---
//! Scripted collaborator implementations for tests, in the same spirit
//! as an in-memory mock calendar service: mutex-held state, recorded
//! invocations, configurable failures.

use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::handlers::WebhookState;
use voxcal_common::services::{
    BoxFuture, CalendarEvent, CalendarProvider, CreateEventRequest, CreatedEvent, ExchangeError,
    Integration, ProviderError, RefreshedToken, TokenExchanger,
};
use voxcal_common::InMemoryIntegrationStore;
use voxcal_config::{AppConfig, GoogleConfig, ServerConfig};

/// Calendar provider backed by a scripted event list. Records every
/// queried window and every create call.
#[derive(Default)]
pub struct ScriptedProvider {
    pub events: Mutex<Vec<CalendarEvent>>,
    pub queried_windows: Mutex<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
    pub create_calls: Mutex<Vec<CreateEventRequest>>,
    pub fail_query: bool,
    pub fail_create: bool,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        Self {
            events: Mutex::new(events),
            ..Self::default()
        }
    }

    pub fn create_call_count(&self) -> usize {
        self.create_calls.lock().unwrap().len()
    }
}

impl CalendarProvider for ScriptedProvider {
    fn list_events(
        &self,
        _access_token: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<CalendarEvent>, ProviderError> {
        Box::pin(async move {
            if self.fail_query {
                return Err(ProviderError::QueryFailed("scripted failure".to_string()));
            }
            self.queried_windows.lock().unwrap().push((time_min, time_max));
            let events = self.events.lock().unwrap();
            // Provider semantics: return events overlapping the window,
            // preserving scripted order.
            Ok(events
                .iter()
                .filter(|event| event.start < time_max && event.end > time_min)
                .cloned()
                .collect())
        })
    }

    fn create_event(
        &self,
        _access_token: &str,
        request: CreateEventRequest,
    ) -> BoxFuture<'_, CreatedEvent, ProviderError> {
        Box::pin(async move {
            if self.fail_create {
                return Err(ProviderError::CreateFailed("scripted failure".to_string()));
            }
            self.create_calls.lock().unwrap().push(request);
            Ok(CreatedEvent {
                event_id: format!("evt-{}", uuid::Uuid::new_v4()),
                event_url: None,
            })
        })
    }
}

/// Token exchanger that either hands out a scripted token or rejects.
pub struct ScriptedExchanger {
    pub token: Option<RefreshedToken>,
    pub calls: AtomicUsize,
}

impl ScriptedExchanger {
    pub fn granting(access_token: &str, expires_in_seconds: i64) -> Self {
        Self {
            token: Some(RefreshedToken {
                access_token: access_token.to_string(),
                expires_in_seconds,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            token: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenExchanger for ScriptedExchanger {
    fn refresh_access_token(
        &self,
        _refresh_token: &str,
    ) -> BoxFuture<'_, RefreshedToken, ExchangeError> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.token {
                Some(token) => Ok(token.clone()),
                None => Err(ExchangeError::Rejected("invalid_grant".to_string())),
            }
        })
    }
}

pub fn event(
    title: &str,
    start: DateTime<Utc>,
    duration_minutes: i64,
) -> CalendarEvent {
    CalendarEvent {
        id: format!("evt-{}", uuid::Uuid::new_v4()),
        title: title.to_string(),
        start,
        end: start + Duration::minutes(duration_minutes),
        all_day: false,
    }
}

/// An integration whose access token is valid for another hour.
pub fn connected_integration(user_id: &str) -> Integration {
    Integration {
        user_id: user_id.to_string(),
        provider: "google".to_string(),
        access_token: Some("valid-token".to_string()),
        refresh_token: Some("refresh-token".to_string()),
        token_expires_at: Some(Utc::now() + Duration::hours(1)),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// An integration whose access token expired and must be refreshed.
pub fn expired_integration(user_id: &str) -> Integration {
    Integration {
        token_expires_at: Some(Utc::now() - Duration::minutes(1)),
        ..connected_integration(user_id)
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        google: GoogleConfig {
            client_id: "test-client".to_string(),
            token_uri: "http://localhost/token".to_string(),
            api_base: "http://localhost/calendar".to_string(),
            calendar_id: "primary".to_string(),
        },
        provider: "google".to_string(),
        default_timezone: "UTC".to_string(),
        test_mode: false,
        test_user_id: None,
    }
}

pub fn build_state(
    provider: Arc<ScriptedProvider>,
    store: Arc<InMemoryIntegrationStore>,
    exchanger: Arc<ScriptedExchanger>,
) -> Arc<WebhookState> {
    Arc::new(WebhookState::new(
        Arc::new(test_config()),
        provider,
        store,
        exchanger,
    ))
}
