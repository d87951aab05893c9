// --- File: crates/voxcal_webhook/src/handlers.rs ---
//! Inbound webhook handling.
//!
//! One POST route accepts the voice platform's webhook body, normalizes
//! it, dispatches to the availability engine or booking orchestrator,
//! and answers with a natural-language outcome string suitable for
//! text-to-speech. Validation problems come back as conversational
//! clarification prompts; only an unrecognizable invocation is rejected
//! with an HTTP error.

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, warn};

use crate::availability::{AvailabilityEngine, ProposedSlot};
use crate::booking::{BookingOrchestrator, MeetingDetails};
use crate::datetime::{self, DateTimeError, DEFAULT_DURATION_MINUTES};
use crate::normalize::{extract_invocation, resolve_user_id, Invocation, ToolFunction};
use crate::tokens::TokenManager;
use voxcal_common::services::{CalendarProvider, IntegrationStore, TokenExchanger};
use voxcal_config::AppConfig;

// Define shared state needed by webhook handlers
#[derive(Clone)]
pub struct WebhookState {
    pub config: Arc<AppConfig>,
    pub availability: Arc<AvailabilityEngine>,
    pub booking: Arc<BookingOrchestrator>,
}

impl WebhookState {
    /// Wire the core around injected collaborator handles. Nothing here
    /// reads module-level globals; pooling is the collaborators' concern.
    pub fn new(
        config: Arc<AppConfig>,
        provider: Arc<dyn CalendarProvider>,
        store: Arc<dyn IntegrationStore>,
        exchanger: Arc<dyn TokenExchanger>,
    ) -> Self {
        let tokens = Arc::new(TokenManager::new(store, exchanger, config.provider.clone()));
        let availability = Arc::new(AvailabilityEngine::new(tokens.clone(), provider.clone()));
        let booking = Arc::new(BookingOrchestrator::new(
            availability.clone(),
            tokens,
            provider,
        ));
        Self {
            config,
            availability,
            booking,
        }
    }
}

/// The outcome returned to the transport collaborator: a TTS-ready
/// message, a success flag, and the correlation id when one was sent.
/// Serialized in camelCase to match the platform's own field casing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

impl WebhookResponse {
    fn ok(message: String) -> Self {
        Self {
            success: true,
            message,
            tool_call_id: None,
            event_id: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            tool_call_id: None,
            event_id: None,
        }
    }
}

const RETRY_MESSAGE: &str = "I couldn't reach the calendar just now. Please try again in a moment.";
const NO_CALENDAR_ACCESS: &str = "I wasn't able to access a calendar for this call.";

/// Handler for the voice platform's tool webhook.
#[axum::debug_handler]
pub async fn voice_webhook_handler(
    State(state): State<Arc<WebhookState>>,
    Json(body): Json<Value>,
) -> Result<Json<WebhookResponse>, (StatusCode, String)> {
    let invocation = extract_invocation(&body).map_err(|e| {
        warn!(error = %e, "rejected webhook body");
        (StatusCode::BAD_REQUEST, e.to_string())
    })?;

    // Identity resolution fails closed; the test-mode fallback is the
    // only exception and must be switched on explicitly.
    let test_fallback = if state.config.test_mode {
        state.config.test_user_id.as_deref()
    } else {
        None
    };
    let user_id = match resolve_user_id(&body, test_fallback) {
        Ok(user_id) => user_id,
        Err(e) => {
            warn!(error = %e, "webhook carried no user identity");
            let mut response = WebhookResponse::failed(NO_CALENDAR_ACCESS);
            response.tool_call_id = invocation.tool_call_id;
            return Ok(Json(response));
        }
    };

    let mut response = match invocation.function {
        ToolFunction::CheckAvailability => {
            check_availability_response(&state, &invocation, &user_id).await
        }
        ToolFunction::BookMeeting => book_meeting_response(&state, &invocation, &user_id).await,
    };
    response.tool_call_id = invocation.tool_call_id;
    Ok(Json(response))
}

fn arg_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn arg_i64(args: &Value, key: &str) -> Option<i64> {
    let value = args.get(key)?;
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn clarification_for(error: DateTimeError) -> String {
    match error {
        DateTimeError::InvalidDateFormat(_) => {
            "I didn't catch that date. Could you say it again?".to_string()
        }
        DateTimeError::InvalidTimeFormat(_) => {
            "I didn't catch that time. Could you say it again?".to_string()
        }
        DateTimeError::InvalidDuration(_) => {
            "The end time needs to be after the start time.".to_string()
        }
    }
}

/// Resolve the proposed slot from tool arguments, or produce the
/// clarification prompt to speak back.
fn resolve_slot(args: &Value) -> Result<ProposedSlot, String> {
    let date = arg_str(args, "date")
        .ok_or_else(|| "What date should I look at?".to_string())?;
    let time = arg_str(args, "time")
        .ok_or_else(|| "What time should I look at?".to_string())?;

    let start = datetime::resolve(date, time, arg_str(args, "timezone"))
        .map_err(clarification_for)?;

    let duration_minutes = match arg_str(args, "end_time") {
        Some(end_time) => datetime::duration_between(time, end_time).map_err(clarification_for)?,
        None => arg_i64(args, "duration_minutes").unwrap_or(DEFAULT_DURATION_MINUTES),
    };

    ProposedSlot::new(start, duration_minutes).map_err(clarification_for)
}

async fn check_availability_response(
    state: &WebhookState,
    invocation: &Invocation,
    user_id: &str,
) -> WebhookResponse {
    let args = &invocation.arguments;
    let slot = match resolve_slot(args) {
        Ok(slot) => slot,
        Err(prompt) => return WebhookResponse::failed(prompt),
    };
    let tz_hint = arg_str(args, "timezone").unwrap_or(&state.config.default_timezone);
    let spoken = datetime::spoken_time(slot.start, Some(tz_hint));

    match state.availability.check_availability(user_id, slot).await {
        Ok(result) if result.available => {
            WebhookResponse::ok(format!("Yes, {} is available.", spoken))
        }
        Ok(result) => {
            let titles: Vec<&str> = result
                .conflicts
                .iter()
                .map(|event| event.title.as_str())
                .collect();
            WebhookResponse::failed(format!(
                "That time is already taken. It conflicts with: {}.",
                titles.join(", ")
            ))
        }
        Err(e) => {
            error!(user_id, error = %e, "availability check failed");
            WebhookResponse::failed(RETRY_MESSAGE)
        }
    }
}

async fn book_meeting_response(
    state: &WebhookState,
    invocation: &Invocation,
    user_id: &str,
) -> WebhookResponse {
    let args = &invocation.arguments;
    let attendee_name = match arg_str(args, "attendee_name") {
        Some(name) => name.to_string(),
        None => return WebhookResponse::failed("Who should I book the meeting with?"),
    };
    let slot = match resolve_slot(args) {
        Ok(slot) => slot,
        Err(prompt) => return WebhookResponse::failed(prompt),
    };

    let details = MeetingDetails {
        attendee_name: attendee_name.clone(),
        attendee_email: arg_str(args, "attendee_email").map(str::to_string),
        title: arg_str(args, "title")
            .or_else(|| arg_str(args, "summary"))
            .map(str::to_string),
        description: arg_str(args, "description").map(str::to_string),
    };

    let outcome = state.booking.book_meeting(user_id, slot, details).await;
    if outcome.success {
        let tz_hint = arg_str(args, "timezone").unwrap_or(&state.config.default_timezone);
        let spoken = datetime::spoken_time(slot.start, Some(tz_hint));
        let mut response = WebhookResponse::ok(format!(
            "Done. Your meeting with {} is booked for {}.",
            attendee_name, spoken
        ));
        response.event_id = outcome.event_id;
        response
    } else {
        WebhookResponse::failed(outcome.error.unwrap_or_else(|| RETRY_MESSAGE.to_string()))
    }
}
