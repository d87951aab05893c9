// --- File: crates/voxcal_webhook/src/booking.rs ---
//! Check-then-book coordination.
//!
//! The availability check and the event creation are not atomic: another
//! booking against the same calendar can land between the two and produce
//! a double-booking. Accepted limitation for a single-caller voice-agent
//! integration.

use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::availability::{AvailabilityEngine, ProposedSlot};
use crate::tokens::{TokenError, TokenManager};
use voxcal_common::services::{CalendarProvider, CreateEventRequest};

/// What the caller told us about the meeting to create.
#[derive(Debug, Clone)]
pub struct MeetingDetails {
    pub attendee_name: String,
    pub attendee_email: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookingOutcome {
    pub success: bool,
    pub event_id: Option<String>,
    pub error: Option<String>,
}

impl BookingOutcome {
    fn booked(event_id: String) -> Self {
        Self {
            success: true,
            event_id: Some(event_id),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            event_id: None,
            error: Some(error.into()),
        }
    }
}

const RETRY_LATER: &str = "Couldn't reach the calendar right now. Please try again in a moment.";

pub struct BookingOrchestrator {
    availability: Arc<AvailabilityEngine>,
    tokens: Arc<TokenManager>,
    provider: Arc<dyn CalendarProvider>,
}

impl BookingOrchestrator {
    pub fn new(
        availability: Arc<AvailabilityEngine>,
        tokens: Arc<TokenManager>,
        provider: Arc<dyn CalendarProvider>,
    ) -> Self {
        Self {
            availability,
            tokens,
            provider,
        }
    }

    /// Book a meeting in the proposed slot, checking availability first.
    ///
    /// Unlike the availability check, an unconnected calendar here is a
    /// failed booking, not fail-open: there is nothing to create the
    /// event on. No write happens when the slot is unavailable.
    pub async fn book_meeting(
        &self,
        user_id: &str,
        slot: ProposedSlot,
        details: MeetingDetails,
    ) -> BookingOutcome {
        let availability = match self.availability.check_availability(user_id, slot).await {
            Ok(result) => result,
            Err(e) => {
                error!(user_id, error = %e, "availability check failed during booking");
                return BookingOutcome::failed(RETRY_LATER);
            }
        };

        if !availability.available {
            let titles: Vec<&str> = availability
                .conflicts
                .iter()
                .map(|event| event.title.as_str())
                .collect();
            return BookingOutcome::failed(format!(
                "Time slot not available. Conflicts with: {}",
                titles.join(", ")
            ));
        }

        let access_token = match self.tokens.get_valid_access_token(user_id).await {
            Ok(token) => token,
            Err(TokenError::CalendarNotConnected) => {
                return BookingOutcome::failed(
                    "Your calendar is not connected, so the meeting couldn't be booked.",
                );
            }
            Err(e) => {
                error!(user_id, error = %e, "token lookup failed during booking");
                return BookingOutcome::failed(RETRY_LATER);
            }
        };

        let title = details
            .title
            .unwrap_or_else(|| format!("Meeting with {}", details.attendee_name));
        let description = details
            .description
            .unwrap_or_else(|| "Scheduled by the voice assistant.".to_string());
        let request = CreateEventRequest {
            title,
            description,
            start: slot.start,
            end: slot.end(),
            attendee_emails: details.attendee_email.into_iter().collect(),
        };

        match self.provider.create_event(&access_token, request).await {
            Ok(created) => {
                info!(user_id, event_id = %created.event_id, "meeting booked");
                BookingOutcome::booked(created.event_id)
            }
            Err(e) => {
                // Provider error text stays in the logs; the caller gets
                // a generic message.
                error!(user_id, error = %e, "event creation failed");
                BookingOutcome::failed(RETRY_LATER)
            }
        }
    }
}
