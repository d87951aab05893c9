// --- File: crates/voxcal_webhook/src/availability.rs ---
//! Interval-overlap availability checking.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::datetime::DateTimeError;
use crate::tokens::{TokenError, TokenManager};
use voxcal_common::services::{CalendarEvent, CalendarProvider, ProviderError};

/// The provider query window extends this far beyond the proposed slot
/// on each side, to tolerate clock skew and surface adjacent events.
pub const QUERY_PADDING_HOURS: i64 = 1;

/// The candidate time window a caller wants checked or booked.
#[derive(Debug, Clone, Copy)]
pub struct ProposedSlot {
    pub start: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl ProposedSlot {
    /// Duration must be a positive number of minutes.
    pub fn new(start: DateTime<Utc>, duration_minutes: i64) -> Result<Self, DateTimeError> {
        if duration_minutes <= 0 {
            return Err(DateTimeError::InvalidDuration(duration_minutes));
        }
        Ok(Self {
            start,
            duration_minutes,
        })
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.start + Duration::minutes(self.duration_minutes)
    }
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResult {
    pub available: bool,
    /// Conflicting events in provider order; empty when available.
    pub conflicts: Vec<CalendarEvent>,
}

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Half-open interval test: touching boundaries do not conflict.
pub fn conflicts_with(
    event: &CalendarEvent,
    proposed_start: DateTime<Utc>,
    proposed_end: DateTime<Utc>,
) -> bool {
    event.start < proposed_end && event.end > proposed_start
}

pub struct AvailabilityEngine {
    tokens: Arc<TokenManager>,
    provider: Arc<dyn CalendarProvider>,
}

impl AvailabilityEngine {
    pub fn new(tokens: Arc<TokenManager>, provider: Arc<dyn CalendarProvider>) -> Self {
        Self { tokens, provider }
    }

    /// Check whether a proposed slot conflicts with existing events.
    ///
    /// Fail-open policy: a calendar that is simply not connected yields
    /// `available = true` so an unconnected calendar never blocks a
    /// tentative verbal offer mid-call. Every other failure (provider
    /// error, refresh failure) propagates as an error.
    pub async fn check_availability(
        &self,
        user_id: &str,
        slot: ProposedSlot,
    ) -> Result<AvailabilityResult, AvailabilityError> {
        let access_token = match self.tokens.get_valid_access_token(user_id).await {
            Ok(token) => token,
            Err(TokenError::CalendarNotConnected) => {
                debug!(user_id, "calendar not connected, failing open");
                return Ok(AvailabilityResult {
                    available: true,
                    conflicts: Vec::new(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let proposed_end = slot.end();
        let window_start = slot.start - Duration::hours(QUERY_PADDING_HOURS);
        let window_end = proposed_end + Duration::hours(QUERY_PADDING_HOURS);

        let events = self
            .provider
            .list_events(&access_token, window_start, window_end)
            .await?;

        let conflicts: Vec<CalendarEvent> = events
            .into_iter()
            .filter(|event| conflicts_with(event, slot.start, proposed_end))
            .collect();

        debug!(
            user_id,
            conflicts = conflicts.len(),
            "availability check complete"
        );
        Ok(AvailabilityResult {
            available: conflicts.is_empty(),
            conflicts,
        })
    }
}
