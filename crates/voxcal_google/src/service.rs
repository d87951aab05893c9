// --- File: crates/voxcal_google/src/service.rs ---
//! Google Calendar provider implementation.
//!
//! Talks to the Calendar v3 REST surface directly with the user's OAuth
//! access token. Unlike a service-account integration there is no shared
//! hub; every call is authenticated with the per-request token handed in
//! by the token lifecycle manager.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use voxcal_common::services::{
    BoxFuture, CalendarEvent, CalendarProvider, CreateEventRequest, CreatedEvent, ProviderError,
    BUSY_TITLE,
};

/// Google Calendar client over the v3 REST API.
pub struct GoogleCalendarClient {
    http: reqwest::Client,
    api_base: String,
    calendar_id: String,
}

impl GoogleCalendarClient {
    /// Create a new client. `api_base` has no trailing slash,
    /// e.g. `https://www.googleapis.com/calendar/v3`.
    pub fn new(http: reqwest::Client, api_base: String, calendar_id: String) -> Self {
        Self {
            http,
            api_base,
            calendar_id,
        }
    }

    /// The calendar id goes through Url's segment encoding; ids are often
    /// email addresses and must not be spliced into the path raw.
    fn events_url(&self) -> Result<reqwest::Url, String> {
        let mut url = reqwest::Url::parse(&self.api_base).map_err(|e| e.to_string())?;
        url.path_segments_mut()
            .map_err(|_| format!("api_base is not a valid base url: {}", self.api_base))?
            .extend(["calendars", self.calendar_id.as_str(), "events"]);
        Ok(url)
    }
}

// --- Wire types (Calendar v3) ---

#[derive(Debug, Deserialize)]
struct EventsListResponse {
    #[serde(default)]
    items: Vec<GoogleEvent>,
}

#[derive(Debug, Deserialize)]
struct GoogleEvent {
    id: Option<String>,
    summary: Option<String>,
    status: Option<String>,
    start: Option<GoogleEventTime>,
    end: Option<GoogleEventTime>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GoogleEventTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    date_time: Option<DateTime<Utc>>,
    /// Set instead of `date_time` for all-day events (YYYY-MM-DD).
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertEventBody {
    summary: String,
    description: String,
    start: GoogleEventTime,
    end: GoogleEventTime,
    attendees: Vec<Attendee>,
    reminders: Reminders,
}

#[derive(Debug, Serialize)]
struct Attendee {
    email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Reminders {
    use_default: bool,
    overrides: Vec<ReminderOverride>,
}

#[derive(Debug, Serialize)]
struct ReminderOverride {
    method: String,
    minutes: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertEventResponse {
    id: String,
    html_link: Option<String>,
}

/// Resolve one end of an event interval. All-day events only carry a
/// date; treat it as midnight UTC so interval arithmetic stays uniform.
fn event_bound(time: Option<GoogleEventTime>) -> Option<(DateTime<Utc>, bool)> {
    let time = time?;
    if let Some(dt) = time.date_time {
        return Some((dt, false));
    }
    let date = time.date?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some((midnight.and_utc(), true))
}

impl CalendarProvider for GoogleCalendarClient {
    fn list_events(
        &self,
        access_token: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<CalendarEvent>, ProviderError> {
        let access_token = access_token.to_string();
        let url = self.events_url();

        Box::pin(async move {
            let url = url.map_err(ProviderError::QueryFailed)?;
            let response = self
                .http
                .get(url)
                .bearer_auth(&access_token)
                .query(&[
                    ("timeMin", time_min.to_rfc3339()),
                    ("timeMax", time_max.to_rfc3339()),
                    ("singleEvents", "true".to_string()),
                    ("orderBy", "startTime".to_string()),
                ])
                .send()
                .await
                .map_err(|e| ProviderError::QueryFailed(e.to_string()))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(ProviderError::QueryFailed(format!(
                    "events.list returned {}: {}",
                    status, body
                )));
            }

            let listing: EventsListResponse = response
                .json()
                .await
                .map_err(|e| ProviderError::QueryFailed(e.to_string()))?;

            let mut events = Vec::new();
            for item in listing.items {
                if item.status.as_deref() == Some("cancelled") {
                    continue;
                }
                let (start, start_all_day) = match event_bound(item.start) {
                    Some(bound) => bound,
                    None => {
                        debug!("skipping event without usable start: {:?}", item.id);
                        continue;
                    }
                };
                let (end, _) = match event_bound(item.end) {
                    Some(bound) => bound,
                    None => {
                        debug!("skipping event without usable end: {:?}", item.id);
                        continue;
                    }
                };
                events.push(CalendarEvent {
                    id: item.id.unwrap_or_default(),
                    title: item.summary.unwrap_or_else(|| BUSY_TITLE.to_string()),
                    start,
                    end,
                    all_day: start_all_day,
                });
            }
            Ok(events)
        })
    }

    fn create_event(
        &self,
        access_token: &str,
        request: CreateEventRequest,
    ) -> BoxFuture<'_, CreatedEvent, ProviderError> {
        let access_token = access_token.to_string();
        let url = self.events_url();

        Box::pin(async move {
            let url = url.map_err(ProviderError::CreateFailed)?;
            let body = InsertEventBody {
                summary: request.title,
                description: request.description,
                start: GoogleEventTime {
                    date_time: Some(request.start),
                    time_zone: Some("UTC".to_string()),
                    ..Default::default()
                },
                end: GoogleEventTime {
                    date_time: Some(request.end),
                    time_zone: Some("UTC".to_string()),
                    ..Default::default()
                },
                attendees: request
                    .attendee_emails
                    .into_iter()
                    .map(|email| Attendee { email })
                    .collect(),
                reminders: Reminders {
                    use_default: false,
                    overrides: vec![
                        ReminderOverride {
                            method: "email".to_string(),
                            minutes: 24 * 60,
                        },
                        ReminderOverride {
                            method: "popup".to_string(),
                            minutes: 30,
                        },
                    ],
                },
            };

            let response = self
                .http
                .post(url)
                .bearer_auth(&access_token)
                .json(&body)
                .send()
                .await
                .map_err(|e| ProviderError::CreateFailed(e.to_string()))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(ProviderError::CreateFailed(format!(
                    "events.insert returned {}: {}",
                    status, body
                )));
            }

            let created: InsertEventResponse = response
                .json()
                .await
                .map_err(|e| ProviderError::CreateFailed(e.to_string()))?;

            Ok(CreatedEvent {
                event_id: created.id,
                event_url: created.html_link,
            })
        })
    }
}
