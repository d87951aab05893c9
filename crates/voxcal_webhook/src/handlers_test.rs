#[cfg(test)]
mod tests {
    use crate::routes::routes;
    use crate::test_support::{
        build_state, connected_integration, event, ScriptedExchanger, ScriptedProvider,
    };
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;
    use voxcal_common::InMemoryIntegrationStore;

    async fn post_webhook(
        state: Arc<crate::handlers::WebhookState>,
        body: Value,
    ) -> (StatusCode, Value) {
        let app = routes(state);
        let request = Request::builder()
            .method("POST")
            .uri("/webhook/voice")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let parsed = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(
                String::from_utf8_lossy(&bytes).to_string(),
            ))
        };
        (status, parsed)
    }

    fn availability_body(date: &str, time: &str) -> Value {
        json!({
            "message": {
                "toolCallList": [{
                    "id": "call-1",
                    "function": {
                        "name": "check_calendar_availability",
                        "arguments": { "date": date, "time": time }
                    }
                }],
                "call": { "metadata": { "userId": "user-1" } }
            }
        })
    }

    #[tokio::test]
    async fn test_availability_check_free_slot_says_available() {
        let store = Arc::new(InMemoryIntegrationStore::new());
        store.upsert(connected_integration("user-1"));
        let state = build_state(
            Arc::new(ScriptedProvider::new()),
            store,
            Arc::new(ScriptedExchanger::granting("fresh", 3600)),
        );

        let (status, body) = post_webhook(state, availability_body("2026-01-20", "14:00")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["message"].as_str().unwrap().contains("is available"));
        assert_eq!(body["toolCallId"], "call-1");
    }

    #[tokio::test]
    async fn test_availability_check_conflict_names_the_event() {
        let start = Utc.with_ymd_and_hms(2026, 1, 20, 14, 0, 0).unwrap();
        let store = Arc::new(InMemoryIntegrationStore::new());
        store.upsert(connected_integration("user-1"));
        let state = build_state(
            Arc::new(ScriptedProvider::with_events(vec![event(
                "Standup", start, 30,
            )])),
            store,
            Arc::new(ScriptedExchanger::granting("fresh", 3600)),
        );

        let (status, body) = post_webhook(state, availability_body("2026-01-20", "14:00")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("Standup"));
    }

    #[tokio::test]
    async fn test_booking_available_slot_returns_event_id() {
        let store = Arc::new(InMemoryIntegrationStore::new());
        store.upsert(connected_integration("user-1"));
        let provider = Arc::new(ScriptedProvider::new());
        let state = build_state(
            provider.clone(),
            store,
            Arc::new(ScriptedExchanger::granting("fresh", 3600)),
        );

        let body = json!({
            "message": {
                "toolCallList": [{
                    "id": "call-2",
                    "function": {
                        "name": "book_calendar_meeting",
                        "arguments": {
                            "date": "2026-01-20",
                            "time": "14:00",
                            "end_time": "15:00",
                            "attendee_name": "Ada",
                            "attendee_email": "ada@example.com"
                        }
                    }
                }],
                "call": { "metadata": { "userId": "user-1" } }
            }
        });
        let (status, response) = post_webhook(state, body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["success"], true);
        assert!(!response["eventId"].as_str().unwrap().is_empty());
        assert_eq!(provider.create_call_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_function_is_rejected_outright() {
        let state = build_state(
            Arc::new(ScriptedProvider::new()),
            Arc::new(InMemoryIntegrationStore::new()),
            Arc::new(ScriptedExchanger::granting("fresh", 3600)),
        );

        let body = json!({
            "message": {
                "functionCall": { "name": "order_pizza", "parameters": {} }
            }
        });
        let (status, _) = post_webhook(state, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_identity_gets_generic_message() {
        let state = build_state(
            Arc::new(ScriptedProvider::new()),
            Arc::new(InMemoryIntegrationStore::new()),
            Arc::new(ScriptedExchanger::granting("fresh", 3600)),
        );

        let body = json!({
            "message": {
                "toolCallList": [{
                    "id": "call-3",
                    "function": {
                        "name": "check_calendar_availability",
                        "arguments": { "date": "2026-01-20", "time": "14:00" }
                    }
                }]
            }
        });
        let (status, response) = post_webhook(state, body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["success"], false);
        let message = response["message"].as_str().unwrap();
        // Generic wording, no internal identifiers.
        assert!(message.contains("calendar"));
        assert!(!message.contains("userId"));
        assert_eq!(response["toolCallId"], "call-3");
    }

    #[tokio::test]
    async fn test_missing_date_prompts_for_clarification() {
        let store = Arc::new(InMemoryIntegrationStore::new());
        store.upsert(connected_integration("user-1"));
        let state = build_state(
            Arc::new(ScriptedProvider::new()),
            store,
            Arc::new(ScriptedExchanger::granting("fresh", 3600)),
        );

        let body = json!({
            "message": {
                "toolCallList": [{
                    "id": "call-4",
                    "function": {
                        "name": "check_calendar_availability",
                        "arguments": { "time": "14:00" }
                    }
                }],
                "call": { "metadata": { "userId": "user-1" } }
            }
        });
        let (status, response) = post_webhook(state, body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["success"], false);
        assert!(response["message"].as_str().unwrap().contains("date"));
    }

    #[tokio::test]
    async fn test_backwards_end_time_is_rejected() {
        let store = Arc::new(InMemoryIntegrationStore::new());
        store.upsert(connected_integration("user-1"));
        let provider = Arc::new(ScriptedProvider::new());
        let state = build_state(
            provider.clone(),
            store,
            Arc::new(ScriptedExchanger::granting("fresh", 3600)),
        );

        let body = json!({
            "message": {
                "toolCallList": [{
                    "id": "call-5",
                    "function": {
                        "name": "book_calendar_meeting",
                        "arguments": {
                            "date": "2026-01-20",
                            "time": "14:00",
                            "end_time": "13:00",
                            "attendee_name": "Ada"
                        }
                    }
                }],
                "call": { "metadata": { "userId": "user-1" } }
            }
        });
        let (status, response) = post_webhook(state, body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["success"], false);
        assert!(response["message"]
            .as_str()
            .unwrap()
            .contains("after the start time"));
        assert_eq!(provider.create_call_count(), 0);
    }
}
