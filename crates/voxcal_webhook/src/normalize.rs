// --- File: crates/voxcal_webhook/src/normalize.rs ---
//! Webhook payload normalization.
//!
//! The upstream voice platform delivers one logical tool invocation in
//! several historical body shapes. This module detects the shape with an
//! explicit tagged union and produces one canonical [`Invocation`], or a
//! structured failure. At most one invocation is processed per delivery:
//! when a call list arrives, only its first element is taken.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("no tool invocation found in webhook body")]
    MissingInvocation,
    #[error("unknown function: {0}")]
    UnknownFunction(String),
    #[error("no user identity found in webhook body")]
    MissingUserIdentity,
    #[error("malformed tool arguments: {0}")]
    MalformedArguments(String),
}

/// The functions this service answers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolFunction {
    CheckAvailability,
    BookMeeting,
}

impl ToolFunction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "check_calendar_availability" => Some(Self::CheckAvailability),
            "book_calendar_meeting" => Some(Self::BookMeeting),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::CheckAvailability => "check_calendar_availability",
            Self::BookMeeting => "book_calendar_meeting",
        }
    }
}

/// One canonical tool invocation extracted from a webhook body.
#[derive(Debug)]
pub struct Invocation {
    pub function: ToolFunction,
    /// Always a JSON object after normalization.
    pub arguments: Value,
    /// Correlation id from the platform, when the shape carries one.
    pub tool_call_id: Option<String>,
}

/// The known body shapes, detected before any field is interpreted.
#[derive(Debug)]
enum RawShape<'a> {
    /// `message.toolCallList[]`, calls shaped
    /// `{id, function: {name, arguments: <JSON string or object>}}`.
    CallList(&'a Value),
    /// `message.toolCalls[]`, calls shaped `{id, name, arguments: object}`.
    CallsList(&'a Value),
    /// `message.functionCall` shaped `{name, parameters: object}`.
    Embedded(&'a Value),
}

fn detect(body: &Value) -> Option<RawShape<'_>> {
    let message = body.get("message").unwrap_or(body);

    if let Some(first) = message
        .get("toolCallList")
        .and_then(Value::as_array)
        .and_then(|list| list.first())
    {
        return Some(RawShape::CallList(first));
    }
    if let Some(first) = message
        .get("toolCalls")
        .and_then(Value::as_array)
        .and_then(|list| list.first())
    {
        return Some(RawShape::CallsList(first));
    }
    if let Some(call) = message.get("functionCall") {
        return Some(RawShape::Embedded(call));
    }
    None
}

/// Arguments may arrive as an object or as a JSON-encoded string.
fn coerce_arguments(raw: Option<&Value>) -> Result<Value, NormalizeError> {
    match raw {
        None | Some(Value::Null) => Ok(Value::Object(Default::default())),
        Some(Value::Object(map)) => Ok(Value::Object(map.clone())),
        Some(Value::String(text)) => {
            let parsed: Value = serde_json::from_str(text)
                .map_err(|e| NormalizeError::MalformedArguments(e.to_string()))?;
            if !parsed.is_object() {
                return Err(NormalizeError::MalformedArguments(format!(
                    "expected object, got {}",
                    parsed
                )));
            }
            Ok(parsed)
        }
        Some(other) => Err(NormalizeError::MalformedArguments(format!(
            "expected object, got {}",
            other
        ))),
    }
}

fn function_from(name: Option<&Value>) -> Result<ToolFunction, NormalizeError> {
    let name = name
        .and_then(Value::as_str)
        .ok_or(NormalizeError::MissingInvocation)?;
    ToolFunction::from_name(name).ok_or_else(|| NormalizeError::UnknownFunction(name.to_string()))
}

/// Extract exactly one canonical invocation from a webhook body.
pub fn extract_invocation(body: &Value) -> Result<Invocation, NormalizeError> {
    let shape = detect(body).ok_or(NormalizeError::MissingInvocation)?;

    match shape {
        RawShape::CallList(call) => {
            let function = call.get("function");
            Ok(Invocation {
                function: function_from(function.and_then(|f| f.get("name")))?,
                arguments: coerce_arguments(function.and_then(|f| f.get("arguments")))?,
                tool_call_id: call.get("id").and_then(Value::as_str).map(str::to_string),
            })
        }
        RawShape::CallsList(call) => Ok(Invocation {
            function: function_from(call.get("name"))?,
            arguments: coerce_arguments(call.get("arguments"))?,
            tool_call_id: call.get("id").and_then(Value::as_str).map(str::to_string),
        }),
        RawShape::Embedded(call) => Ok(Invocation {
            function: function_from(call.get("name"))?,
            arguments: coerce_arguments(call.get("parameters"))?,
            tool_call_id: None,
        }),
    }
}

fn user_id_at<'a>(location: Option<&'a Value>) -> Option<&'a str> {
    let location = location?;
    location
        .get("userId")
        .or_else(|| location.get("user_id"))
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}

/// Resolve the user identity from its known payload locations, in fixed
/// priority order. Fails closed: the only fallback is an explicitly
/// configured test identity, gated behind test mode.
pub fn resolve_user_id(
    body: &Value,
    test_fallback: Option<&str>,
) -> Result<String, NormalizeError> {
    let message = body.get("message").unwrap_or(body);

    let found = user_id_at(body.get("call").and_then(|c| c.get("metadata")))
        .or_else(|| {
            user_id_at(
                message
                    .get("assistant")
                    .and_then(|a| a.get("variableValues")),
            )
        })
        .or_else(|| user_id_at(message.get("call").and_then(|c| c.get("metadata"))));

    if let Some(user_id) = found {
        return Ok(user_id.to_string());
    }
    if let Some(fallback) = test_fallback {
        warn!("no user identity in payload, using configured test identity");
        return Ok(fallback.to_string());
    }
    Err(NormalizeError::MissingUserIdentity)
}
