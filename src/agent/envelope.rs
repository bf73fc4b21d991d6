//! Normalizes agent replies into a [`GameSnapshot`].
//!
//! The agent wraps the game payload in an envelope that comes in two
//! shapes:
//!
//! - `{ "success": bool, "response": string | object, "error"?: string }`
//! - `{ "status": "success" | ..., "response": object }`
//!
//! and the payload itself may arrive as an object or as a JSON string.
//! Both envelope shapes are accepted.

use super::error::AgentError;
use crate::games::tictactoe::{GamePayload, GameSnapshot};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Shown when a failure envelope carries no message of its own.
const DEFAULT_FAILURE: &str = "The agent could not process the request.";

/// Outer wrapper around the agent's reply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    /// Success flag (first envelope shape).
    #[serde(default)]
    pub success: Option<bool>,
    /// Status string (second envelope shape).
    #[serde(default)]
    pub status: Option<String>,
    /// The game payload, inline or JSON-encoded.
    #[serde(default)]
    pub response: Option<Value>,
    /// Failure detail.
    #[serde(default)]
    pub error: Option<Value>,
    /// Alternate failure detail.
    #[serde(default)]
    pub message: Option<String>,
}

impl Envelope {
    /// Whether the envelope reports success. An explicit `success` flag
    /// wins over `status`.
    pub fn succeeded(&self) -> bool {
        match self.success {
            Some(flag) => flag,
            None => self.status.as_deref() == Some("success"),
        }
    }

    /// Splits the envelope into its payload or the agent's failure text.
    #[instrument(skip(self), fields(success = ?self.success, status = ?self.status))]
    pub fn into_payload(self) -> Result<ResponsePayload, AgentError> {
        if !self.succeeded() {
            let message = self.failure_message();
            warn!(%message, "Agent reported failure");
            return Err(AgentError::envelope(message));
        }

        match self.response {
            Some(Value::Null) | None => {
                warn!("Success envelope without a response");
                Err(AgentError::envelope(DEFAULT_FAILURE))
            }
            Some(value) => Ok(ResponsePayload::from(value)),
        }
    }

    fn failure_message(&self) -> String {
        let from_error = match &self.error {
            Some(Value::String(text)) => Some(text.clone()),
            Some(Value::Object(map)) => map
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };

        from_error
            .or_else(|| self.message.clone())
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FAILURE.to_string())
    }
}

/// The `response` field: a structured object or that object encoded as
/// a JSON string.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePayload {
    /// Already-structured payload.
    Raw(Value),
    /// JSON-stringified payload.
    Encoded(String),
}

impl From<Value> for ResponsePayload {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => ResponsePayload::Encoded(text),
            other => ResponsePayload::Raw(other),
        }
    }
}

impl ResponsePayload {
    /// Decodes an encoded payload once, leaving raw payloads untouched.
    #[instrument(skip(self))]
    pub fn into_raw(self) -> Result<Value, AgentError> {
        match self {
            ResponsePayload::Raw(value) => Ok(value),
            ResponsePayload::Encoded(text) => {
                debug!(len = text.len(), "Decoding string-encoded payload");
                Ok(serde_json::from_str(&text)?)
            }
        }
    }

    /// Decodes into the typed game payload.
    pub fn into_game_payload(self) -> Result<GamePayload, AgentError> {
        let value = self.into_raw()?;
        if !value.is_object() {
            return Err(AgentError::parse(format!(
                "game payload is not an object: {}",
                value
            )));
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Turns a raw response body into the canonical game snapshot.
///
/// Every failure, including malformed JSON at either level, comes back
/// as an [`AgentError`].
#[instrument(skip(body), fields(len = body.len()))]
pub fn normalize(body: &str) -> Result<GameSnapshot, AgentError> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "Response body is not JSON");
        AgentError::from(e)
    })?;
    if !value.is_object() {
        warn!("Response body is not a JSON object");
        return Err(AgentError::parse(format!(
            "response envelope is not an object: {}",
            value
        )));
    }
    let envelope: Envelope = serde_json::from_value(value)?;

    let payload = envelope.into_payload()?.into_game_payload()?;
    let snapshot = GameSnapshot::try_from(payload)?;

    debug!(status = %snapshot.status(), "Normalized agent response");
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn explicit_success_flag_overrides_status() {
        let envelope: Envelope =
            serde_json::from_value(json!({"success": false, "status": "success"})).unwrap();
        assert!(!envelope.succeeded());

        let envelope: Envelope = serde_json::from_value(json!({"status": "success"})).unwrap();
        assert!(envelope.succeeded());

        let envelope: Envelope = serde_json::from_value(json!({"status": "error"})).unwrap();
        assert!(!envelope.succeeded());
    }

    #[test]
    fn failure_message_falls_back() {
        let envelope: Envelope =
            serde_json::from_value(json!({"success": false, "error": {"message": "busy"}}))
                .unwrap();
        assert_eq!(envelope.failure_message(), "busy");

        let envelope: Envelope =
            serde_json::from_value(json!({"success": false, "error": ""})).unwrap();
        assert_eq!(envelope.failure_message(), DEFAULT_FAILURE);
    }

    #[test]
    fn string_response_is_encoded() {
        assert_eq!(
            ResponsePayload::from(json!("{}")),
            ResponsePayload::Encoded("{}".to_string())
        );
        assert_eq!(
            ResponsePayload::from(json!({})),
            ResponsePayload::Raw(json!({}))
        );
    }

    #[test]
    fn positional_array_is_not_read_as_envelope() {
        let err = normalize(r#"[true, null, {}]"#).unwrap_err();
        assert!(matches!(
            err.kind,
            crate::agent::AgentErrorKind::ParseFailure(_)
        ));
    }

    #[test]
    fn doubly_encoded_payload_is_rejected() {
        let inner = json!({"game_state": {"board": [], "available_moves": []}}).to_string();
        let twice = serde_json::to_string(&inner).unwrap();
        let err = ResponsePayload::Encoded(twice)
            .into_game_payload()
            .unwrap_err();
        assert!(matches!(
            err.kind,
            crate::agent::AgentErrorKind::ParseFailure(_)
        ));
    }
}
