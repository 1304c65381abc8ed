use serde_json::Value;
use thiserror::Error;

const GENERIC_REJECTION: &str = "The server rejected the request";

/// Every failure the backend can hand back, normalized into one type.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// A 200 response whose envelope carried `success: false`.
    #[error("{message}")]
    Rejected { message: String },

    #[error("Unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid backend URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ApiError {
    /// The one-line text shown to the user. Every variant is reported the
    /// same way; only the text differs.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(err) if err.is_timeout() => {
                "The server did not respond in time".to_string()
            }
            ApiError::Transport(_) => "Could not reach the server".to_string(),
            ApiError::Http { message, .. } | ApiError::Rejected { message } => message.clone(),
            ApiError::Decode { endpoint, .. } => {
                format!("The server sent an unexpected response for {endpoint}")
            }
            ApiError::InvalidUrl { .. } => self.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    pub(crate) fn rejected(message: Option<String>, error: Option<String>) -> Self {
        let non_blank = |text: &String| !text.trim().is_empty();
        let message = message
            .filter(non_blank)
            .or(error.filter(non_blank))
            .unwrap_or_else(|| GENERIC_REJECTION.to_string());
        ApiError::Rejected { message }
    }

    pub(crate) fn decode(endpoint: &str, source: serde_json::Error) -> Self {
        ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        }
    }
}

/// Extract a readable message from a non-2xx response body.
///
/// Tries `_server_messages` (a JSON string holding an array of JSON-encoded
/// message objects), then `message`, then `exception`/`exc_type`, and falls
/// back to a generic line carrying the status code.
pub fn normalize_error_body(status: u16, body: &str) -> String {
    let fallback = || format!("Request failed with status {status}");

    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
        return fallback();
    };

    if let Some(messages) = map
        .get("_server_messages")
        .and_then(Value::as_str)
        .and_then(parse_server_messages)
    {
        return messages;
    }

    for key in ["message", "exception", "exc_type"] {
        if let Some(text) = map.get(key).and_then(Value::as_str) {
            if !text.trim().is_empty() {
                return text.to_string();
            }
        }
    }

    fallback()
}

fn parse_server_messages(raw: &str) -> Option<String> {
    let entries: Vec<String> = serde_json::from_str(raw).ok()?;
    let messages: Vec<String> = entries
        .iter()
        .filter_map(|entry| match serde_json::from_str::<Value>(entry) {
            Ok(Value::Object(obj)) => obj
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            Ok(Value::String(text)) => Some(text),
            _ => Some(entry.clone()),
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    if messages.is_empty() {
        None
    } else {
        Some(messages.join("\n"))
    }
}
