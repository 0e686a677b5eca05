//! Backend error normalization.
//!
//! The backend reports failures as `{"error": ...}`, `{"message": ...}`,
//! a bare string, or an arbitrary object. All of them become one
//! [`ApiError`] carrying a human-readable `reason`, so call sites never
//! branch on payload shape.

use serde_json::Value;

/// Longest plain-text body kept as a reason.
const MAX_TEXT_REASON: usize = 200;

/// Error type for backend operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("HTTP {status} from {endpoint}{}", reason_suffix(.reason))]
    Http {
        endpoint: &'static str,
        status: u16,
        reason: String,
    },

    /// No response arrived.
    #[error("Network error calling {endpoint}: {reason}")]
    Network {
        endpoint: &'static str,
        reason: String,
    },

    /// A success response whose body could not be decoded.
    #[error("Unexpected response from {endpoint}: {reason}")]
    Decode {
        endpoint: &'static str,
        reason: String,
    },

    /// The request body could not be encoded.
    #[error("Failed to encode request for {endpoint}: {reason}")]
    Encode {
        endpoint: &'static str,
        reason: String,
    },

    /// Reading the bearer token failed.
    #[error("Credential store error: {0}")]
    Credentials(String),
}

fn reason_suffix(reason: &str) -> String {
    if reason.is_empty() {
        String::new()
    } else {
        format!(": {}", reason)
    }
}

impl ApiError {
    /// Build an HTTP error from a raw response body.
    pub fn from_response(endpoint: &'static str, status: u16, body: &[u8]) -> Self {
        ApiError::Http {
            endpoint,
            status,
            reason: extract_reason(body),
        }
    }

    /// Human-readable reason. Empty when the backend gave none.
    pub fn reason(&self) -> &str {
        match self {
            ApiError::Http { reason, .. }
            | ApiError::Network { reason, .. }
            | ApiError::Decode { reason, .. }
            | ApiError::Encode { reason, .. } => reason,
            ApiError::Credentials(reason) => reason,
        }
    }

    /// Reason, or `fallback` when the backend gave none.
    pub fn reason_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        let reason = self.reason();
        if reason.trim().is_empty() {
            fallback
        } else {
            reason
        }
    }

    /// HTTP status, when a response arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if no response arrived.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }

    /// Check if the backend reported a server-side failure.
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Check if the backend rejected the caller's credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

/// Pull a human-readable reason out of an error body.
///
/// Looks at `error` then `message`, accepts a bare JSON string, and falls
/// back to the compact JSON of any other non-empty value. Short plain-text
/// bodies are kept as-is; HTML and empty bodies yield an empty reason.
pub fn extract_reason(body: &[u8]) -> String {
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => reason_from_value(&value),
        Err(_) => {
            let text = String::from_utf8_lossy(body);
            let text = text.trim();
            if text.is_empty() || text.starts_with('<') || text.len() > MAX_TEXT_REASON {
                String::new()
            } else {
                text.to_string()
            }
        }
    }
}

fn reason_from_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Object(map) => {
            for key in ["error", "message"] {
                match map.get(key) {
                    Some(Value::String(s)) if !s.trim().is_empty() => return s.trim().to_string(),
                    Some(nested @ Value::Object(_)) => {
                        let reason = reason_from_value(nested);
                        if !reason.is_empty() {
                            return reason;
                        }
                    }
                    _ => {}
                }
            }
            if map.is_empty() {
                String::new()
            } else {
                value.to_string()
            }
        }
        Value::Array(items) if items.is_empty() => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_field_preferred() {
        let body = br#"{"error": "Card declined", "message": "ignored"}"#;
        assert_eq!(extract_reason(body), "Card declined");
    }

    #[test]
    fn test_message_field() {
        assert_eq!(extract_reason(br#"{"message": "Cart is empty"}"#), "Cart is empty");
    }

    #[test]
    fn test_nested_error_object() {
        let body = br#"{"error": {"message": "Stripe unavailable", "code": 7}}"#;
        assert_eq!(extract_reason(body), "Stripe unavailable");
    }

    #[test]
    fn test_bare_string_and_raw_object() {
        assert_eq!(extract_reason(br#""Out of stock""#), "Out of stock");
        assert_eq!(extract_reason(br#"{"code": 12}"#), r#"{"code":12}"#);
    }

    #[test]
    fn test_unreadable_bodies_give_empty_reason() {
        assert_eq!(extract_reason(b""), "");
        assert_eq!(extract_reason(b"null"), "");
        assert_eq!(extract_reason(b"{}"), "");
        assert_eq!(extract_reason(b"<html><body>502</body></html>"), "");
    }

    #[test]
    fn test_plain_text_body() {
        assert_eq!(extract_reason(b"Service Unavailable\n"), "Service Unavailable");
    }

    #[test]
    fn test_reason_or_fallback() {
        let err = ApiError::from_response("checkout_cod", 500, b"");
        assert_eq!(err.reason_or("Failed to place order."), "Failed to place order.");
        assert!(err.is_server_error());
        assert_eq!(err.to_string(), "HTTP 500 from checkout_cod");

        let err = ApiError::from_response("checkout_cod", 400, br#"{"message":"Bad address"}"#);
        assert_eq!(err.reason_or("fallback"), "Bad address");
        assert_eq!(err.to_string(), "HTTP 400 from checkout_cod: Bad address");
    }
}
