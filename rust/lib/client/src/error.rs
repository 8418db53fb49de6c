use serde_json::Value;

/// Client-side API error.
///
/// Transport failures (the request never got an HTTP answer) and remote
/// failures (the server answered with a non-2xx status) are distinct
/// variants so callers can tell "unreachable" from "refused".
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network failure, timeout, connection refused.
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. `payload` is the provider's error body, parsed as
    /// JSON when possible and kept as a JSON string otherwise.
    #[error("HTTP {status}: {payload}")]
    Remote { status: u16, payload: Value },

    /// A request body that cannot be serialized to JSON.
    #[error("encode: {0}")]
    Encode(String),

    /// A 2xx body that does not match the expected shape.
    #[error("decode: {0}")]
    Decode(String),

    /// Unusable dispatcher configuration.
    #[error("config: {0}")]
    Config(String),

    /// The token source could not produce credentials.
    #[error("auth: {0}")]
    Auth(String),
}

impl ApiError {
    /// HTTP status of a remote failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Transport(e) if e.is_timeout())
    }

    /// Human-readable message from the provider payload, if it carries one
    /// under `message`, `error` or `Message`.
    pub fn provider_message(&self) -> Option<&str> {
        let ApiError::Remote { payload, .. } = self else {
            return None;
        };
        if let Some(s) = payload.as_str() {
            return Some(s);
        }
        ["message", "error", "Message"]
            .iter()
            .find_map(|key| payload.get(*key).and_then(Value::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_status_and_message() {
        let err = ApiError::Remote {
            status: 404,
            payload: serde_json::json!({"message": "item 'X' not found"}),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.provider_message(), Some("item 'X' not found"));
        assert!(!err.is_transport());
        assert!(!err.is_timeout());
    }

    #[test]
    fn plain_text_payload() {
        let err = ApiError::Remote {
            status: 502,
            payload: Value::String("bad gateway".into()),
        };
        assert_eq!(err.provider_message(), Some("bad gateway"));
        assert_eq!(err.to_string(), "HTTP 502: \"bad gateway\"");
    }

    #[test]
    fn non_remote_has_no_status() {
        assert_eq!(ApiError::Decode("x".into()).status(), None);
        assert_eq!(ApiError::Config("x".into()).provider_message(), None);
    }
}
