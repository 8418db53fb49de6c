//! The generic request primitive every facade funnels through.

use std::fmt;

use serde_json::Value;

use crate::error::ApiError;

/// HTTP verbs used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(m: Method) -> Self {
        match m {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Single-shot request/response exchange.
///
/// `path` is relative to the configured base URL and may carry a query
/// string. Implementations attach credentials and the base URL, enforce
/// their timeout, and must not retry. Failures are reported as
/// [`ApiError::Transport`] (no HTTP answer) or [`ApiError::Remote`]
/// (non-2xx answer).
#[async_trait::async_trait]
pub trait RequestDispatcher: Send + Sync + 'static {
    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, ApiError>;
}
