//! Credentials attached to every dispatched request.

use crate::error::ApiError;

/// Pluggable token provider. Called before every request.
///
/// Returns `Ok(None)` to skip the Authorization header (anonymous).
/// Acquiring or refreshing tokens is up to the implementation; the
/// dispatcher only asks.
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync + 'static {
    async fn token(&self) -> Result<Option<String>, ApiError>;
}

/// No authentication.
pub struct NoAuth;

#[async_trait::async_trait]
impl TokenSource for NoAuth {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(None)
    }
}

/// Fixed bearer token or API key, obtained outside the SDK.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait::async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(Some(self.0.clone()))
    }
}
