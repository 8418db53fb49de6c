//! reqwest-backed [`RequestDispatcher`].

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::{NoAuth, StaticToken, TokenSource};
use crate::config::DispatcherConfig;
use crate::dispatch::{Method, RequestDispatcher};
use crate::error::ApiError;

/// Dispatches requests over HTTP with `reqwest`.
///
/// Holds only static configuration: the base URL, a token source and a
/// client built with the configured timeout. Never retries.
pub struct HttpDispatcher {
    http: reqwest::Client,
    base_url: String,
    token_source: Arc<dyn TokenSource>,
}

impl HttpDispatcher {
    /// Build from config; `config.token` becomes a [`StaticToken`].
    pub fn new(config: DispatcherConfig) -> Result<Self, ApiError> {
        let token_source: Arc<dyn TokenSource> = match &config.token {
            Some(token) => Arc::new(StaticToken::new(token.clone())),
            None => Arc::new(NoAuth),
        };
        Self::with_token_source(config, token_source)
    }

    /// Build with a custom token source; `config.token` is ignored.
    pub fn with_token_source(
        config: DispatcherConfig,
        token_source: Arc<dyn TokenSource>,
    ) -> Result<Self, ApiError> {
        let url = reqwest::Url::parse(&config.base_url)
            .map_err(|e| ApiError::Config(format!("invalid base URL {:?}: {}", config.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "base URL must be http or https, got {:?}",
                config.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("http client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token_source,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base_url}/{path}` with exactly one slash between them.
    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait::async_trait]
impl RequestDispatcher for HttpDispatcher {
    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let url = self.url(path);
        let mut req = self.http.request(method.into(), &url);
        if let Some(body) = body {
            req = req.json(body);
        }
        if let Some(token) = self.token_source.token().await? {
            req = req.bearer_auth(token);
        }

        let started = Instant::now();
        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(%method, path, timeout = e.is_timeout(), "request failed: {}", e);
                return Err(ApiError::Transport(e));
            }
        };

        let status = resp.status();
        let bytes = resp.bytes().await?;
        debug!(
            %method,
            path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );

        if !status.is_success() {
            let payload = serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
            warn!(%method, path, status = status.as_u16(), "remote error: {}", payload);
            return Err(ApiError::Remote {
                status: status.as_u16(),
                payload,
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(format!("response body: {}", e)))
    }
}
