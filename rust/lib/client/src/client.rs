//! Shared entry point that hands out resource clients over one dispatcher.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::DispatcherConfig;
use crate::dispatch::{Method, RequestDispatcher};
use crate::error::ApiError;
use crate::http::HttpDispatcher;
use crate::resource::ResourceClient;

/// Entry point: one dispatcher shared by every resource client.
///
/// Cheap to clone; clones share the dispatcher.
#[derive(Clone)]
pub struct Client {
    dispatcher: Arc<dyn RequestDispatcher>,
}

impl Client {
    /// HTTP client from static configuration.
    pub fn new(config: DispatcherConfig) -> Result<Self, ApiError> {
        Ok(Self::with_dispatcher(Arc::new(HttpDispatcher::new(config)?)))
    }

    /// Client over any dispatcher (tests, custom transports).
    pub fn with_dispatcher(dispatcher: Arc<dyn RequestDispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Arc<dyn RequestDispatcher> {
        &self.dispatcher
    }

    /// Typed client for the resource at `path` (e.g. `/items`).
    pub fn resource<T: DeserializeOwned>(&self, path: impl Into<String>) -> ResourceClient<T> {
        ResourceClient::new(self.dispatcher.clone(), path)
    }

    /// Raw passthrough to the dispatcher.
    pub async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        self.dispatcher.request(method, path, body).await
    }
}
