//! Generic entity facade.
//!
//! [`ResourceClient`] is the one implementation behind every per-entity
//! client: it compiles criteria and options, assembles the path and hands
//! the call to a [`RequestDispatcher`]. Dispatcher errors are returned as-is.

use std::marker::PhantomData;
use std::sync::Arc;

use erp_query::{build_query, compile_filter, encode_component, QueryOptions, SearchCriteria};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::dispatch::{Method, RequestDispatcher};
use crate::error::ApiError;
use crate::response::ApiResponse;

/// Page size used by [`ResourceClient::list_all`] when the options carry
/// no positive `limit`.
pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Merge criteria into options: the compiled filter becomes `q`, ANDed
/// after any `q` the options already carry.
///
/// A non-blank existing `q` is wrapped in parentheses first, unless it is
/// already a single parenthesized group, so a top-level `or` in it keeps
/// its meaning.
pub fn compose(criteria: Option<&SearchCriteria>, options: Option<&QueryOptions>) -> QueryOptions {
    let mut merged = options.cloned().unwrap_or_default();
    if let Some(filter) = criteria.and_then(compile_filter) {
        let existing = merged.q.as_deref().map(group);
        merged.q = build_query(existing.iter().map(String::as_str).chain([filter.as_str()]));
    }
    merged
}

/// `q` as one group: unchanged if blank or already `( ... )`, else wrapped.
fn group(q: &str) -> String {
    let trimmed = q.trim();
    if trimmed.is_empty() || is_single_group(trimmed) {
        trimmed.to_string()
    } else {
        format!("({trimmed})")
    }
}

/// Whether the opening `(` closes at the very last character. Parentheses
/// inside quoted literals are ignored; a doubled `''` toggles twice.
fn is_single_group(s: &str) -> bool {
    if !s.starts_with('(') {
        return false;
    }
    let mut depth = 0usize;
    let mut quoted = false;
    for (i, ch) in s.char_indices() {
        match ch {
            '\'' => quoted = !quoted,
            '(' if !quoted => depth += 1,
            ')' if !quoted => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i + 1 == s.len();
                }
            }
            _ => {}
        }
    }
    false
}

/// `{resource}[/{segment}...][?{query}]`. Segments are percent-encoded;
/// `resource` and `query` are used verbatim.
pub fn build_path(resource: &str, segments: &[&str], query: &str) -> String {
    let mut path = resource.trim_end_matches('/').to_string();
    for segment in segments {
        path.push('/');
        path.push_str(&encode_component(segment));
    }
    if !query.is_empty() {
        path.push('?');
        path.push_str(query);
    }
    path
}

/// Typed CRUD and action client for one resource path (e.g. `/items`).
pub struct ResourceClient<T> {
    dispatcher: Arc<dyn RequestDispatcher>,
    path: String,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            path: self.path.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> ResourceClient<T> {
    pub fn new(dispatcher: Arc<dyn RequestDispatcher>, path: impl Into<String>) -> Self {
        Self {
            dispatcher,
            path: path.into(),
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    async fn call<R: DeserializeOwned>(&self, method: Method, path: &str, body: Option<&Value>) -> Result<R, ApiError> {
        let value = self.dispatcher.request(method, path, body).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("{} {}: {}", method, path, e)))
    }

    fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
        serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))
    }

    fn action_base(&self, action: &str) -> String {
        format!("{}/{}", self.path.trim_end_matches('/'), action.trim_matches('/'))
    }

    /// GET the collection.
    pub async fn list(
        &self,
        criteria: Option<&SearchCriteria>,
        options: Option<&QueryOptions>,
    ) -> Result<ApiResponse<T>, ApiError> {
        let query = compose(criteria, options).to_query_string();
        self.call(Method::Get, &build_path(&self.path, &[], &query), None).await
    }

    /// GET `/{id}`.
    pub async fn get(&self, id: &str, options: Option<&QueryOptions>) -> Result<T, ApiError> {
        let query = erp_query::compile_query(options);
        self.call(Method::Get, &build_path(&self.path, &[id], &query), None).await
    }

    /// POST a new record.
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<T, ApiError> {
        let body = Self::encode_body(body)?;
        self.call(Method::Post, &self.path, Some(&body)).await
    }

    /// PUT a full replacement of `/{id}`.
    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, body: &B) -> Result<T, ApiError> {
        let body = Self::encode_body(body)?;
        self.call(Method::Put, &build_path(&self.path, &[id], ""), Some(&body)).await
    }

    /// PATCH `/{id}` with a partial body.
    pub async fn patch<B: Serialize + ?Sized>(&self, id: &str, body: &B) -> Result<T, ApiError> {
        let body = Self::encode_body(body)?;
        self.call(Method::Patch, &build_path(&self.path, &[id], ""), Some(&body)).await
    }

    /// DELETE `/{id}`. The response body is ignored.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.dispatcher
            .request(Method::Delete, &build_path(&self.path, &[id], ""), None)
            .await?;
        Ok(())
    }

    /// GET a custom action: `/{action}/{params...}?{query}`.
    pub async fn action_get<R: DeserializeOwned>(
        &self,
        action: &str,
        params: &[&str],
        options: Option<&QueryOptions>,
    ) -> Result<R, ApiError> {
        let query = erp_query::compile_query(options);
        let path = build_path(&self.action_base(action), params, &query);
        self.call(Method::Get, &path, None).await
    }

    /// POST a custom action: `/{action}/{params...}` with an optional body.
    pub async fn action_post<R: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        action: &str,
        params: &[&str],
        body: Option<&B>,
    ) -> Result<R, ApiError> {
        let body = body.map(Self::encode_body).transpose()?;
        let path = build_path(&self.action_base(action), params, "");
        self.call(Method::Post, &path, body.as_ref()).await
    }

    /// Follow `offset` pages until the collection is exhausted.
    ///
    /// Stops when `totalCount` is reached, when a page comes back short
    /// (and no `next` link says otherwise), or on an empty page. Requests
    /// are sequential; the first error aborts and is returned unchanged.
    pub async fn list_all(
        &self,
        criteria: Option<&SearchCriteria>,
        options: Option<&QueryOptions>,
    ) -> Result<Vec<T>, ApiError> {
        let mut page = compose(criteria, options);
        let page_size = page.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_PAGE_SIZE);
        page.limit = Some(page_size);
        let mut offset = page.offset.unwrap_or(0).max(0);
        let mut all = Vec::new();

        loop {
            page.offset = Some(offset);
            let path = build_path(&self.path, &[], &page.to_query_string());
            let resp: ApiResponse<T> = self.call(Method::Get, &path, None).await?;

            let received = resp.items.len() as i64;
            let more = resp.has_more(offset).unwrap_or(received == page_size);
            debug!(path = %self.path, offset, received, more, "fetched page");

            all.extend(resp.items);
            if received == 0 || !more {
                break;
            }
            offset += received;
        }
        Ok(all)
    }
}
