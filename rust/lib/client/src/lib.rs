//! ERP REST API client.
//!
//! Every entity facade funnels through one [`RequestDispatcher`]. The
//! default [`HttpDispatcher`] attaches the base URL and a bearer token from a
//! pluggable [`TokenSource`], enforces a timeout, and reports failures as
//! [`ApiError::Transport`] or [`ApiError::Remote`]. It never retries.
//!
//! [`ResourceClient`] is the generic facade: it compiles
//! [`SearchCriteria`](erp_query::SearchCriteria) and
//! [`QueryOptions`](erp_query::QueryOptions) with `erp_query` and maps the
//! CRUD verbs and custom actions onto the dispatcher.
//!
//! # Usage
//!
//! ```ignore
//! use erp_client::{Client, DispatcherConfig};
//! use erp_query::{QueryOptions, SearchCriteria, SortSpec};
//!
//! let client = Client::new(DispatcherConfig::new("https://erp.example.com/api/v1").with_token(key))?;
//! let items = client.resource::<serde_json::Value>("/items");
//! let page = items
//!     .list(
//!         Some(&SearchCriteria::new().with("cardType", 1)),
//!         Some(&QueryOptions::new().limit(10).sort(SortSpec::by("CODE"))),
//!     )
//!     .await?;
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod resource;
pub mod response;

pub use auth::{NoAuth, StaticToken, TokenSource};
pub use client::Client;
pub use config::{DispatcherConfig, DEFAULT_TIMEOUT};
pub use dispatch::{Method, RequestDispatcher};
pub use error::ApiError;
pub use http::HttpDispatcher;
pub use resource::{build_path, compose, ResourceClient, DEFAULT_PAGE_SIZE};
pub use response::{ApiResponse, Link};
