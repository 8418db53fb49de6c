use serde::{Deserialize, Serialize};

/// Pagination link, either `{"href": "..."}` or a bare URL string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Link {
    Href { href: String },
    Url(String),
}

impl Link {
    pub fn href(&self) -> &str {
        match self {
            Link::Href { href } => href,
            Link::Url(url) => url,
        }
    }
}

/// List envelope returned by collection endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub items: Vec<T>,

    /// Present when the request asked for `count=true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<Link>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<Link>,
}

impl<T> ApiResponse<T> {
    /// Whether items remain after this page, if the envelope says so.
    ///
    /// `totalCount` is authoritative: more remain while the page's offset
    /// (the envelope's own, else `requested_offset`) plus its items is
    /// below it. Without a count, a `next` link means more. `None` when
    /// the envelope carries neither.
    pub fn has_more(&self, requested_offset: i64) -> Option<bool> {
        if let Some(total) = self.total_count {
            let offset = self.offset.unwrap_or(requested_offset).max(0) as u64;
            return Some(offset.saturating_add(self.items.len() as u64) < total);
        }
        self.next.as_ref().map(|_| true)
    }
}
