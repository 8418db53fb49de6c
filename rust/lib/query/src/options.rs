//! Query-options compiler.
//!
//! [`compile_query`] renders pagination, projection, sort and filter
//! options as a URL query string (no leading `?`). Parameters always come
//! out in the same order so equal options produce byte-identical strings:
//!
//! `limit`, `offset`, `fields`, `sort`, `q`, `count`, `expandLevel`, then
//! extension keys in ascending key order.
//!
//! Values are not validated: a negative `limit` is sent as given.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use crate::encode::{encode_component, encode_list};

/// Parameter names emitted by the compiler itself. Extension keys with one
/// of these names are ignored.
const RECOGNIZED: [&str; 7] = ["limit", "offset", "fields", "sort", "q", "count", "expandLevel"];

// ── Sort ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(ParseSortError(format!("unknown sort direction `{other}`"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid sort: {0}")]
pub struct ParseSortError(String);

/// Sort specification: one or more fields and a direction (default `asc`).
///
/// Every accepted source form normalizes to `field[,field...][,desc]`:
///
/// | form                 | constructor                                  |
/// |----------------------|----------------------------------------------|
/// | `[field]`            | `SortSpec::by("CODE")`                       |
/// | `[field, dir]`       | `SortSpec::by("CODE").desc()`                |
/// | `[fieldList, dir]`   | `SortSpec::by_fields(["TITLE", "CODE"]).desc()` |
/// | `[fieldList]`        | `SortSpec::by_fields(["TITLE", "CODE"])`     |
///
/// `asc` is the default and is never written out, so `[field]` and
/// `[field, 'asc']` compile to the same parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortSpec {
    fields: Vec<String>,
    direction: SortDirection,
}

impl SortSpec {
    pub fn by(field: impl Into<String>) -> Self {
        Self {
            fields: vec![field.into()],
            direction: SortDirection::Asc,
        }
    }

    pub fn by_fields<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            direction: SortDirection::Asc,
        }
    }

    pub fn asc(self) -> Self {
        self.direction(SortDirection::Asc)
    }

    pub fn desc(self) -> Self {
        self.direction(SortDirection::Desc)
    }

    pub fn direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.direction
    }

    /// Percent-encoded `sort` value, or `None` when there are no fields.
    fn to_param(&self) -> Option<String> {
        if self.fields.is_empty() {
            return None;
        }
        let mut value = encode_list(&self.fields);
        if self.direction == SortDirection::Desc {
            value.push_str(",desc");
        }
        Some(value)
    }

    /// Flat token list: fields, optionally followed by a direction.
    fn from_tokens(mut tokens: Vec<String>) -> Result<Self, ParseSortError> {
        if tokens.is_empty() {
            return Err(ParseSortError("no sort fields".into()));
        }
        let mut direction = SortDirection::Asc;
        if tokens.len() > 1 {
            if let Some(Ok(dir)) = tokens.last().map(|t| t.parse::<SortDirection>()) {
                direction = dir;
                tokens.pop();
            }
        }
        Ok(SortSpec::by_fields(tokens).direction(direction))
    }

    /// Accepts `"CODE"`, `["CODE"]`, `["CODE", "desc"]`,
    /// `[["TITLE", "CODE"]]` and `[["TITLE", "CODE"], "desc"]`.
    pub fn from_json(value: &Value) -> Result<Self, ParseSortError> {
        match value {
            Value::String(s) => s.parse(),
            Value::Array(items) => match items.split_first() {
                Some((Value::Array(list), rest)) => {
                    let fields = strings(list)?;
                    let spec = SortSpec::by_fields(fields);
                    match rest {
                        [] => Ok(spec),
                        [Value::String(dir)] => Ok(spec.direction(dir.parse()?)),
                        _ => Err(ParseSortError("expected [fields, direction]".into())),
                    }
                }
                Some(_) => SortSpec::from_tokens(strings(items)?),
                None => Err(ParseSortError("empty sort array".into())),
            },
            other => Err(ParseSortError(format!("unsupported sort value {other}"))),
        }
    }
}

fn strings(values: &[Value]) -> Result<Vec<String>, ParseSortError> {
    values
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| ParseSortError(format!("expected a field name, got {v}")))
        })
        .collect()
}

/// Canonical unencoded form, `TITLE,CODE,desc`.
impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fields.join(","))?;
        if self.direction == SortDirection::Desc {
            write!(f, ",desc")?;
        }
        Ok(())
    }
}

/// Parses the canonical form: comma-separated fields with an optional
/// trailing `asc`/`desc`.
impl FromStr for SortSpec {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        SortSpec::from_tokens(tokens)
    }
}

impl<'de> Deserialize<'de> for SortSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        SortSpec::from_json(&value).map_err(de::Error::custom)
    }
}

// ── QueryOptions ────────────────────────────────────────────────────

/// Pagination, projection, sort and filter options for list/read calls.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryOptions {
    /// Projection, caller order, duplicates kept.
    pub fields: Vec<String>,
    pub sort: Option<SortSpec>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Raw filter string, compiled or hand-written.
    pub q: Option<String>,
    /// Ask the server for `totalCount`.
    pub count: bool,
    pub expand_level: Option<String>,
    /// Extension parameters, emitted after the recognized ones.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn fields<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn q(mut self, filter: impl Into<String>) -> Self {
        self.q = Some(filter.into());
        self
    }

    pub fn count(mut self, count: bool) -> Self {
        self.count = count;
        self
    }

    pub fn expand_level(mut self, level: impl Into<String>) -> Self {
        self.expand_level = Some(level.into());
        self
    }

    /// Add an extension parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn to_query_string(&self) -> String {
        compile_query(Some(self))
    }
}

/// Compile options into a query string without the leading `?`.
///
/// Returns `""` for `None` or when no option is set; callers then omit `?`.
pub fn compile_query(options: Option<&QueryOptions>) -> String {
    let Some(o) = options else {
        return String::new();
    };

    let mut params: Vec<String> = Vec::new();
    let mut push = |key: &str, value: String| params.push(format!("{key}={value}"));

    if let Some(limit) = o.limit {
        push("limit", limit.to_string());
    }
    if let Some(offset) = o.offset {
        push("offset", offset.to_string());
    }
    if !o.fields.is_empty() {
        push("fields", encode_list(&o.fields));
    }
    if let Some(sort) = o.sort.as_ref().and_then(SortSpec::to_param) {
        push("sort", sort);
    }
    if let Some(q) = &o.q {
        push("q", encode_component(q));
    }
    if o.count {
        push("count", "true".to_string());
    }
    if let Some(level) = &o.expand_level {
        push("expandLevel", encode_component(level));
    }
    for (key, value) in &o.extra {
        if RECOGNIZED.contains(&key.as_str()) {
            continue;
        }
        let rendered = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        push(&encode_component(key), encode_component(&rendered));
    }

    let query = params.join("&");
    tracing::trace!(%query, "compiled query options");
    query
}
