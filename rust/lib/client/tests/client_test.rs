//! Client golden tests: drive `ResourceClient` against a real HTTP server.
//!
//! The server is a tiny in-memory stand-in for an ERP collection endpoint:
//! it requires a bearer key, pages with `limit`/`offset`, and reports the
//! decoded `q`/`sort` it received so the wire encoding can be checked.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Value};

use erp_client::{build_path, compose, ApiError, Client, DispatcherConfig, Method};
use erp_query::{wildcard_search, OperatorObject, QueryOptions, SearchCriteria, SortSpec};

const API_KEY: &str = "golden-key";

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Item {
    #[serde(rename = "CODE")]
    code: String,
}

struct Db {
    codes: Vec<String>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", API_KEY))
}

async fn list_items(
    State(db): State<Arc<Db>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "invalid key"}))).into_response();
    }
    let limit: usize = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(100);
    let offset: usize = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let items: Vec<Value> = db
        .codes
        .iter()
        .skip(offset)
        .take(limit)
        .map(|c| json!({"CODE": c}))
        .collect();

    let mut body = json!({
        "items": items,
        "offset": offset,
        "limit": limit,
        "receivedQ": params.get("q"),
        "receivedSort": params.get("sort"),
    });
    if params.get("count").map(String::as_str) == Some("true") {
        body["totalCount"] = json!(db.codes.len());
    }
    Json(body).into_response()
}

async fn get_item(State(db): State<Arc<Db>>, headers: HeaderMap, Path(code): Path<String>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if db.codes.contains(&code) {
        Json(json!({"CODE": code})).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({"message": format!("item '{}' not found", code)}))).into_response()
    }
}

async fn serve() -> String {
    let db = Arc::new(Db {
        codes: ["A1", "A2", "B1", "B2", "C1"].iter().map(|s| s.to_string()).collect(),
    });
    let app = Router::new()
        .route("/api/v1/items", get(list_items))
        .route("/api/v1/items/:code", get(get_item))
        .with_state(db);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api/v1", addr)
}

async fn client() -> Client {
    Client::new(DispatcherConfig::new(serve().await).with_token(API_KEY)).unwrap()
}

#[tokio::test]
async fn filter_and_sort_survive_the_wire() {
    let client = client().await;
    let items = client.resource::<Item>("/items");
    let criteria = SearchCriteria::new()
        .with("status", 1)
        .with("price", OperatorObject::new().gte(100).lte(500));
    let options = QueryOptions::new()
        .limit(2)
        .sort(SortSpec::by_fields(["TITLE", "CODE"]).desc())
        .q(wildcard_search("auxilCode", "A&B"));

    let resp = items.list(Some(&criteria), Some(&options)).await.unwrap();
    assert_eq!(resp.items.len(), 2);
    assert_eq!(resp.limit, Some(2));

    // Same compiled path, fetched raw to see what the server decoded.
    let query = compose(Some(&criteria), Some(&options)).to_query_string();
    let raw = client
        .request(Method::Get, &build_path("/items", &[], &query), None)
        .await
        .unwrap();
    assert_eq!(
        raw["receivedQ"],
        "(AUXIL_CODE like 'A&B*') and STATUS eq 1 and PRICE gte 100 and PRICE lte 500"
    );
    assert_eq!(raw["receivedSort"], "TITLE,CODE,desc");
}

#[tokio::test]
async fn get_by_id_and_not_found() {
    let items = client().await.resource::<Item>("/items");
    assert_eq!(items.get("B1", None).await.unwrap(), Item { code: "B1".into() });

    let err = items.get("Z9", None).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.provider_message(), Some("item 'Z9' not found"));
}

#[tokio::test]
async fn missing_key_is_remote_401() {
    let base = serve().await;
    let anon = Client::new(DispatcherConfig::new(base)).unwrap();
    let err = anon.resource::<Item>("/items").list(None, None).await.unwrap_err();
    assert!(matches!(err, ApiError::Remote { status: 401, .. }));
    assert_eq!(err.provider_message(), Some("invalid key"));
}

#[tokio::test]
async fn list_all_pages_through_collection() {
    let items = client().await.resource::<Item>("/items");

    let counted = items
        .list_all(None, Some(&QueryOptions::new().limit(2).count(true)))
        .await
        .unwrap();
    let codes: Vec<&str> = counted.iter().map(|i| i.code.as_str()).collect();
    assert_eq!(codes, ["A1", "A2", "B1", "B2", "C1"]);

    let uncounted = items.list_all(None, Some(&QueryOptions::new().limit(2))).await.unwrap();
    assert_eq!(uncounted, counted);
}

#[tokio::test]
async fn concurrent_calls_share_one_client() {
    let items = client().await.resource::<Item>("/items");
    let (a, b, c) = tokio::join!(items.get("A1", None), items.get("B2", None), items.get("C1", None));
    assert_eq!(a.unwrap().code, "A1");
    assert_eq!(b.unwrap().code, "B2");
    assert_eq!(c.unwrap().code, "C1");
}
