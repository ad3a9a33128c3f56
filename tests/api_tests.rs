//! Router-level tests with an in-memory store and a stub fetcher.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, TimeZone, Utc};
use common::{count_page, listings_page, success, StubFetcher};
use listing_monitor::api::{build_router, AppState};
use listing_monitor::models::{CountRecord, NewQuery, Query};
use listing_monitor::scrapers::FetchOutcome;
use listing_monitor::store::{CountFilter, MemoryStore, Store};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

struct Harness {
    app: Router,
    store: Arc<MemoryStore>,
    fetcher: Arc<StubFetcher>,
}

fn harness(outcome: FetchOutcome) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let fetcher = StubFetcher::new(outcome);
    let pipeline = Arc::new(common::pipeline(fetcher.clone()));
    let app = build_router(AppState::new(store.clone(), pipeline));
    Harness {
        app,
        store,
        fetcher,
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_add_query_captures_count() {
    let h = harness(success(count_page("1 234")));

    let (status, body) = send(
        &h.app,
        post_json("/api/add", json!({"search_phrase": "iPhone 14 Pro Max", "region": "Москва"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let query: Query = serde_json::from_value(body).unwrap();
    assert_eq!(query.search_phrase, "iPhone 14 Pro Max");
    assert_eq!(query.region, "Москва");

    let counts = h.store.find_counts(&CountFilter::for_query(query.id)).await.unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].quantity, 1234);
    assert_eq!(
        h.fetcher.requested.lock().unwrap().as_slice(),
        ["https://www.avito.ru/moskva?q=iPhone%2B14%2BPro%2BMax"]
    );
}

#[tokio::test]
async fn test_add_same_phrase_returns_existing_query() {
    let h = harness(success(count_page("10")));

    let (_, first) = send(
        &h.app,
        post_json("/api/add", json!({"search_phrase": "bike", "region": "Москва"})),
    )
    .await;
    let (status, second) = send(
        &h.app,
        post_json("/api/add", json!({"search_phrase": "bike", "region": "Казань"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first, second);
    assert_eq!(second["region"], "Москва");
    // one query, but a fresh count for each submission
    assert_eq!(h.store.list_queries().await.unwrap().len(), 1);
    assert_eq!(h.store.find_counts(&CountFilter::default()).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_add_query_scrape_failure_is_500() {
    let h = harness(FetchOutcome::RemoteServerError { status: 503 });

    let (status, body) = send(
        &h.app,
        post_json("/api/add", json!({"search_phrase": "bike", "region": "Омск"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Error during scrape. Please try again later.");
    // no zero-count record is written, the query itself is kept
    assert!(h.store.find_counts(&CountFilter::default()).await.unwrap().is_empty());
    assert_eq!(h.store.list_queries().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_query_missing_marker_is_500() {
    let h = harness(success("<html><body>captcha</body></html>".to_string()));

    let (status, body) = send(
        &h.app,
        post_json("/api/add", json!({"search_phrase": "bike", "region": "Омск"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    // extraction details stay in the logs
    assert_eq!(body["detail"], "Error during scrape. Please try again later.");
}

#[tokio::test]
async fn test_add_query_rejects_blank_fields() {
    let h = harness(success(count_page("1")));

    let (status, _) = send(
        &h.app,
        post_json("/api/add", json!({"search_phrase": "  ", "region": "Омск"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &h.app,
        post_json("/api/add", json!({"search_phrase": "bike", "region": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(h.fetcher.requested.lock().unwrap().is_empty());
    assert!(h.store.list_queries().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_query_rejects_unreadable_body() {
    let h = harness(success(count_page("1")));

    let not_json = Request::builder()
        .method("POST")
        .uri("/api/add")
        .header("content-type", "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let (status, body) = send(&h.app, not_json).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string(), "unexpected body: {body}");

    let (status, body) = send(&h.app, post_json("/api/add", json!({"search_phrase": "bike"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["detail"].as_str().unwrap().contains("region"),
        "unexpected body: {body}"
    );

    assert!(h.fetcher.requested.lock().unwrap().is_empty());
    assert!(h.store.list_queries().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_queries() {
    let h = harness(success(count_page("5")));
    for phrase in ["bike", "sofa"] {
        send(
            &h.app,
            post_json("/api/add", json!({"search_phrase": phrase, "region": "Омск"})),
        )
        .await;
    }

    let (status, body) = send(&h.app, get("/api/queries")).await;

    assert_eq!(status, StatusCode::OK);
    let queries: Vec<Query> = serde_json::from_value(body).unwrap();
    let phrases: Vec<&str> = queries.iter().map(|q| q.search_phrase.as_str()).collect();
    assert_eq!(phrases, ["bike", "sofa"]);
}

#[tokio::test]
async fn test_list_counters_rendering() {
    let h = harness(success(count_page("1")));
    let query_id = Uuid::new_v4();
    let at = Utc.with_ymd_and_hms(2023, 6, 6, 14, 5, 0).unwrap();
    h.store
        .insert_count(CountRecord::build(query_id, 1650, at))
        .await
        .unwrap();
    h.store
        .insert_count(CountRecord::build(Uuid::new_v4(), 3, at))
        .await
        .unwrap();

    let (status, body) = send(&h.app, get("/api/counters")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(
        body[0],
        json!({"quantity": 1650, "counter_timestamp": "June 06, 2023; 14:05"})
    );

    let (_, body) = send(&h.app, get(&format!("/api/counters?query_id={}", query_id))).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["quantity"], 1650);
}

#[tokio::test]
async fn test_stat_filters_by_hours() {
    let h = harness(success(count_page("1")));
    let query_id = Uuid::new_v4();
    let now = Utc::now();
    for (hours_ago, quantity) in [(30, 100), (5, 110), (0, 120)] {
        h.store
            .insert_count(CountRecord::build(query_id, quantity, now - Duration::hours(hours_ago)))
            .await
            .unwrap();
    }

    let (status, body) = send(&h.app, get(&format!("/api/stat/{}/24", query_id))).await;
    assert_eq!(status, StatusCode::OK);
    let quantities: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["quantity"].as_u64().unwrap())
        .collect();
    assert_eq!(quantities, [110, 120]);

    let (_, body) = send(&h.app, get(&format!("/api/stat/{}/48", query_id))).await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = send(&h.app, get(&format!("/api/stat/{}/{}", query_id, u32::MAX))).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_stat_rejects_bad_path() {
    let h = harness(success(count_page("1")));

    let (status, _) = send(&h.app, get("/api/stat/not-a-uuid/24")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&h.app, get(&format!("/api/stat/{}/-3", Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_top_listings() {
    let h = harness(success(count_page("42")));
    let (_, body) = send(
        &h.app,
        post_json("/api/add", json!({"search_phrase": "велосипед", "region": "Москва"})),
    )
    .await;
    let query: Query = serde_json::from_value(body).unwrap();
    let counts_before = h.store.find_counts(&CountFilter::default()).await.unwrap().len();

    h.fetcher.set(success(listings_page(7)));
    let (status, body) = send(&h.app, get(&format!("/api/top/{}", query.id))).await;

    assert_eq!(status, StatusCode::OK);
    let listings = body.as_array().unwrap();
    assert_eq!(listings.len(), 5);
    assert_eq!(listings[0]["title"], "Велосипед 1");
    assert_eq!(listings[4]["title"], "Велосипед 5");
    assert_eq!(listings[0]["posted_at"], "1 дня назад");
    // top listings are never stored
    assert_eq!(
        h.store.find_counts(&CountFilter::default()).await.unwrap().len(),
        counts_before
    );
}

#[tokio::test]
async fn test_top_listings_empty_page_is_ok() {
    let h = harness(success(count_page("0")));
    let query = h
        .store
        .insert_query(NewQuery::new("unicorn", "Омск"))
        .await
        .unwrap();

    let (status, body) = send(&h.app, get(&format!("/api/top/{}", query.id))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_top_listings_unknown_query_is_404() {
    let h = harness(success(listings_page(3)));
    let id = Uuid::new_v4();

    let (status, body) = send(&h.app, get(&format!("/api/top/{}", id))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], format!("Query with id {} not found.", id));
    assert!(h.fetcher.requested.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_top_listings_fetch_failure_is_500() {
    let h = harness(FetchOutcome::TransportError {
        message: "dns error".to_string(),
    });
    let query = h
        .store
        .insert_query(NewQuery::new("bike", "Омск"))
        .await
        .unwrap();

    let (status, _) = send(&h.app, get(&format!("/api/top/{}", query.id))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_health() {
    let h = harness(success(String::new()));

    let (status, body) = send(&h.app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));
}
