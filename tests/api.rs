//! End-to-end API tests
//!
//! Drive the full HTTP stack (router, handlers, service, store) in-process
//! over the in-memory catalog store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use liber_server::{
    api, config::AppConfig, models::NewBook, repository::memory::MemoryCatalogStore,
    services::Services, AppState,
};

fn seed() -> Vec<NewBook> {
    [
        ("Clean Code", "Robert C. Martin"),
        ("Design Patterns", "Erich Gamma"),
        ("The PHP Manual", "The PHP Documentation Group"),
    ]
    .into_iter()
    .map(|(title, author)| NewBook {
        title: title.to_string(),
        author: author.to_string(),
    })
    .collect()
}

async fn test_app() -> Router {
    let store = Arc::new(MemoryCatalogStore::new());
    let services = Services::new(store);
    services
        .lending
        .seed_catalog(&seed())
        .await
        .expect("Failed to seed catalog");

    let state = AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(services),
    };
    api::create_app(state)
}

async fn request(app: &Router, method: &str, path: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(path)
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
        .expect("Failed to send request");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_check_reports_healthy() {
    let app = test_app().await;
    let (status, body) = request(&app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["status"], 200);
}

#[tokio::test]
async fn responses_are_json() {
    let app = test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/books")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"));
}

#[tokio::test]
async fn list_shows_all_seeded_books_available() {
    let app = test_app().await;
    let (status, body) = request(&app, "GET", "/books").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 200);

    let books = body["data"]["books"].as_array().expect("books array");
    assert_eq!(books.len(), 3);
    assert_eq!(books[0]["title"], "Clean Code");
    assert_eq!(books[1]["title"], "Design Patterns");
    assert_eq!(books[2]["title"], "The PHP Manual");
    for book in books {
        assert_eq!(book["available"], true);
        assert!(book["borrowed_at"].is_null());
    }
}

#[tokio::test]
async fn get_book_by_id() {
    let app = test_app().await;
    let (status, body) = request(&app, "GET", "/books/1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["book"]["id"], 1);
    assert_eq!(body["data"]["book"]["title"], "Clean Code");
    assert_eq!(body["data"]["book"]["available"], true);
}

#[tokio::test]
async fn unknown_book_yields_404_envelope() {
    let app = test_app().await;
    let (status, body) = request(&app, "GET", "/books/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert!(body["error"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn borrow_marks_unavailable_then_rejects() {
    let app = test_app().await;

    let (status, body) = request(&app, "POST", "/books/1/borrow").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["book"]["available"], false);
    assert!(body["data"]["book"]["borrowed_at"].is_string());
    assert!(body["data"]["message"].is_string());

    let (status, body) = request(&app, "POST", "/books/1/borrow").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("not available"));
}

#[tokio::test]
async fn return_of_never_borrowed_book_is_rejected() {
    let app = test_app().await;
    let (status, body) = request(&app, "POST", "/books/1/return").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("not currently borrowed"));
}

#[tokio::test]
async fn borrow_return_round_trip_restores_state() {
    let app = test_app().await;

    request(&app, "POST", "/books/1/borrow").await;
    let (status, body) = request(&app, "POST", "/books/1/return").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["book"]["available"], true);
    assert!(body["data"]["book"]["borrowed_at"].is_null());

    let (_, body) = request(&app, "GET", "/books/1").await;
    assert_eq!(body["data"]["book"]["available"], true);
}

#[tokio::test]
async fn listing_reflects_mixed_lending_state() {
    let app = test_app().await;

    request(&app, "POST", "/books/1/borrow").await;
    request(&app, "POST", "/books/2/borrow").await;
    request(&app, "POST", "/books/1/return").await;

    let (status, body) = request(&app, "GET", "/books").await;
    assert_eq!(status, StatusCode::OK);

    let books = body["data"]["books"].as_array().unwrap();
    assert_eq!(books[0]["available"], true);
    assert_eq!(books[1]["available"], false);
    assert_eq!(books[2]["available"], true);
}

#[tokio::test]
async fn malformed_identifiers_are_client_errors() {
    let app = test_app().await;

    for path in ["/books/abc", "/books/-1", "/books/1x", "/books/1.5"] {
        let (status, body) = request(&app, "GET", path).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "for {}", path);
        assert_eq!(body["status"], 400);
    }

    let (status, _) = request(&app, "POST", "/books/abc/borrow").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_canonical_numeric_identifiers_read_as_absent() {
    let app = test_app().await;

    for path in ["/books/007", "/books/2147483648", "/books/99999999999"] {
        let (status, body) = request(&app, "GET", path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "for {}", path);
        assert_eq!(body["status"], 404);
    }
}

#[tokio::test]
async fn unmatched_requests_yield_404_envelope() {
    let app = test_app().await;

    for (method, path) in [
        ("GET", "/nothing"),
        ("POST", "/books"),
        ("GET", "/books/1/borrow"),
        ("GET", "/Books"),
        ("GET", "/books/"),
        ("GET", "/books/1/"),
    ] {
        let (status, body) = request(&app, method, path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "for {} {}", method, path);
        assert_eq!(body["status"], 404);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn extra_path_segment_never_reaches_the_id_parser() {
    let app = test_app().await;

    // "/books/1/2/borrow" must 404, not borrow book 1.
    let (status, _) = request(&app, "POST", "/books/1/2/borrow").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = request(&app, "GET", "/books/1").await;
    assert_eq!(body["data"]["book"]["available"], true);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_borrows_admit_exactly_one() {
    let app = test_app().await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let (status, _) = request(&app, "POST", "/books/3/borrow").await;
            status
        }));
    }

    let mut ok = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::BAD_REQUEST => rejected += 1,
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(ok, 1);
    assert_eq!(rejected, 7);

    let (_, body) = request(&app, "GET", "/books/3").await;
    assert_eq!(body["data"]["book"]["available"], false);
}
