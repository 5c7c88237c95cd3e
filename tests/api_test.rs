use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

use libris::api;
use libris::db;
use libris::infrastructure::AppState;

async fn setup_test_app() -> Router {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    api::api_router(AppState::new(db))
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body was not JSON")
}

#[tokio::test]
async fn lending_flow_over_http() {
    let app = setup_test_app().await;

    // Register
    let response = app
        .clone()
        .oneshot(post_json(
            "/users/register",
            &json!({ "name": "Jane Doe", "email": "Jane@X.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let patron = body_json(response).await;
    assert_eq!(patron["email"], "jane@x.com");

    // Add book
    let response = app
        .clone()
        .oneshot(post_json(
            "/books/add",
            &json!({
                "title": "Harry Potter",
                "author": "J K Rowling",
                "isbn": "0-7475-3269-9"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let book = body_json(response).await;
    assert_eq!(book["status"], "available");
    let book_id = book["id"].as_str().unwrap().to_string();

    // Checkout
    let response = app
        .clone()
        .oneshot(post_json(
            "/users/checkout",
            &json!({ "book_id": book_id, "email": "jane@x.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let loan = body_json(response).await;
    assert_eq!(loan["status"], "borrowed");
    assert!(loan["return_date"].is_null());

    // A second checkout conflicts
    let response = app
        .clone()
        .oneshot(post_json(
            "/users/checkout",
            &json!({ "book_id": book_id, "email": "jane@x.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Return
    let response = app
        .clone()
        .oneshot(post_json(
            "/users/return",
            &json!({ "book_id": book_id, "email": "jane@x.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let returned = body_json(response).await;
    assert_eq!(returned["status"], "available");
    assert!(!returned["return_date"].is_null());

    // Returning again finds no active loan
    let response = app
        .clone()
        .oneshot(post_json(
            "/users/return",
            &json!({ "book_id": book_id, "email": "jane@x.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalog_error_mapping() {
    let app = setup_test_app().await;

    // Invalid ISBN -> 400
    let response = app
        .clone()
        .oneshot(post_json(
            "/books/add",
            &json!({ "title": "T", "author": "A", "isbn": "bogus" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown book -> 404
    let response = app
        .clone()
        .oneshot(get("/books/getBookById/no-such-id"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Duplicate ISBN -> 409
    let payload = json!({
        "title": "Dune",
        "author": "Frank Herbert",
        "isbn": "0-441-17271-7"
    });
    let response = app.clone().oneshot(post_json("/books/add", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let response = app.clone().oneshot(post_json("/books/add", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Search
    let response = app.clone().oneshot(get("/books/search?query=dune")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let results = body_json(response).await;
    assert_eq!(results.as_array().unwrap().len(), 1);

    // List
    let response = app.clone().oneshot(get("/books")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let books = body_json(response).await;
    assert_eq!(books.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn remove_book_over_http() {
    let app = setup_test_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/books/add",
            &json!({ "title": "Dune", "author": "Frank Herbert", "isbn": "0-441-17271-7" }),
        ))
        .await
        .unwrap();
    let book = body_json(response).await;
    let book_id = book["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/books/remove/{}", book_id))
                .method("DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let removed = body_json(response).await;
    assert_eq!(removed["title"], "Dune");

    let response = app
        .clone()
        .oneshot(get(&format!("/books/getBookById/{}", book_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
