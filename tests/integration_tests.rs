use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use user_directory::{
    app::users::store::UserStore, build_router, AppConfig, AppState, Environment,
};

fn test_app() -> Router {
    let config = AppConfig {
        environment: Environment::Test,
        ..AppConfig::default()
    };
    build_router(AppState::new(config, UserStore::seeded()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    send_raw(app, builder.body(body).unwrap()).await
}

async fn send_raw(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn new_user_body(email: &str) -> Value {
    json!({
        "name": "Kiran Rao",
        "email": email,
        "age": 34,
        "city": "Chennai"
    })
}

#[tokio::test]
async fn root_banner_lists_endpoints() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to User Directory API");
    assert_eq!(body["environment"], "test");
    assert!(body["endpoints"].as_array().unwrap().len() > 5);
}

#[tokio::test]
async fn health_reports_user_counts() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["users"]["total"], 5);
    assert_eq!(body["users"]["active"], 3);
    assert_eq!(body["users"]["inactive"], 2);
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
    assert!(body["memory"]["rss"].is_u64());
}

#[tokio::test]
async fn list_users_with_and_without_filter() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 5);
    assert_eq!(body["users"].as_array().unwrap().len(), 5);

    let (_, body) = send(&app, Method::GET, "/users?active=false", None).await;
    assert_eq!(body["count"], 2);
    assert!(body["users"]
        .as_array()
        .unwrap()
        .iter()
        .all(|u| u["isActive"] == false));
}

#[tokio::test]
async fn city_search_is_case_insensitive() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/users/city/delhi", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], "delhi");
    assert_eq!(body["count"], 2);
    assert!(body["users"]
        .as_array()
        .unwrap()
        .iter()
        .all(|u| u["city"] == "Delhi"));
}

#[tokio::test]
async fn status_filter_returns_only_matching_users() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/users/status/active", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert_eq!(body["count"], 3);
    assert!(body["users"]
        .as_array()
        .unwrap()
        .iter()
        .all(|u| u["isActive"] == true));

    let (status, body) = send(&app, Method::GET, "/users/status/pending", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "status");
}

#[tokio::test]
async fn get_user_by_id_distinguishes_bad_id_from_missing() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Rahul Sharma");

    let (status, body) = send(&app, Method::GET, "/users/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid user ID");

    let (status, body) = send(&app, Method::GET, "/users/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn create_user_returns_201_with_next_id() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(new_user_body("kiran.rao@example.com")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["id"], 6);
    assert_eq!(body["user"]["isActive"], true);
    assert_eq!(body["user"]["createdAt"], body["user"]["updatedAt"]);

    let (status, _) = send(&app, Method::GET, "/users/6", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn duplicate_email_is_conflict_and_store_unchanged() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(new_user_body("rahul.sharma@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already exists");

    let (_, body) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(body["count"], 5);
}

#[tokio::test]
async fn out_of_range_age_is_rejected() {
    let app = test_app();
    for age in [0, 151] {
        let mut payload = new_user_body("age.check@example.com");
        payload["age"] = json!(age);
        let (status, body) = send(&app, Method::POST, "/users", Some(payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "age {}", age);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["details"][0]["field"], "age");
        assert_eq!(body["details"][0]["message"], "age must be between 1 and 150");
    }
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": \"broken\""))
        .unwrap();

    let (status, body) = send_raw(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid JSON");
}

#[tokio::test]
async fn missing_content_type_or_empty_body_is_invalid_json() {
    let app = test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/users")
        .body(Body::from(new_user_body("no.header@example.com").to_string()))
        .unwrap();
    let (status, body) = send_raw(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid JSON");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/users")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(new_user_body("text.plain@example.com").to_string()))
        .unwrap();
    let (status, body) = send_raw(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid JSON");

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/users/1")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send_raw(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid JSON");

    let (_, body) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(body["count"], 5);
}

#[tokio::test]
async fn undecodable_path_and_query_use_json_envelope() {
    let app = test_app();

    for method in [Method::GET, Method::DELETE] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/users/%FF")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Invalid user ID");
        assert_eq!(body["code"], 400);
    }

    let (status, body) = send(&app, Method::GET, "/users/city/%FF", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["details"][0]["field"], "path");

    let (status, body) = send(&app, Method::GET, "/users?active=true&active=false", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["details"][0]["field"], "query");
}

#[tokio::test]
async fn update_merges_only_provided_fields() {
    let app = test_app();
    let (_, before) = send(&app, Method::GET, "/users/2", None).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/users/2",
        Some(json!({ "city": "Mumbai" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User updated successfully");

    let after = &body["user"];
    assert_eq!(after["city"], "Mumbai");
    for key in ["id", "name", "email", "age", "isActive", "createdAt"] {
        assert_eq!(after[key], before[key], "{} changed", key);
    }
    let before_ts: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(before["updatedAt"].clone()).unwrap();
    let after_ts: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(after["updatedAt"].clone()).unwrap();
    assert!(after_ts >= before_ts);
}

#[tokio::test]
async fn update_errors() {
    let app = test_app();

    let (status, _) = send(&app, Method::PUT, "/users/x1", Some(json!({ "age": 20 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::PUT, "/users/404", Some(json!({ "age": 20 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/users/1",
        Some(json!({ "email": "priya.patel@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);

    let (status, body) = send(&app, Method::PUT, "/users/1", Some(json!({ "age": "old" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["message"], "age must be a number");
}

#[tokio::test]
async fn delete_echoes_record_then_get_is_404() {
    let app = test_app();
    let (_, existing) = send(&app, Method::GET, "/users/3", None).await;

    let (status, body) = send(&app, Method::DELETE, "/users/3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");
    assert_eq!(body["user"], existing);

    let (status, _) = send(&app, Method::GET, "/users/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/users/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/users/three", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleted_ids_are_never_reassigned() {
    let app = test_app();
    send(&app, Method::DELETE, "/users/5", None).await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(new_user_body("fresh@example.com")),
    )
    .await;
    assert_eq!(body["user"]["id"], 6);
}

#[tokio::test]
async fn unknown_route_and_method_fall_back_to_404() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
    assert_eq!(body["message"], "Cannot GET /nope");
    assert!(body["availableEndpoints"]
        .as_array()
        .unwrap()
        .contains(&json!("POST /users")));

    let (status, body) = send(&app, Method::PATCH, "/users/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Cannot PATCH /users/1");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
