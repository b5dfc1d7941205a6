mod common;

use axum::{Router, http::StatusCode};
use axum_test::TestServer;
use qwiklink::api::dto::auth::SignUpResponse;
use qwiklink::routes::api_routes;
use qwiklink::state::AppState;
use serde_json::{Value, json};

fn make_server(state: AppState) -> TestServer {
    let app = Router::new()
        .nest("/api", api_routes(state.clone()))
        .with_state(state);
    TestServer::new(app).unwrap()
}

fn error_message(body: &Value) -> &str {
    body["error"]["message"].as_str().unwrap()
}

#[tokio::test]
async fn test_signup_creates_user_without_token() {
    let (state, users) = common::create_user_state();
    let server = make_server(state);

    let response = server
        .post("/api/auth/signup")
        .json(&json!({ "user_name": "alice", "email": "alice@example.com" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<SignUpResponse>();
    assert_eq!(body.message, "Registration successfully");
    assert_eq!(body.user.user_name, "alice");
    assert_eq!(body.user.roles, vec!["USER"]);
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn test_signup_ignores_requested_role_and_password() {
    let (state, _) = common::create_user_state();
    let server = make_server(state);

    let response = server
        .post("/api/auth/signup")
        .json(&json!({
            "userName": "mallory",
            "email": "mallory@example.com",
            "password": "hunter22",
            "role": ["ADMIN"]
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<SignUpResponse>().user.roles, vec!["USER"]);
}

#[tokio::test]
async fn test_signup_duplicate_name_conflicts() {
    let (state, users) = common::create_user_state();
    let server = make_server(state);

    server
        .post("/api/auth/signup")
        .json(&json!({ "user_name": "alice", "email": "alice@example.com" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/auth/signup")
        .json(&json!({ "user_name": "alice", "email": "other@example.com" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(error_message(&response.json::<Value>()), "Username exists");
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn test_signup_duplicate_email_conflicts() {
    let (state, users) = common::create_user_state();
    let server = make_server(state);

    server
        .post("/api/auth/signup")
        .json(&json!({ "user_name": "alice", "email": "alice@example.com" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/auth/signup")
        .json(&json!({ "user_name": "alicia", "email": "alice@example.com" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(error_message(&response.json::<Value>()), "Email exists");
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn test_signup_rejects_invalid_input() {
    let (state, users) = common::create_user_state();
    let server = make_server(state);

    for body in [
        json!({ "user_name": "al", "email": "al@example.com" }),
        json!({ "user_name": "alice", "email": "not-an-email" }),
        json!({ "user_name": "bad name", "email": "bad@example.com" }),
        json!({}),
    ] {
        server
            .post("/api/auth/signup")
            .json(&body)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    assert!(users.is_empty());
}
