//! HTTP API 통합 테스트
//!
//! 전체 라우터를 통해 가입부터 근무 배정, 비활성화까지의 흐름을 확인합니다.

mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use serde_json::{json, Value};
use shift_api::create_api_router;
use tower::ServiceExt;

use common::*;

async fn app() -> Router {
    create_api_router().with_state(Arc::new(seeded_state().await))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn login(app: &Router, username: &str, password: &str) -> Response<Body> {
    send(
        app,
        "POST",
        "/api/users/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await
}

async fn token(app: &Router, username: &str, password: &str) -> String {
    let response = login(app, username, password).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn register(app: &Router, username: &str, dne: &str) -> Value {
    let response = send(
        app,
        "POST",
        "/api/users/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{}@metro.es", username),
            "password": EMPLOYEE_PASSWORD,
            "name": username,
            "dne": dne,
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["user"].clone()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = app().await;
    let response = send(&app, "GET", "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_schedule_lifecycle() {
    let app = app().await;
    let admin = token(&app, "admin", ADMIN_PASSWORD).await;
    let lucia = register(&app, "lucia", "1001").await;
    let lucia_id = lucia["id"].as_str().unwrap().to_string();
    let lucia_token = token(&app, "lucia", EMPLOYEE_PASSWORD).await;

    // 관리자가 근무 배정
    let response = send(
        &app,
        "POST",
        "/api/shifts",
        Some(&admin),
        Some(json!({
            "start": "2025-05-05T06:00:00Z",
            "end": "2025-05-05T14:00:00Z",
            "title": "Turno mañana",
            "type": "mañana",
            "employee": lucia_id,
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["shift"]["type"], "morning");
    let shift_id = created["shift"]["id"].as_str().unwrap().to_string();

    // 직원은 본인 근무만 조회
    let response = send(&app, "GET", "/api/shifts", Some(&lucia_token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed["shifts"].as_array().unwrap().len(), 1);
    assert_eq!(listed["shifts"][0]["employee"]["id"], lucia_id.as_str());

    // 부분 수정: 종료 시각만 변경
    let response = send(
        &app,
        "PUT",
        &format!("/api/shifts/{}", shift_id),
        Some(&admin),
        Some(json!({ "end": "2025-05-05T15:00:00Z" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["shift"]["title"], "Turno mañana");
    assert_eq!(updated["shift"]["end"], "2025-05-05T15:00:00Z");

    // 비활성화 후 로그인 거부, 근무는 유지
    let response = send(
        &app,
        "PUT",
        &format!("/api/users/deactivate/{}", lucia_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = login(&app, "lucia", EMPLOYEE_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");

    let response = send(
        &app,
        "GET",
        &format!("/api/shifts/employee/{}", lucia_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["shifts"].as_array().unwrap().len(), 1);

    // 삭제
    let response = send(
        &app,
        "DELETE",
        &format!("/api/shifts/{}", shift_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        "GET",
        &format!("/api/shifts/{}", shift_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_registration_over_http() {
    let app = app().await;
    let admin_body = json!({
        "username": "supervisora",
        "email": "supervisora@metro.es",
        "password": "Supervisa1",
        "name": "Supervisora",
        "role": "admin",
    });

    let response = send(&app, "POST", "/api/users/register", None, Some(admin_body.clone())).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    register(&app, "lucia", "1001").await;
    let lucia_token = token(&app, "lucia", EMPLOYEE_PASSWORD).await;
    let response = send(
        &app,
        "POST",
        "/api/users/register",
        Some(&lucia_token),
        Some(admin_body.clone()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = token(&app, "admin", ADMIN_PASSWORD).await;
    let response = send(&app, "POST", "/api/users/register", Some(&admin), Some(admin_body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["user"]["role"], "admin");
}

#[tokio::test]
async fn test_tampered_token_is_unauthenticated() {
    let app = app().await;
    let mut admin = token(&app, "admin", ADMIN_PASSWORD).await;
    admin.push('x');

    let response = send(&app, "GET", "/api/users/all", Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_inverted_filter_is_validation_error() {
    let app = app().await;
    let admin = token(&app, "admin", ADMIN_PASSWORD).await;

    let response = send(
        &app,
        "GET",
        "/api/shifts?startDate=2025-05-07T00:00:00Z&endDate=2025-05-01T00:00:00Z",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
