// tests/integration/auth_tests.rs

use crate::common::{
    app_helper::setup_full_app,
    auth_helper::{body_json, create_authenticated_request, employee_token, issue_token},
    test_data::REQUESTER,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

#[tokio::test]
async fn test_health_does_not_require_token() {
    let (app, _db) = setup_full_app().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["success"].as_bool().unwrap());
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["environment"], "test");
    assert_eq!(json["data"]["database"], "up");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (app, _db) = setup_full_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/visibility/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert!(!json["success"].as_bool().unwrap());
    assert_eq!(json["error_type"], "unauthorized");
}

#[tokio::test]
async fn test_tampered_token_is_unauthorized() {
    let (app, _db) = setup_full_app().await;
    let mut token = employee_token(REQUESTER);
    token.push('x');

    let response = app
        .oneshot(create_authenticated_request("GET", "/visibility/me", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_cookie_is_accepted() {
    let (app, _db) = setup_full_app().await;
    let token = employee_token(REQUESTER);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/visibility/me")
                .header(header::COOKIE, format!("access_token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_paths_reject_employee_role() {
    let (app, _db) = setup_full_app().await;
    let token = employee_token(REQUESTER);

    for uri in ["/access/delegations", "/org-units/tree", "/visibility/A"] {
        let response = app
            .clone()
            .oneshot(create_authenticated_request("GET", uri, &token, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "uri: {}", uri);
    }
}

#[tokio::test]
async fn test_role_claim_is_case_insensitive() {
    let (app, _db) = setup_full_app().await;
    let token = issue_token(REQUESTER.0, REQUESTER.1, Some("superadmin"));

    let response = app
        .oneshot(create_authenticated_request(
            "GET",
            "/access/delegations",
            &token,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
