// tests/integration/visibility_api_tests.rs

use crate::common::{
    app_helper::setup_seeded_app,
    auth_helper::{
        admin_token, body_json, create_authenticated_request, employee_token, issue_token,
        visible_ids,
    },
    test_data::{self, ADMIN, EMP_A, EMP_B, EMP_C, EMP_X, REQUESTER},
};
use axum::http::StatusCode;
use tower::ServiceExt;
use visibility_backend::domain::employee_permit_model::AccessType;

#[tokio::test]
async fn test_my_visible_ids() {
    let (app, _db) = setup_seeded_app().await;
    let token = employee_token(REQUESTER);

    let response = app
        .oneshot(create_authenticated_request("GET", "/visibility/me", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["employee_id"], REQUESTER.0);
    assert_eq!(
        visible_ids(&json),
        vec![REQUESTER.0, EMP_A.0, EMP_B.0, EMP_C.0]
    );
    assert_eq!(json["meta"]["total"], 4);
}

#[tokio::test]
async fn test_my_visible_employees_and_actors() {
    let (app, db) = setup_seeded_app().await;
    test_data::insert_delegation(&db.connection, EMP_X.0, REQUESTER.0, None).await;
    let token = employee_token(REQUESTER);

    let response = app
        .clone()
        .oneshot(create_authenticated_request(
            "GET",
            "/visibility/me/actors",
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["actors"], serde_json::json!([REQUESTER.0, EMP_X.0]));

    let response = app
        .oneshot(create_authenticated_request(
            "GET",
            "/visibility/me/employees",
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["display_name"].as_str().unwrap())
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert!(names.contains(&"Elena Soto"));
}

#[tokio::test]
async fn test_can_view_endpoints() {
    let (app, db) = setup_seeded_app().await;
    test_data::insert_employee_permit(&db.connection, REQUESTER.0, EMP_C.0, AccessType::Deny, None)
        .await;
    let token = employee_token(REQUESTER);

    let cases = [
        (format!("/visibility/me/can-view/{}", EMP_A.0), true),
        (format!("/visibility/me/can-view/{}", EMP_C.0), false),
        (format!("/visibility/me/can-view/{}", REQUESTER.0), true),
        (format!("/visibility/me/can-view-account/{}", EMP_B.1), true),
        (format!("/visibility/me/can-view-account/{}", EMP_X.1), false),
        ("/visibility/me/can-view-account/9999".to_string(), false),
    ];

    for (uri, expected) in cases {
        let response = app
            .clone()
            .oneshot(create_authenticated_request("GET", &uri, &token, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "uri: {}", uri);
        let json = body_json(response).await;
        assert_eq!(json["data"]["can_view"], expected, "uri: {}", uri);
    }
}

#[tokio::test]
async fn test_my_viewers() {
    let (app, _db) = setup_seeded_app().await;
    let token = employee_token(EMP_C);

    let response = app
        .oneshot(create_authenticated_request(
            "GET",
            "/visibility/me/viewers",
            &token,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["employee_id"], EMP_B.0);
    assert_eq!(json["data"][0]["reason"], "direct_manager");
}

#[tokio::test]
async fn test_employee_lookup_is_guarded_by_visibility() {
    let (app, _db) = setup_seeded_app().await;
    let token = employee_token(REQUESTER);

    let response = app
        .clone()
        .oneshot(create_authenticated_request(
            "GET",
            &format!("/employees/{}", EMP_C.0),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["employee_id"], EMP_C.0);
    assert_eq!(json["data"]["manager_id"], EMP_B.0);

    let response = app
        .oneshot(create_authenticated_request(
            "GET",
            &format!("/employees/{}", EMP_X.0),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_self_lookup_without_directory_record_is_not_found() {
    let (app, _db) = setup_seeded_app().await;
    let token = issue_token("U1", 500, None);

    let response = app
        .clone()
        .oneshot(create_authenticated_request(
            "GET",
            "/visibility/me/can-view/U1",
            &token,
            None,
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"]["can_view"], true);

    let response = app
        .oneshot(create_authenticated_request("GET", "/employees/U1", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_can_inspect_other_employee() {
    let (app, _db) = setup_seeded_app().await;
    let token = admin_token(ADMIN);

    let response = app
        .oneshot(create_authenticated_request(
            "GET",
            &format!("/visibility/{}", EMP_B.0),
            &token,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["employee_id"], EMP_B.0);
    assert_eq!(visible_ids(&json), vec![EMP_B.0, EMP_C.0]);
}
