// tests/integration/access_grant_tests.rs

use crate::common::{
    app_helper::setup_seeded_app,
    auth_helper::{admin_token, body_json, create_authenticated_request, employee_token},
    test_data::{self, ADMIN, EMP_A, EMP_B, EMP_C, EMP_X, REQUESTER, SALES_REP},
};
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;
use visibility_backend::domain::employee_permit_model::AccessType;

#[tokio::test]
async fn test_create_delegation_changes_effective_actors() {
    let (app, _db) = setup_seeded_app().await;
    let admin = admin_token(ADMIN);

    let body = json!({
        "delegator_id": EMP_X.0,
        "delegate_id": REQUESTER.0,
        "reason": "  vacation cover  "
    });
    let response = app
        .clone()
        .oneshot(create_authenticated_request(
            "POST",
            "/access/delegations",
            &admin,
            Some(body.to_string()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["delegator_id"], EMP_X.0);
    assert_eq!(json["data"]["reason"], "vacation cover");
    assert!(json["data"]["is_active"].as_bool().unwrap());

    let response = app
        .clone()
        .oneshot(create_authenticated_request(
            "GET",
            &format!("/access/delegations/by-delegate/{}", REQUESTER.0),
            &admin,
            None,
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["meta"]["total"], 1);

    let response = app
        .clone()
        .oneshot(create_authenticated_request(
            "GET",
            &format!("/access/delegations/by-delegator/{}", EMP_X.0),
            &admin,
            None,
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["delegate_id"], REQUESTER.0);

    let response = app
        .oneshot(create_authenticated_request(
            "GET",
            "/visibility/me/actors",
            &employee_token(REQUESTER),
            None,
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"]["actors"], json!([REQUESTER.0, EMP_X.0]));
}

#[tokio::test]
async fn test_invalid_grants_are_rejected() {
    let (app, _db) = setup_seeded_app().await;
    let admin = admin_token(ADMIN);

    let cases = [
        (
            "/access/delegations",
            json!({ "delegator_id": EMP_A.0, "delegate_id": EMP_A.0 }),
        ),
        (
            "/access/delegations",
            json!({ "delegator_id": "ghost", "delegate_id": EMP_A.0 }),
        ),
        (
            "/access/employee-permits",
            json!({ "grantee_id": EMP_A.0, "target_id": EMP_A.0 }),
        ),
        (
            "/access/employee-permits",
            json!({ "grantee_id": EMP_A.0, "target_id": EMP_X.0, "access_type": "MAYBE" }),
        ),
        (
            "/access/area-permits",
            json!({ "grantee_id": EMP_A.0, "root_org_unit_id": 999 }),
        ),
        (
            "/access/area-permits",
            json!({ "grantee_id": EMP_A.0, "root_org_unit_id": test_data::UNIT_SALES, "scope": "EVERYTHING" }),
        ),
        (
            "/access/area-permits",
            json!({
                "grantee_id": EMP_A.0,
                "root_org_unit_id": test_data::UNIT_SALES,
                "start_date": "2026-10-10",
                "end_date": "2026-10-01"
            }),
        ),
        (
            "/access/area-permits",
            json!({ "grantee_id": "", "root_org_unit_id": test_data::UNIT_SALES }),
        ),
    ];

    for (uri, body) in cases {
        let response = app
            .clone()
            .oneshot(create_authenticated_request(
                "POST",
                uri,
                &admin,
                Some(body.to_string()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{} {}", uri, body);
    }
}

#[tokio::test]
async fn test_area_permit_lifecycle() {
    let (app, _db) = setup_seeded_app().await;
    let admin = admin_token(ADMIN);
    let sales_rep = employee_token(SALES_REP);

    let body = json!({
        "grantee_id": SALES_REP.0,
        "root_org_unit_id": test_data::UNIT_FINANCE,
        "scope": "node_only"
    });
    let response = app
        .clone()
        .oneshot(create_authenticated_request(
            "POST",
            "/access/area-permits",
            &admin,
            Some(body.to_string()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["scope"], "NODE_ONLY");
    assert_eq!(json["data"]["grantor_id"], ADMIN.0);
    let permit_id = json["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(create_authenticated_request(
            "GET",
            &format!("/access/area-permits?grantee_id={}", SALES_REP.0),
            &admin,
            None,
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["meta"]["total"], 1);

    let response = app
        .clone()
        .oneshot(create_authenticated_request(
            "GET",
            &format!("/visibility/me/can-view/{}", EMP_B.0),
            &sales_rep,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"]["can_view"], true);

    let response = app
        .clone()
        .oneshot(create_authenticated_request(
            "DELETE",
            &format!("/access/area-permits/{}", permit_id),
            &admin,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_active"], false);

    let response = app
        .oneshot(create_authenticated_request(
            "GET",
            &format!("/visibility/me/can-view/{}", EMP_B.0),
            &sales_rep,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"]["can_view"], false);
}

#[tokio::test]
async fn test_employee_permit_defaults_to_allow() {
    let (app, _db) = setup_seeded_app().await;
    let admin = admin_token(ADMIN);

    let body = json!({ "grantee_id": EMP_A.0, "target_id": EMP_X.0 });
    let response = app
        .clone()
        .oneshot(create_authenticated_request(
            "POST",
            "/access/employee-permits",
            &admin,
            Some(body.to_string()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["access_type"], "ALLOW");

    let response = app
        .oneshot(create_authenticated_request(
            "GET",
            "/access/employee-permits",
            &admin,
            None,
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["meta"]["total"], 1);
    assert_eq!(json["data"][0]["target_id"], EMP_X.0);
}

#[tokio::test]
async fn test_deactivate_unknown_or_malformed_id() {
    let (app, db) = setup_seeded_app().await;
    let admin = admin_token(ADMIN);
    let permit =
        test_data::insert_employee_permit(&db.connection, EMP_A.0, EMP_C.0, AccessType::Deny, None)
            .await;

    let response = app
        .clone()
        .oneshot(create_authenticated_request(
            "DELETE",
            &format!("/access/employee-permits/{}", Uuid::new_v4()),
            &admin,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(create_authenticated_request(
            "DELETE",
            "/access/delegations/not-a-uuid",
            &admin,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error_type"], "bad_request");

    let response = app
        .oneshot(create_authenticated_request(
            "DELETE",
            &format!("/access/employee-permits/{}", permit.id),
            &admin,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
