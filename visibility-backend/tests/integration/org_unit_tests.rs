// tests/integration/org_unit_tests.rs

use crate::common::{
    app_helper::setup_seeded_app,
    auth_helper::{admin_token, body_json, create_authenticated_request},
    test_data::{self, ADMIN},
};
use axum::http::StatusCode;
use tower::ServiceExt;

#[tokio::test]
async fn test_org_unit_tree_counts() {
    let (app, _db) = setup_seeded_app().await;
    let admin = admin_token(ADMIN);

    let response = app
        .oneshot(create_authenticated_request(
            "GET",
            "/org-units/tree",
            &admin,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let roots = json["data"].as_array().unwrap();
    assert_eq!(roots.len(), 1);

    let root = &roots[0];
    assert_eq!(root["name"], "Head Office");
    assert_eq!(root["direct_count"], 1);
    // 退職者は数えない
    assert_eq!(root["total_count"], 7);
    assert_eq!(root["children"][0]["name"], "Finance");
    assert_eq!(root["children"][0]["total_count"], 4);
    assert_eq!(root["children"][1]["name"], "Sales");
    assert_eq!(root["children"][1]["total_count"], 2);
}

#[tokio::test]
async fn test_org_unit_detail() {
    let (app, _db) = setup_seeded_app().await;
    let admin = admin_token(ADMIN);

    let response = app
        .clone()
        .oneshot(create_authenticated_request(
            "GET",
            &format!("/org-units/{}", test_data::UNIT_FINANCE),
            &admin,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Finance");
    assert_eq!(json["data"]["direct_count"], 2);

    let response = app
        .oneshot(create_authenticated_request(
            "GET",
            "/org-units/999",
            &admin,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_org_unit_preview_by_scope() {
    let (app, _db) = setup_seeded_app().await;
    let admin = admin_token(ADMIN);

    let cases = [
        ("", StatusCode::OK, Some(4)),
        ("?scope=SUBTREE", StatusCode::OK, Some(4)),
        ("?scope=node_only", StatusCode::OK, Some(2)),
        ("?scope=EVERYTHING", StatusCode::BAD_REQUEST, None),
    ];

    for (query, status, total) in cases {
        let uri = format!("/org-units/{}/preview{}", test_data::UNIT_FINANCE, query);
        let response = app
            .clone()
            .oneshot(create_authenticated_request("GET", &uri, &admin, None))
            .await
            .unwrap();
        assert_eq!(response.status(), status, "uri: {}", uri);

        if let Some(total) = total {
            let json = body_json(response).await;
            assert_eq!(json["data"]["total"], total, "uri: {}", uri);
            assert_eq!(
                json["data"]["sample"].as_array().unwrap().len() as u64,
                total,
                "uri: {}",
                uri
            );
        }
    }
}
