// tests/integration/visibility_store_tests.rs

use crate::common::{
    db::TestDatabase,
    test_data::{self, days_ago, ADMIN, EMP_A, EMP_B, EMP_C, EMP_X, REQUESTER, RETIRED, SALES_REP},
};
use std::collections::BTreeSet;
use visibility_backend::api::AppState;
use visibility_backend::config::AppConfig;
use visibility_backend::domain::{area_permit_model::AreaScope, employee_permit_model::AccessType};
use visibility_backend::service::visibility_service::VisibilityService;

async fn seeded_service() -> (VisibilityService, TestDatabase) {
    let db = TestDatabase::new().await;
    test_data::seed_organization(&db.connection).await;
    let state = AppState::new(db.connection.clone(), &AppConfig::for_testing()).unwrap();
    ((*state.visibility_service).clone(), db)
}

fn ids(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn test_manager_sees_transitive_reports() {
    let (service, _db) = seeded_service().await;

    let visible = service.get_visible_ids(REQUESTER.0).await;
    assert_eq!(visible, ids(&[REQUESTER.0, EMP_A.0, EMP_B.0, EMP_C.0]));
}

#[tokio::test]
async fn test_delegation_and_deny_from_delegator() {
    let (service, db) = seeded_service().await;
    test_data::insert_delegation(&db.connection, EMP_X.0, REQUESTER.0, None).await;
    test_data::insert_employee_permit(&db.connection, EMP_X.0, EMP_C.0, AccessType::Deny, None)
        .await;

    let actors = service.get_effective_actors(REQUESTER.0).await;
    assert_eq!(actors, vec![REQUESTER.0.to_string(), EMP_X.0.to_string()]);

    let visible = service.get_visible_ids(REQUESTER.0).await;
    for expected in [REQUESTER.0, EMP_A.0, EMP_B.0] {
        assert!(visible.contains(expected), "missing {}", expected);
    }
    assert!(!visible.contains(EMP_C.0));
    // 代理元の部下も見える
    assert!(visible.contains(SALES_REP.0));
}

#[tokio::test]
async fn test_expired_grants_have_no_effect() {
    let (service, db) = seeded_service().await;
    test_data::insert_delegation(&db.connection, EMP_X.0, REQUESTER.0, Some(days_ago(3))).await;
    test_data::insert_employee_permit(
        &db.connection,
        REQUESTER.0,
        EMP_C.0,
        AccessType::Deny,
        Some(days_ago(1)),
    )
    .await;

    assert_eq!(
        service.get_effective_actors(REQUESTER.0).await,
        vec![REQUESTER.0.to_string()]
    );
    assert!(service.get_visible_ids(REQUESTER.0).await.contains(EMP_C.0));
}

#[tokio::test]
async fn test_grant_ending_today_is_still_in_force() {
    let (service, db) = seeded_service().await;
    test_data::insert_employee_permit(
        &db.connection,
        EMP_A.0,
        EMP_X.0,
        AccessType::Allow,
        Some(test_data::today()),
    )
    .await;

    assert!(service.can_view(EMP_A.0, EMP_X.0).await);
}

#[tokio::test]
async fn test_super_admin_sees_every_active_employee() {
    let (service, _db) = seeded_service().await;

    let visible = service.get_visible_ids(ADMIN.0).await;
    assert_eq!(
        visible,
        ids(&[
            REQUESTER.0,
            EMP_A.0,
            EMP_B.0,
            EMP_C.0,
            EMP_X.0,
            ADMIN.0,
            SALES_REP.0
        ])
    );
    assert!(!visible.contains(RETIRED.0));
}

#[tokio::test]
async fn test_area_permit_scopes() {
    let (service, db) = seeded_service().await;
    test_data::insert_area_permit(&db.connection, EMP_X.0, test_data::UNIT_FINANCE, AreaScope::Subtree)
        .await;
    test_data::insert_area_permit(
        &db.connection,
        SALES_REP.0,
        test_data::UNIT_FINANCE,
        AreaScope::NodeOnly,
    )
    .await;

    let subtree = service.get_visible_ids(EMP_X.0).await;
    assert_eq!(
        subtree,
        ids(&[EMP_X.0, SALES_REP.0, REQUESTER.0, EMP_A.0, EMP_B.0, EMP_C.0])
    );

    let node_only = service.get_visible_ids(SALES_REP.0).await;
    assert_eq!(node_only, ids(&[SALES_REP.0, REQUESTER.0, EMP_B.0]));
}

#[tokio::test]
async fn test_can_view_by_account_id() {
    let (service, _db) = seeded_service().await;

    assert!(service.can_view_by_id(REQUESTER.1, EMP_C.1).await);
    assert!(!service.can_view_by_id(REQUESTER.1, EMP_X.1).await);
    assert!(!service.can_view_by_id(REQUESTER.1, 9_999).await);
    assert!(!service.can_view_by_id(9_999, REQUESTER.1).await);
}

#[tokio::test]
async fn test_unknown_requester_sees_only_self() {
    let (service, _db) = seeded_service().await;

    assert_eq!(service.get_visible_ids("U1").await, ids(&["U1"]));
    assert!(service.can_view("U1", "U1").await);
    assert!(service.get_visible_employees("U1").await.is_empty());
}

#[tokio::test]
async fn test_visible_employees_are_ordered_by_display_name() {
    let (service, _db) = seeded_service().await;

    let records = service.get_visible_employees(REQUESTER.0).await;
    let ordered: Vec<&str> = records.iter().map(|r| r.employee_id.as_str()).collect();
    assert_eq!(ordered, vec![REQUESTER.0, EMP_A.0, EMP_B.0, EMP_C.0]);
    assert_eq!(records[1].org_unit_name.as_deref(), Some("Treasury"));
}

#[tokio::test]
async fn test_viewers_is_direct_manager() {
    let (service, _db) = seeded_service().await;

    let viewers = service.get_viewers(EMP_C.0).await;
    assert_eq!(viewers.len(), 1);
    assert_eq!(viewers[0].employee_id, EMP_B.0);

    assert!(service.get_viewers(REQUESTER.0).await.is_empty());
    assert!(service.get_viewers("nobody").await.is_empty());
}
