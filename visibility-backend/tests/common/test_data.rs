// tests/common/test_data.rs

use chrono::{Duration, NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use visibility_backend::domain::{
    area_permit_model::{self, AreaScope},
    delegation_model,
    employee_model,
    employee_permit_model::{self, AccessType},
    org_unit_model,
};
use visibility_backend::repository::{
    area_permit_repository::AreaPermitRepository, delegation_repository::DelegationRepository,
    employee_permit_repository::EmployeePermitRepository,
    employee_repository::EmployeeRepository, org_unit_repository::OrgUnitRepository,
};

// 組織ノード
pub const UNIT_HEAD_OFFICE: i64 = 1;
pub const UNIT_FINANCE: i64 = 2;
pub const UNIT_TREASURY: i64 = 3;
pub const UNIT_SALES: i64 = 4;

// 従業員（社員番号, アカウントID）
pub const REQUESTER: (&str, i64) = ("402178", 1);
pub const EMP_A: (&str, i64) = ("A", 2);
pub const EMP_B: (&str, i64) = ("B", 3);
pub const EMP_C: (&str, i64) = ("C", 4);
pub const EMP_X: (&str, i64) = ("X", 5);
pub const ADMIN: (&str, i64) = ("ADM", 6);
pub const SALES_REP: (&str, i64) = ("V1", 7);
pub const RETIRED: (&str, i64) = ("OLD", 8);

/// DB側の CURRENT_DATE と同じ日付（コンテナは UTC）
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn days_ago(days: i64) -> NaiveDate {
    today() - Duration::days(days)
}

/// 基本の組織と従業員を登録する
///
/// ```text
/// 1 本社 ── 2 財務 ── 3 出納
///        └─ 4 営業
/// 402178 ─┬─ A
///         └─ B ── C
/// X, ADM(SUPERADMIN), V1, OLD(退職)
/// ```
pub async fn seed_organization(db: &DatabaseConnection) {
    let units = OrgUnitRepository::new(db.clone());
    for unit in [
        org_unit_model::Model::new(UNIT_HEAD_OFFICE, "Head Office", None),
        org_unit_model::Model::new(UNIT_FINANCE, "Finance", Some(UNIT_HEAD_OFFICE)),
        org_unit_model::Model::new(UNIT_TREASURY, "Treasury", Some(UNIT_FINANCE)),
        org_unit_model::Model::new(UNIT_SALES, "Sales", Some(UNIT_HEAD_OFFICE)),
    ] {
        units.create(unit).await.unwrap();
    }

    let employees = EmployeeRepository::new(db.clone());
    for employee in [
        employee_model::Model::new(REQUESTER.0, REQUESTER.1, "Ana Torres").with_org_unit(UNIT_FINANCE),
        employee_model::Model::new(EMP_A.0, EMP_A.1, "Bruno Diaz")
            .with_manager(REQUESTER.0)
            .with_org_unit(UNIT_TREASURY),
        employee_model::Model::new(EMP_B.0, EMP_B.1, "Carla Rios")
            .with_manager(REQUESTER.0)
            .with_org_unit(UNIT_FINANCE),
        employee_model::Model::new(EMP_C.0, EMP_C.1, "Diego Paz")
            .with_manager(EMP_B.0)
            .with_org_unit(UNIT_TREASURY),
        employee_model::Model::new(EMP_X.0, EMP_X.1, "Elena Soto").with_org_unit(UNIT_SALES),
        employee_model::Model::new(ADMIN.0, ADMIN.1, "Fabian Luna")
            .with_global_role("SUPERADMIN")
            .with_org_unit(UNIT_HEAD_OFFICE),
        employee_model::Model::new(SALES_REP.0, SALES_REP.1, "Gabriela Vera")
            .with_manager(EMP_X.0)
            .with_org_unit(UNIT_SALES),
        employee_model::Model::new(RETIRED.0, RETIRED.1, "Hugo Ortiz")
            .with_manager(EMP_X.0)
            .with_org_unit(UNIT_SALES)
            .deactivated(),
    ] {
        employees.create(employee).await.unwrap();
    }
}

pub async fn insert_delegation(
    db: &DatabaseConnection,
    delegator: &str,
    delegate: &str,
    end_date: Option<NaiveDate>,
) -> delegation_model::Model {
    let mut delegation = delegation_model::Model::new(delegator, delegate);
    delegation.end_date = end_date;
    DelegationRepository::new(db.clone())
        .create(delegation)
        .await
        .unwrap()
}

pub async fn insert_area_permit(
    db: &DatabaseConnection,
    grantee: &str,
    root: i64,
    scope: AreaScope,
) -> area_permit_model::Model {
    AreaPermitRepository::new(db.clone())
        .create(area_permit_model::Model::new(grantee, root, scope))
        .await
        .unwrap()
}

pub async fn insert_employee_permit(
    db: &DatabaseConnection,
    grantee: &str,
    target: &str,
    access_type: AccessType,
    end_date: Option<NaiveDate>,
) -> employee_permit_model::Model {
    let mut permit = employee_permit_model::Model::new(grantee, target, Some(access_type));
    permit.end_date = end_date;
    EmployeePermitRepository::new(db.clone())
        .create(permit)
        .await
        .unwrap()
}
