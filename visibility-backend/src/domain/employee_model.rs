// visibility-backend/src/domain/employee_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 全従業員を閲覧できるグローバルロール（比較は大文字・前後空白除去で行う）
pub const ADMIN_ROLES: [&str; 2] = ["ADMIN", "SUPERADMIN"];

/// 従業員エンティティ
///
/// `employee_id` は社員番号（可視性計算で使う識別子）、`account_id` はログイン側の数値ID。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub employee_id: String,
    #[sea_orm(unique)]
    pub account_id: i64,
    pub display_name: String,
    #[sea_orm(nullable)]
    pub email: Option<String>,
    #[sea_orm(nullable)]
    pub job_title: Option<String>,
    #[sea_orm(nullable)]
    pub org_unit_id: Option<i64>,
    #[sea_orm(nullable)]
    pub manager_id: Option<String>,
    #[sea_orm(nullable)]
    pub global_role: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::org_unit_model::Entity",
        from = "Column::OrgUnitId",
        to = "super::org_unit_model::Column::Id"
    )]
    OrgUnit,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ManagerId",
        to = "Column::EmployeeId"
    )]
    Manager,
}

impl Related<super::org_unit_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrgUnit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn new(
        employee_id: impl Into<String>,
        account_id: i64,
        display_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            employee_id: employee_id.into(),
            account_id,
            display_name: display_name.into(),
            email: None,
            job_title: None,
            org_unit_id: None,
            manager_id: None,
            global_role: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_manager(mut self, manager_id: impl Into<String>) -> Self {
        self.manager_id = Some(manager_id.into());
        self
    }

    pub fn with_org_unit(mut self, org_unit_id: i64) -> Self {
        self.org_unit_id = Some(org_unit_id);
        self
    }

    pub fn with_global_role(mut self, role: impl Into<String>) -> Self {
        self.global_role = Some(role.into());
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// 前後の空白を除いた社員番号
    pub fn id(&self) -> &str {
        self.employee_id.trim()
    }

    /// 上司の社員番号（空文字は上司なしとして扱う）
    pub fn manager_ref(&self) -> Option<&str> {
        self.manager_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn has_admin_role(&self) -> bool {
        self.global_role.as_deref().is_some_and(is_admin_role)
    }
}

pub fn is_admin_role(role: &str) -> bool {
    let normalized = role.trim().to_uppercase();
    ADMIN_ROLES.contains(&normalized.as_str())
}
