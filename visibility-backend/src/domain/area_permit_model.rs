// visibility-backend/src/domain/area_permit_model.rs

use super::validity::ValidityWindow;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// エリア権限の範囲
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AreaScope {
    /// ルートノードと全子孫ノード
    #[default]
    Subtree,
    /// ルートノード直属のみ
    NodeOnly,
}

impl AreaScope {
    /// 文字列から変換（大文字小文字・前後空白は無視）
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "SUBTREE" => Some(Self::Subtree),
            "NODE_ONLY" => Some(Self::NodeOnly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subtree => "SUBTREE",
            Self::NodeOnly => "NODE_ONLY",
        }
    }
}

impl std::fmt::Display for AreaScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// エリア権限（組織のサブツリーまたは単一ノードの閲覧権）
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "area_permits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(nullable)]
    pub grantor_id: Option<String>,
    pub grantee_id: String,
    pub root_org_unit_id: i64,
    pub scope: String,
    pub is_active: bool,
    #[sea_orm(nullable)]
    pub start_date: Option<NaiveDate>,
    #[sea_orm(nullable)]
    pub end_date: Option<NaiveDate>,
    #[sea_orm(nullable)]
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee_model::Entity",
        from = "Column::GranteeId",
        to = "super::employee_model::Column::EmployeeId"
    )]
    Grantee,
    #[sea_orm(
        belongs_to = "super::org_unit_model::Entity",
        from = "Column::RootOrgUnitId",
        to = "super::org_unit_model::Column::Id"
    )]
    RootOrgUnit,
}

impl Related<super::employee_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grantee.def()
    }
}

impl Related<super::org_unit_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RootOrgUnit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ValidityWindow for Model {
    fn active_flag(&self) -> bool {
        self.is_active
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}

impl Model {
    pub fn new(grantee_id: impl Into<String>, root_org_unit_id: i64, scope: AreaScope) -> Self {
        Self {
            id: Uuid::new_v4(),
            grantor_id: None,
            grantee_id: grantee_id.into(),
            root_org_unit_id,
            scope: scope.as_str().to_string(),
            is_active: true,
            start_date: None,
            end_date: None,
            reason: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// 保存値が不正な場合は None
    pub fn area_scope(&self) -> Option<AreaScope> {
        AreaScope::parse(&self.scope)
    }
}
