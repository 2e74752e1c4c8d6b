// visibility-backend/src/domain/employee_permit_model.rs

use super::validity::ValidityWindow;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 個別権限の種別
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessType {
    #[default]
    Allow,
    Deny,
}

impl AccessType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "ALLOW" => Some(Self::Allow),
            "DENY" => Some(Self::Deny),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "ALLOW",
            Self::Deny => "DENY",
        }
    }
}

impl std::fmt::Display for AccessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 従業員単位の個別権限（ALLOW / DENY）
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employee_permits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(nullable)]
    pub grantor_id: Option<String>,
    pub grantee_id: String,
    pub target_id: String,
    #[sea_orm(nullable)]
    pub access_type: Option<String>,
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
        belongs_to = "super::employee_model::Entity",
        from = "Column::TargetId",
        to = "super::employee_model::Column::EmployeeId"
    )]
    Target,
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
    pub fn new(
        grantee_id: impl Into<String>,
        target_id: impl Into<String>,
        access_type: Option<AccessType>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            grantor_id: None,
            grantee_id: grantee_id.into(),
            target_id: target_id.into(),
            access_type: access_type.map(|t| t.as_str().to_string()),
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

    /// 未設定・空文字は ALLOW。解釈できない値は None。
    pub fn effective_access_type(&self) -> Option<AccessType> {
        match self.access_type.as_deref().map(str::trim) {
            None | Some("") => Some(AccessType::Allow),
            Some(value) => AccessType::parse(value),
        }
    }
}
