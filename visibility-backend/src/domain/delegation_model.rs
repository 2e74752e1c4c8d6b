// visibility-backend/src/domain/delegation_model.rs

use super::validity::ValidityWindow;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 可視性の代理（delegator が見えるものを delegate も見られる）。1段のみで連鎖しない。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "visibility_delegations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub delegator_id: String,
    pub delegate_id: String,
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
        from = "Column::DelegatorId",
        to = "super::employee_model::Column::EmployeeId"
    )]
    Delegator,
    #[sea_orm(
        belongs_to = "super::employee_model::Entity",
        from = "Column::DelegateId",
        to = "super::employee_model::Column::EmployeeId"
    )]
    Delegate,
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
    pub fn new(delegator_id: impl Into<String>, delegate_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            delegator_id: delegator_id.into(),
            delegate_id: delegate_id.into(),
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
}
