// visibility-backend/src/api/dto/employee_dto.rs

use crate::domain::{employee_model, org_unit_model};
use serde::{Deserialize, Serialize};

/// 表示用の従業員レコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub employee_id: String,
    pub account_id: i64,
    pub display_name: String,
    pub email: Option<String>,
    pub job_title: Option<String>,
    pub org_unit_id: Option<i64>,
    pub org_unit_name: Option<String>,
    pub manager_id: Option<String>,
    pub is_active: bool,
}

impl From<employee_model::Model> for EmployeeRecord {
    fn from(employee: employee_model::Model) -> Self {
        Self {
            manager_id: employee.manager_ref().map(str::to_string),
            employee_id: employee.id().to_string(),
            account_id: employee.account_id,
            display_name: employee.display_name,
            email: employee.email,
            job_title: employee.job_title,
            org_unit_id: employee.org_unit_id,
            org_unit_name: None,
            is_active: employee.is_active,
        }
    }
}

impl EmployeeRecord {
    pub fn with_org_unit(employee: employee_model::Model, unit: Option<org_unit_model::Model>) -> Self {
        let mut record = Self::from(employee);
        record.org_unit_name = unit.map(|u| u.name);
        record
    }
}

/// 自分を閲覧できる人
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerRecord {
    pub employee_id: String,
    pub display_name: String,
    pub job_title: Option<String>,
    pub reason: ViewerReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerReason {
    DirectManager,
}

/// 可視IDの一覧レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct VisibleIdsResponse {
    pub employee_id: String,
    pub visible_ids: Vec<String>,
}

/// 閲覧可否レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct CanViewResponse {
    pub target_id: String,
    pub can_view: bool,
}

/// 実効アクターのレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct EffectiveActorsResponse {
    pub employee_id: String,
    pub actors: Vec<String>,
}
