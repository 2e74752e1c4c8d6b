// visibility-backend/src/api/dto/org_unit_dto.rs

use super::employee_dto::EmployeeRecord;
use crate::domain::org_unit_model;
use serde::{Deserialize, Serialize};

/// 組織ツリーのノード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgUnitTreeNode {
    pub id: i64,
    pub name: String,
    pub kind: Option<String>,
    pub parent_id: Option<i64>,
    /// 直接所属の在籍者数
    pub direct_count: i64,
    /// サブツリー全体の在籍者数
    pub total_count: i64,
    pub children: Vec<OrgUnitTreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgUnitDetail {
    pub id: i64,
    pub name: String,
    pub kind: Option<String>,
    pub parent_id: Option<i64>,
    pub sort_order: i32,
    pub is_active: bool,
    pub direct_count: u64,
}

impl OrgUnitDetail {
    pub fn new(unit: org_unit_model::Model, direct_count: u64) -> Self {
        Self {
            id: unit.id,
            name: unit.name,
            kind: unit.kind,
            parent_id: unit.parent_id,
            sort_order: unit.sort_order,
            is_active: unit.is_active,
            direct_count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub scope: Option<String>,
}

/// エリア権限を付与した場合に見える従業員のプレビュー
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgUnitPreview {
    pub org_unit_id: i64,
    pub scope: String,
    pub total: u64,
    pub sample: Vec<EmployeeRecord>,
}
