// visibility-backend/src/domain/visibility_snapshot.rs

use super::{
    area_permit_model, delegation_model, employee_model, employee_permit_model, org_unit_model,
};
use chrono::NaiveDate;

/// 1回の可視性計算に使うストアの一貫した読み取り結果
///
/// `today` はストア側の日付（`CURRENT_DATE`）で、有効期限の判定はすべてこれに揃える。
#[derive(Debug, Clone)]
pub struct VisibilitySnapshot {
    pub today: NaiveDate,
    pub employees: Vec<employee_model::Model>,
    pub org_units: Vec<org_unit_model::Model>,
    /// 依頼者を delegate とする代理
    pub delegations: Vec<delegation_model::Model>,
    /// アクターのいずれかを grantee とする権限
    pub area_permits: Vec<area_permit_model::Model>,
    pub employee_permits: Vec<employee_permit_model::Model>,
}

impl VisibilitySnapshot {
    pub fn empty(today: NaiveDate) -> Self {
        Self {
            today,
            employees: Vec::new(),
            org_units: Vec::new(),
            delegations: Vec::new(),
            area_permits: Vec::new(),
            employee_permits: Vec::new(),
        }
    }
}

/// アクター展開だけに必要な読み取り結果
#[derive(Debug, Clone)]
pub struct DelegationSnapshot {
    pub today: NaiveDate,
    pub delegations: Vec<delegation_model::Model>,
}
