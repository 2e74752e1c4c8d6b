// visibility-backend/src/api/dto/access_dto.rs

use crate::domain::{area_permit_model, delegation_model, employee_permit_model};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// エリア権限作成リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAreaPermitRequest {
    #[validate(length(min = 1, max = 50, message = "Grantee id must be 1-50 characters"))]
    pub grantee_id: String,

    #[validate(range(min = 1, message = "Org unit id must be positive"))]
    pub root_org_unit_id: i64,

    /// SUBTREE / NODE_ONLY（省略時 SUBTREE）
    pub scope: Option<String>,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    #[validate(length(max = 500, message = "Reason cannot exceed 500 characters"))]
    pub reason: Option<String>,
}

/// 個別権限作成リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEmployeePermitRequest {
    #[validate(length(min = 1, max = 50, message = "Grantee id must be 1-50 characters"))]
    pub grantee_id: String,

    #[validate(length(min = 1, max = 50, message = "Target id must be 1-50 characters"))]
    pub target_id: String,

    /// ALLOW / DENY（省略時 ALLOW）
    pub access_type: Option<String>,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    #[validate(length(max = 500, message = "Reason cannot exceed 500 characters"))]
    pub reason: Option<String>,
}

/// 一覧の絞り込み（指定時はその被付与者の有効な権限のみ）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GranteeQuery {
    pub grantee_id: Option<String>,
}

impl GranteeQuery {
    pub fn grantee(&self) -> Option<&str> {
        self.grantee_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// 代理作成リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDelegationRequest {
    #[validate(length(min = 1, max = 50, message = "Delegator id must be 1-50 characters"))]
    pub delegator_id: String,

    #[validate(length(min = 1, max = 50, message = "Delegate id must be 1-50 characters"))]
    pub delegate_id: String,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    #[validate(length(max = 500, message = "Reason cannot exceed 500 characters"))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaPermitResponse {
    pub id: Uuid,
    pub grantor_id: Option<String>,
    pub grantee_id: String,
    pub root_org_unit_id: i64,
    pub scope: String,
    pub is_active: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<area_permit_model::Model> for AreaPermitResponse {
    fn from(permit: area_permit_model::Model) -> Self {
        Self {
            id: permit.id,
            grantor_id: permit.grantor_id,
            grantee_id: permit.grantee_id,
            root_org_unit_id: permit.root_org_unit_id,
            scope: permit.scope,
            is_active: permit.is_active,
            start_date: permit.start_date,
            end_date: permit.end_date,
            reason: permit.reason,
            created_at: permit.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeePermitResponse {
    pub id: Uuid,
    pub grantor_id: Option<String>,
    pub grantee_id: String,
    pub target_id: String,
    /// 未設定は ALLOW として返す
    pub access_type: String,
    pub is_active: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<employee_permit_model::Model> for EmployeePermitResponse {
    fn from(permit: employee_permit_model::Model) -> Self {
        let access_type = permit
            .effective_access_type()
            .map(|t| t.to_string())
            .or_else(|| permit.access_type.clone())
            .unwrap_or_default();
        Self {
            id: permit.id,
            grantor_id: permit.grantor_id,
            grantee_id: permit.grantee_id,
            target_id: permit.target_id,
            access_type,
            is_active: permit.is_active,
            start_date: permit.start_date,
            end_date: permit.end_date,
            reason: permit.reason,
            created_at: permit.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegationResponse {
    pub id: Uuid,
    pub delegator_id: String,
    pub delegate_id: String,
    pub is_active: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<delegation_model::Model> for DelegationResponse {
    fn from(delegation: delegation_model::Model) -> Self {
        Self {
            id: delegation.id,
            delegator_id: delegation.delegator_id,
            delegate_id: delegation.delegate_id,
            is_active: delegation.is_active,
            start_date: delegation.start_date,
            end_date: delegation.end_date,
            reason: delegation.reason,
            created_at: delegation.created_at,
        }
    }
}
