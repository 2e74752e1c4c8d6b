// visibility-backend/src/service/access_grant_service.rs

use crate::api::dto::access_dto::{
    AreaPermitResponse, CreateAreaPermitRequest, CreateDelegationRequest,
    CreateEmployeePermitRequest, DelegationResponse, EmployeePermitResponse,
};
use crate::domain::{
    area_permit_model::{self, AreaScope},
    delegation_model,
    employee_permit_model::{self, AccessType},
};
use crate::error::AppResult;
use crate::repository::{
    area_permit_repository::AreaPermitRepository, current_date,
    delegation_repository::DelegationRepository,
    employee_permit_repository::EmployeePermitRepository,
    employee_repository::EmployeeRepository, org_unit_repository::OrgUnitRepository,
};
use crate::utils::error_helper::{bad_request_error, convert_validation_errors, not_found_error};
use chrono::NaiveDate;
use sea_orm::DbConn;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// エリア権限・個別権限・代理の管理
pub struct AccessGrantService {
    db: DbConn,
    employee_repo: Arc<EmployeeRepository>,
    org_unit_repo: Arc<OrgUnitRepository>,
    area_permit_repo: Arc<AreaPermitRepository>,
    employee_permit_repo: Arc<EmployeePermitRepository>,
    delegation_repo: Arc<DelegationRepository>,
}

fn trimmed_reason(reason: Option<String>) -> Option<String> {
    reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}

fn check_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    context: &str,
) -> AppResult<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(bad_request_error(
                "end_date must not be before start_date",
                context,
            ));
        }
    }
    Ok(())
}

impl AccessGrantService {
    pub fn new(db: DbConn) -> Self {
        Self {
            employee_repo: Arc::new(EmployeeRepository::new(db.clone())),
            org_unit_repo: Arc::new(OrgUnitRepository::new(db.clone())),
            area_permit_repo: Arc::new(AreaPermitRepository::new(db.clone())),
            employee_permit_repo: Arc::new(EmployeePermitRepository::new(db.clone())),
            delegation_repo: Arc::new(DelegationRepository::new(db.clone())),
            db,
        }
    }

    async fn today(&self) -> AppResult<NaiveDate> {
        Ok(current_date(&self.db).await?)
    }

    async fn ensure_employee_exists(&self, employee_id: &str, role: &str, context: &str) -> AppResult<()> {
        if !self.employee_repo.exists(employee_id).await? {
            return Err(bad_request_error(
                &format!("{} {} does not exist", role, employee_id),
                context,
            ));
        }
        Ok(())
    }

    // --- エリア権限 ---

    pub async fn create_area_permit(
        &self,
        grantor_id: &str,
        request: CreateAreaPermitRequest,
    ) -> AppResult<AreaPermitResponse> {
        const CONTEXT: &str = "access_grant_service::create_area_permit";
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, CONTEXT))?;

        let grantee_id = request.grantee_id.trim().to_string();
        let scope = match request.scope.as_deref().map(str::trim) {
            None | Some("") => AreaScope::default(),
            Some(raw) => AreaScope::parse(raw).ok_or_else(|| {
                bad_request_error("scope must be SUBTREE or NODE_ONLY", CONTEXT)
            })?,
        };
        check_window(request.start_date, request.end_date, CONTEXT)?;

        self.ensure_employee_exists(&grantee_id, "Grantee", CONTEXT)
            .await?;
        if self
            .org_unit_repo
            .find_by_id(request.root_org_unit_id)
            .await?
            .is_none()
        {
            return Err(bad_request_error(
                &format!("Org unit {} does not exist", request.root_org_unit_id),
                CONTEXT,
            ));
        }

        let mut permit = area_permit_model::Model::new(grantee_id, request.root_org_unit_id, scope);
        permit.grantor_id = Some(grantor_id.trim().to_string()).filter(|g| !g.is_empty());
        permit.start_date = request.start_date;
        permit.end_date = request.end_date;
        permit.reason = trimmed_reason(request.reason);

        let created = self.area_permit_repo.create(permit).await?;
        info!(
            permit_id = %created.id,
            grantee_id = %created.grantee_id,
            root_org_unit_id = created.root_org_unit_id,
            scope = %created.scope,
            "Area permit created"
        );
        Ok(created.into())
    }

    pub async fn list_area_permits_for(&self, grantee_id: &str) -> AppResult<Vec<AreaPermitResponse>> {
        let today = self.today().await?;
        let permits = self
            .area_permit_repo
            .find_in_force_by_grantee(grantee_id, today)
            .await?;
        Ok(permits.into_iter().map(Into::into).collect())
    }

    pub async fn list_active_area_permits(&self) -> AppResult<Vec<AreaPermitResponse>> {
        let permits = self.area_permit_repo.find_all_active().await?;
        Ok(permits.into_iter().map(Into::into).collect())
    }

    pub async fn deactivate_area_permit(&self, id: Uuid) -> AppResult<AreaPermitResponse> {
        let permit = self.area_permit_repo.deactivate(id).await?.ok_or_else(|| {
            not_found_error(
                "Area permit",
                &id.to_string(),
                "access_grant_service::deactivate_area_permit",
            )
        })?;
        info!(permit_id = %id, "Area permit deactivated");
        Ok(permit.into())
    }

    // --- 個別権限 ---

    pub async fn create_employee_permit(
        &self,
        grantor_id: &str,
        request: CreateEmployeePermitRequest,
    ) -> AppResult<EmployeePermitResponse> {
        const CONTEXT: &str = "access_grant_service::create_employee_permit";
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, CONTEXT))?;

        let grantee_id = request.grantee_id.trim().to_string();
        let target_id = request.target_id.trim().to_string();
        if grantee_id == target_id {
            return Err(bad_request_error(
                "A permit cannot target its own grantee",
                CONTEXT,
            ));
        }
        let access_type = match request.access_type.as_deref().map(str::trim) {
            None | Some("") => AccessType::default(),
            Some(raw) => AccessType::parse(raw)
                .ok_or_else(|| bad_request_error("access_type must be ALLOW or DENY", CONTEXT))?,
        };
        check_window(request.start_date, request.end_date, CONTEXT)?;

        self.ensure_employee_exists(&grantee_id, "Grantee", CONTEXT)
            .await?;
        self.ensure_employee_exists(&target_id, "Target", CONTEXT)
            .await?;

        let mut permit = employee_permit_model::Model::new(grantee_id, target_id, Some(access_type));
        permit.grantor_id = Some(grantor_id.trim().to_string()).filter(|g| !g.is_empty());
        permit.start_date = request.start_date;
        permit.end_date = request.end_date;
        permit.reason = trimmed_reason(request.reason);

        let created = self.employee_permit_repo.create(permit).await?;
        info!(
            permit_id = %created.id,
            grantee_id = %created.grantee_id,
            target_id = %created.target_id,
            access_type = %access_type,
            "Employee permit created"
        );
        Ok(created.into())
    }

    pub async fn list_employee_permits_for(
        &self,
        grantee_id: &str,
    ) -> AppResult<Vec<EmployeePermitResponse>> {
        let today = self.today().await?;
        let permits = self
            .employee_permit_repo
            .find_in_force_by_grantee(grantee_id, today)
            .await?;
        Ok(permits.into_iter().map(Into::into).collect())
    }

    pub async fn list_active_employee_permits(&self) -> AppResult<Vec<EmployeePermitResponse>> {
        let permits = self.employee_permit_repo.find_all_active().await?;
        Ok(permits.into_iter().map(Into::into).collect())
    }

    pub async fn deactivate_employee_permit(&self, id: Uuid) -> AppResult<EmployeePermitResponse> {
        let permit = self.employee_permit_repo.deactivate(id).await?.ok_or_else(|| {
            not_found_error(
                "Employee permit",
                &id.to_string(),
                "access_grant_service::deactivate_employee_permit",
            )
        })?;
        info!(permit_id = %id, "Employee permit deactivated");
        Ok(permit.into())
    }

    // --- 代理 ---

    pub async fn create_delegation(
        &self,
        request: CreateDelegationRequest,
    ) -> AppResult<DelegationResponse> {
        const CONTEXT: &str = "access_grant_service::create_delegation";
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, CONTEXT))?;

        let delegator_id = request.delegator_id.trim().to_string();
        let delegate_id = request.delegate_id.trim().to_string();
        if delegator_id == delegate_id {
            return Err(bad_request_error(
                "An employee cannot delegate to themselves",
                CONTEXT,
            ));
        }
        check_window(request.start_date, request.end_date, CONTEXT)?;

        self.ensure_employee_exists(&delegator_id, "Delegator", CONTEXT)
            .await?;
        self.ensure_employee_exists(&delegate_id, "Delegate", CONTEXT)
            .await?;

        let mut delegation = delegation_model::Model::new(delegator_id, delegate_id);
        delegation.start_date = request.start_date;
        delegation.end_date = request.end_date;
        delegation.reason = trimmed_reason(request.reason);

        let created = self.delegation_repo.create(delegation).await?;
        info!(
            delegation_id = %created.id,
            delegator_id = %created.delegator_id,
            delegate_id = %created.delegate_id,
            "Delegation created"
        );
        Ok(created.into())
    }

    pub async fn list_delegations_by_delegate(
        &self,
        delegate_id: &str,
    ) -> AppResult<Vec<DelegationResponse>> {
        let today = self.today().await?;
        let delegations = self
            .delegation_repo
            .find_in_force_by_delegate(delegate_id, today)
            .await?;
        Ok(delegations.into_iter().map(Into::into).collect())
    }

    pub async fn list_delegations_by_delegator(
        &self,
        delegator_id: &str,
    ) -> AppResult<Vec<DelegationResponse>> {
        let today = self.today().await?;
        let delegations = self
            .delegation_repo
            .find_in_force_by_delegator(delegator_id, today)
            .await?;
        Ok(delegations.into_iter().map(Into::into).collect())
    }

    pub async fn list_active_delegations(&self) -> AppResult<Vec<DelegationResponse>> {
        let delegations = self.delegation_repo.find_all_active().await?;
        Ok(delegations.into_iter().map(Into::into).collect())
    }

    pub async fn deactivate_delegation(&self, id: Uuid) -> AppResult<DelegationResponse> {
        let delegation = self.delegation_repo.deactivate(id).await?.ok_or_else(|| {
            not_found_error(
                "Delegation",
                &id.to_string(),
                "access_grant_service::deactivate_delegation",
            )
        })?;
        info!(delegation_id = %id, "Delegation deactivated");
        Ok(delegation.into())
    }
}
