// visibility-backend/src/api/handlers/access_handler.rs

use crate::api::dto::access_dto::{
    AreaPermitResponse, CreateAreaPermitRequest, CreateDelegationRequest,
    CreateEmployeePermitRequest, DelegationResponse, EmployeePermitResponse, GranteeQuery,
};
use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminEmployee;
use crate::types::ApiResponse;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Router,
};
use tracing::info;
use uuid::Uuid;

// --- カスタム抽出器 ---

/// UUID パス抽出器
pub struct UuidPath(pub Uuid);

impl<S> axum::extract::FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Path(path_str) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::BadRequest("Invalid path parameter".to_string()))?;

        let uuid = Uuid::parse_str(path_str.trim())
            .map_err(|_| AppError::BadRequest(format!("Invalid UUID format: '{}'", path_str)))?;

        Ok(UuidPath(uuid))
    }
}

// --- エリア権限 ---

pub async fn create_area_permit_handler(
    State(app_state): State<AppState>,
    AdminEmployee(admin): AdminEmployee,
    Json(payload): Json<CreateAreaPermitRequest>,
) -> AppResult<impl IntoResponse> {
    info!(
        admin_id = %admin.employee_id,
        grantee_id = %payload.grantee_id,
        root_org_unit_id = payload.root_org_unit_id,
        "Creating area permit"
    );

    let created = app_state
        .access_grant_service
        .create_area_permit(&admin.employee_id, payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(created)))
}

pub async fn list_area_permits_handler(
    State(app_state): State<AppState>,
    AdminEmployee(_admin): AdminEmployee,
    Query(query): Query<GranteeQuery>,
) -> AppResult<ApiResponse<Vec<AreaPermitResponse>>> {
    let permits = match query.grantee() {
        Some(grantee_id) => {
            app_state
                .access_grant_service
                .list_area_permits_for(grantee_id)
                .await?
        }
        None => {
            app_state
                .access_grant_service
                .list_active_area_permits()
                .await?
        }
    };
    let total = permits.len() as u64;

    Ok(ApiResponse::with_total(permits, total))
}

pub async fn deactivate_area_permit_handler(
    State(app_state): State<AppState>,
    AdminEmployee(admin): AdminEmployee,
    UuidPath(id): UuidPath,
) -> AppResult<ApiResponse<AreaPermitResponse>> {
    let permit = app_state
        .access_grant_service
        .deactivate_area_permit(id)
        .await?;

    info!(admin_id = %admin.employee_id, permit_id = %id, "Area permit revoked");
    Ok(ApiResponse::success(permit))
}

// --- 個別権限 ---

pub async fn create_employee_permit_handler(
    State(app_state): State<AppState>,
    AdminEmployee(admin): AdminEmployee,
    Json(payload): Json<CreateEmployeePermitRequest>,
) -> AppResult<impl IntoResponse> {
    info!(
        admin_id = %admin.employee_id,
        grantee_id = %payload.grantee_id,
        target_id = %payload.target_id,
        "Creating employee permit"
    );

    let created = app_state
        .access_grant_service
        .create_employee_permit(&admin.employee_id, payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(created)))
}

pub async fn list_employee_permits_handler(
    State(app_state): State<AppState>,
    AdminEmployee(_admin): AdminEmployee,
    Query(query): Query<GranteeQuery>,
) -> AppResult<ApiResponse<Vec<EmployeePermitResponse>>> {
    let permits = match query.grantee() {
        Some(grantee_id) => {
            app_state
                .access_grant_service
                .list_employee_permits_for(grantee_id)
                .await?
        }
        None => {
            app_state
                .access_grant_service
                .list_active_employee_permits()
                .await?
        }
    };
    let total = permits.len() as u64;

    Ok(ApiResponse::with_total(permits, total))
}

pub async fn deactivate_employee_permit_handler(
    State(app_state): State<AppState>,
    AdminEmployee(admin): AdminEmployee,
    UuidPath(id): UuidPath,
) -> AppResult<ApiResponse<EmployeePermitResponse>> {
    let permit = app_state
        .access_grant_service
        .deactivate_employee_permit(id)
        .await?;

    info!(admin_id = %admin.employee_id, permit_id = %id, "Employee permit revoked");
    Ok(ApiResponse::success(permit))
}

// --- 代理 ---

pub async fn create_delegation_handler(
    State(app_state): State<AppState>,
    AdminEmployee(admin): AdminEmployee,
    Json(payload): Json<CreateDelegationRequest>,
) -> AppResult<impl IntoResponse> {
    info!(
        admin_id = %admin.employee_id,
        delegator_id = %payload.delegator_id,
        delegate_id = %payload.delegate_id,
        "Creating delegation"
    );

    let created = app_state
        .access_grant_service
        .create_delegation(payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(created)))
}

pub async fn list_delegations_handler(
    State(app_state): State<AppState>,
    AdminEmployee(_admin): AdminEmployee,
) -> AppResult<ApiResponse<Vec<DelegationResponse>>> {
    let delegations = app_state
        .access_grant_service
        .list_active_delegations()
        .await?;
    let total = delegations.len() as u64;

    Ok(ApiResponse::with_total(delegations, total))
}

pub async fn delegations_by_delegate_handler(
    State(app_state): State<AppState>,
    AdminEmployee(_admin): AdminEmployee,
    Path(delegate_id): Path<String>,
) -> AppResult<ApiResponse<Vec<DelegationResponse>>> {
    let delegations = app_state
        .access_grant_service
        .list_delegations_by_delegate(delegate_id.trim())
        .await?;
    let total = delegations.len() as u64;

    Ok(ApiResponse::with_total(delegations, total))
}

pub async fn delegations_by_delegator_handler(
    State(app_state): State<AppState>,
    AdminEmployee(_admin): AdminEmployee,
    Path(delegator_id): Path<String>,
) -> AppResult<ApiResponse<Vec<DelegationResponse>>> {
    let delegations = app_state
        .access_grant_service
        .list_delegations_by_delegator(delegator_id.trim())
        .await?;
    let total = delegations.len() as u64;

    Ok(ApiResponse::with_total(delegations, total))
}

pub async fn deactivate_delegation_handler(
    State(app_state): State<AppState>,
    AdminEmployee(admin): AdminEmployee,
    UuidPath(id): UuidPath,
) -> AppResult<ApiResponse<DelegationResponse>> {
    let delegation = app_state
        .access_grant_service
        .deactivate_delegation(id)
        .await?;

    info!(admin_id = %admin.employee_id, delegation_id = %id, "Delegation revoked");
    Ok(ApiResponse::success(delegation))
}

// --- ルーター ---

pub fn access_router(app_state: AppState) -> Router {
    Router::new()
        // エリア権限
        .route(
            "/access/area-permits",
            get(list_area_permits_handler).post(create_area_permit_handler),
        )
        .route(
            "/access/area-permits/{id}",
            delete(deactivate_area_permit_handler),
        )
        // 個別権限
        .route(
            "/access/employee-permits",
            get(list_employee_permits_handler).post(create_employee_permit_handler),
        )
        .route(
            "/access/employee-permits/{id}",
            delete(deactivate_employee_permit_handler),
        )
        // 代理
        .route(
            "/access/delegations",
            get(list_delegations_handler).post(create_delegation_handler),
        )
        .route(
            "/access/delegations/{id}",
            delete(deactivate_delegation_handler),
        )
        .route(
            "/access/delegations/by-delegate/{employee_id}",
            get(delegations_by_delegate_handler),
        )
        .route(
            "/access/delegations/by-delegator/{employee_id}",
            get(delegations_by_delegator_handler),
        )
        .with_state(app_state)
}
