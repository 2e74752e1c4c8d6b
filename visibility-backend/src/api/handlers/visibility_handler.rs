// visibility-backend/src/api/handlers/visibility_handler.rs

use crate::api::dto::employee_dto::{
    CanViewResponse, EffectiveActorsResponse, EmployeeRecord, ViewerRecord, VisibleIdsResponse,
};
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::{AdminEmployee, AuthenticatedEmployee};
use crate::types::ApiResponse;
use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use tracing::info;

// --- 自分の可視範囲 ---

/// 認証済み従業員が閲覧できる社員番号
pub async fn my_visible_ids_handler(
    State(app_state): State<AppState>,
    employee: AuthenticatedEmployee,
) -> AppResult<ApiResponse<VisibleIdsResponse>> {
    let visible_ids: Vec<String> = app_state
        .visibility_service
        .get_visible_ids(&employee.employee_id)
        .await
        .into_iter()
        .collect();
    let total = visible_ids.len() as u64;

    Ok(ApiResponse::with_total(
        VisibleIdsResponse {
            employee_id: employee.employee_id,
            visible_ids,
        },
        total,
    ))
}

pub async fn my_visible_employees_handler(
    State(app_state): State<AppState>,
    employee: AuthenticatedEmployee,
) -> AppResult<ApiResponse<Vec<EmployeeRecord>>> {
    let records = app_state
        .visibility_service
        .get_visible_employees(&employee.employee_id)
        .await;
    let total = records.len() as u64;

    Ok(ApiResponse::with_total(records, total))
}

pub async fn my_actors_handler(
    State(app_state): State<AppState>,
    employee: AuthenticatedEmployee,
) -> AppResult<ApiResponse<EffectiveActorsResponse>> {
    let actors = app_state
        .visibility_service
        .get_effective_actors(&employee.employee_id)
        .await;

    Ok(ApiResponse::success(EffectiveActorsResponse {
        employee_id: employee.employee_id,
        actors,
    }))
}

pub async fn can_view_handler(
    State(app_state): State<AppState>,
    employee: AuthenticatedEmployee,
    Path(target_id): Path<String>,
) -> AppResult<ApiResponse<CanViewResponse>> {
    let can_view = app_state
        .visibility_service
        .can_view(&employee.employee_id, &target_id)
        .await;

    Ok(ApiResponse::success(CanViewResponse {
        target_id: target_id.trim().to_string(),
        can_view,
    }))
}

/// 数値アカウントIDでの閲覧可否（依頼者はトークンの account_id）
pub async fn can_view_account_handler(
    State(app_state): State<AppState>,
    employee: AuthenticatedEmployee,
    Path(target_account_id): Path<i64>,
) -> AppResult<ApiResponse<CanViewResponse>> {
    let can_view = app_state
        .visibility_service
        .can_view_by_id(employee.account_id, target_account_id)
        .await;

    Ok(ApiResponse::success(CanViewResponse {
        target_id: target_account_id.to_string(),
        can_view,
    }))
}

pub async fn my_viewers_handler(
    State(app_state): State<AppState>,
    employee: AuthenticatedEmployee,
) -> AppResult<ApiResponse<Vec<ViewerRecord>>> {
    let viewers = app_state
        .visibility_service
        .get_viewers(&employee.employee_id)
        .await;
    let total = viewers.len() as u64;

    Ok(ApiResponse::with_total(viewers, total))
}

// --- 閲覧ガード付きの従業員参照 ---

pub async fn get_employee_handler(
    State(app_state): State<AppState>,
    employee: AuthenticatedEmployee,
    Path(target_id): Path<String>,
) -> AppResult<ApiResponse<EmployeeRecord>> {
    let record = app_state
        .visibility_service
        .get_employee_for(&employee.employee_id, &target_id)
        .await?;

    Ok(ApiResponse::success(record))
}

// --- 管理者向け ---

/// 他の従業員の可視範囲を確認する
pub async fn visible_ids_of_handler(
    State(app_state): State<AppState>,
    AdminEmployee(admin): AdminEmployee,
    Path(employee_id): Path<String>,
) -> AppResult<ApiResponse<VisibleIdsResponse>> {
    let employee_id = employee_id.trim().to_string();
    let visible_ids: Vec<String> = app_state
        .visibility_service
        .get_visible_ids(&employee_id)
        .await
        .into_iter()
        .collect();
    let total = visible_ids.len() as u64;

    info!(
        admin_id = %admin.employee_id,
        employee_id = %employee_id,
        visible_count = total,
        "Admin inspected visibility"
    );

    Ok(ApiResponse::with_total(
        VisibleIdsResponse {
            employee_id,
            visible_ids,
        },
        total,
    ))
}

// --- ルーター ---

pub fn visibility_router(app_state: AppState) -> Router {
    Router::new()
        .route("/visibility/me", get(my_visible_ids_handler))
        .route("/visibility/me/employees", get(my_visible_employees_handler))
        .route("/visibility/me/actors", get(my_actors_handler))
        .route("/visibility/me/viewers", get(my_viewers_handler))
        .route(
            "/visibility/me/can-view/{employee_id}",
            get(can_view_handler),
        )
        .route(
            "/visibility/me/can-view-account/{account_id}",
            get(can_view_account_handler),
        )
        .route("/visibility/{employee_id}", get(visible_ids_of_handler))
        .route("/employees/{employee_id}", get(get_employee_handler))
        .with_state(app_state)
}
