// visibility-backend/src/api/handlers/org_unit_handler.rs

use crate::api::dto::org_unit_dto::{OrgUnitDetail, OrgUnitPreview, OrgUnitTreeNode, PreviewQuery};
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AdminEmployee;
use crate::types::ApiResponse;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};

/// 在籍者数付きの組織ツリー
pub async fn org_unit_tree_handler(
    State(app_state): State<AppState>,
    AdminEmployee(_admin): AdminEmployee,
) -> AppResult<ApiResponse<Vec<OrgUnitTreeNode>>> {
    let tree = app_state.org_unit_service.get_tree().await?;
    Ok(ApiResponse::success(tree))
}

pub async fn get_org_unit_handler(
    State(app_state): State<AppState>,
    AdminEmployee(_admin): AdminEmployee,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<OrgUnitDetail>> {
    let unit = app_state.org_unit_service.get_unit(id).await?;
    Ok(ApiResponse::success(unit))
}

/// エリア権限を付与する前の確認用
pub async fn preview_org_unit_handler(
    State(app_state): State<AppState>,
    AdminEmployee(_admin): AdminEmployee,
    Path(id): Path<i64>,
    Query(query): Query<PreviewQuery>,
) -> AppResult<ApiResponse<OrgUnitPreview>> {
    let preview = app_state
        .org_unit_service
        .preview(id, query.scope.as_deref())
        .await?;
    let total = preview.total;

    Ok(ApiResponse::with_total(preview, total))
}

pub fn org_unit_router(app_state: AppState) -> Router {
    Router::new()
        .route("/org-units/tree", get(org_unit_tree_handler))
        .route("/org-units/{id}", get(get_org_unit_handler))
        .route("/org-units/{id}/preview", get(preview_org_unit_handler))
        .with_state(app_state)
}
