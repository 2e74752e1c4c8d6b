// visibility-backend/src/api/mod.rs
use crate::config::AppConfig;
use crate::logging::{inject_request_context, logging_middleware};
use crate::middleware::auth::{cors_layer, jwt_auth_middleware, AuthMiddlewareConfig};
use crate::repository::{
    employee_repository::EmployeeRepository,
    visibility_snapshot_repository::VisibilitySnapshotRepository,
};
use crate::service::{
    access_grant_service::AccessGrantService, org_unit_service::OrgUnitService,
    visibility_service::VisibilityService,
};
use crate::utils::jwt::{JwtConfig, JwtError, JwtManager};
use axum::{middleware as axum_middleware, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub mod dto;
pub mod handlers;

use handlers::{access_handler, org_unit_handler, system_handler, visibility_handler};

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub visibility_service: Arc<VisibilityService>,
    pub access_grant_service: Arc<AccessGrantService>,
    pub org_unit_service: Arc<OrgUnitService>,
    pub jwt_manager: Arc<JwtManager>,
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, app_config: &AppConfig) -> Result<Self, JwtError> {
        let jwt_manager = Arc::new(JwtManager::new(JwtConfig::from(&app_config.jwt))?);

        let employee_repo = Arc::new(EmployeeRepository::new(db.clone()));
        let visibility_service = Arc::new(VisibilityService::new(
            Arc::new(VisibilitySnapshotRepository::new(db.clone())),
            employee_repo.clone(),
            employee_repo,
        ));

        Ok(Self {
            visibility_service,
            access_grant_service: Arc::new(AccessGrantService::new(db.clone())),
            org_unit_service: Arc::new(OrgUnitService::new(db.clone())),
            jwt_manager,
            db,
            config: Arc::new(app_config.clone()),
        })
    }
}

/// 全ルーターを統合し、ミドルウェアを積む
pub fn build_app_router(app_state: AppState) -> Router {
    let auth_config = AuthMiddlewareConfig::new(app_state.jwt_manager.clone());
    let config = app_state.config.clone();

    Router::new()
        .merge(system_handler::system_router(app_state.clone()))
        .merge(visibility_handler::visibility_router(app_state.clone()))
        .merge(access_handler::access_router(app_state.clone()))
        .merge(org_unit_handler::org_unit_router(app_state))
        .layer(axum_middleware::from_fn_with_state(
            auth_config,
            jwt_auth_middleware,
        ))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(axum_middleware::from_fn(inject_request_context))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_allowed_origins))
}
