use axum::{extract::State, routing::get, Router};
use serde::{Deserialize, Serialize};

use crate::{api::AppState, error::AppError, types::ApiResponse};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
    pub database: String,
}

/// ヘルスチェック（認証不要）
pub async fn health_handler(
    State(app_state): State<AppState>,
) -> Result<ApiResponse<HealthResponse>, AppError> {
    let database = match app_state.db.ping().await {
        Ok(()) => "up",
        Err(e) => {
            tracing::warn!(error = %e, "Database ping failed");
            "down"
        }
    };

    Ok(ApiResponse::success(HealthResponse {
        status: "ok".to_string(),
        environment: app_state.config.environment.clone(),
        database: database.to_string(),
    }))
}

pub fn system_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(app_state)
}
