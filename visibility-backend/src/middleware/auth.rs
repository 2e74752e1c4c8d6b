// visibility-backend/src/middleware/auth.rs

use crate::domain::employee_model::is_admin_role;
use crate::error::AppError;
use crate::logging::RequestContext;
use crate::utils::error_helper::forbidden_error;
use crate::utils::jwt::{AccessTokenClaims, JwtManager};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::{debug, warn};

/// JWT認証ミドルウェアの設定
#[derive(Clone)]
pub struct AuthMiddlewareConfig {
    pub jwt_manager: Arc<JwtManager>,
    pub access_token_cookie_name: String,
    pub skip_auth_paths: Vec<String>,
    pub admin_only_paths: Vec<String>,
}

impl AuthMiddlewareConfig {
    pub fn new(jwt_manager: Arc<JwtManager>) -> Self {
        Self {
            jwt_manager,
            access_token_cookie_name: "access_token".to_string(),
            skip_auth_paths: vec!["/health".to_string()],
            admin_only_paths: vec!["/access".to_string(), "/org-units".to_string()],
        }
    }
}

/// 認証済み従業員（トークンの内容）
#[derive(Debug, Clone)]
pub struct AuthenticatedEmployee {
    pub employee_id: String,
    pub account_id: i64,
    pub role: Option<String>,
}

impl From<AccessTokenClaims> for AuthenticatedEmployee {
    fn from(claims: AccessTokenClaims) -> Self {
        Self {
            employee_id: claims.sub.trim().to_string(),
            account_id: claims.account_id,
            role: claims.role,
        }
    }
}

impl AuthenticatedEmployee {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref().is_some_and(is_admin_role)
    }

    pub fn ensure_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            return Ok(());
        }
        Err(forbidden_error(
            "Admin access required",
            "auth::ensure_admin",
            Some(&self.employee_id),
        ))
    }
}

/// 管理者であることを要求するエクストラクター
#[derive(Debug, Clone)]
pub struct AdminEmployee(pub AuthenticatedEmployee);

/// JWT認証ミドルウェア
pub async fn jwt_auth_middleware(
    State(config): State<AuthMiddlewareConfig>,
    headers: HeaderMap,
    cookie_jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    if should_skip_auth(&path, &config.skip_auth_paths) {
        return Ok(next.run(request).await);
    }

    let token = extract_token(&headers, &cookie_jar, &config.access_token_cookie_name)
        .ok_or_else(|| {
            warn!(path = %path, "Missing authentication token");
            AppError::Unauthorized("Authentication required".to_string())
        })?;

    let claims = config
        .jwt_manager
        .verify_access_token(&token)
        .map_err(|e| {
            warn!(path = %path, error = %e, "Invalid access token");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

    let employee = AuthenticatedEmployee::from(claims);

    if should_require_admin(&path, &config.admin_only_paths) {
        employee.ensure_admin()?;
    }

    // ロギング用のコンテキストに社員番号を反映
    let context = request.extensions_mut().get_mut::<RequestContext>().map(|context| {
        context.employee_id = Some(employee.employee_id.clone());
        context.clone()
    });

    debug!(
        employee_id = %employee.employee_id,
        role = ?employee.role,
        path = %path,
        "Authenticated request"
    );
    request.extensions_mut().insert(employee);

    let mut response = next.run(request).await;
    if let Some(context) = context {
        response.extensions_mut().insert(context);
    }
    Ok(response)
}

// --- ヘルパー関数 ---

/// Authorization ヘッダー（Bearer）を優先し、なければ Cookie から取得
fn extract_token(headers: &HeaderMap, cookie_jar: &CookieJar, cookie_name: &str) -> Option<String> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    let cookie_token = cookie_jar
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string());

    auth_header.or(cookie_token)
}

fn should_skip_auth(path: &str, skip_paths: &[String]) -> bool {
    skip_paths.iter().any(|skip_path| path == skip_path)
}

fn should_require_admin(path: &str, admin_paths: &[String]) -> bool {
    admin_paths.iter().any(|admin_path| {
        path == admin_path
            || path
                .strip_prefix(admin_path.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// CORS ミドルウェア設定
pub fn cors_layer(allowed_origins: &[String]) -> tower_http::cors::CorsLayer {
    // 解析できないオリジンは捨てる
    let origins: Vec<axum::http::HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<axum::http::HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    tower_http::cors::CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true) // Cookie送信を許可
        .max_age(std::time::Duration::from_secs(3600))
}

// --- Axum Extractors ---

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedEmployee
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedEmployee>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

impl<S> axum::extract::FromRequestParts<S> for AdminEmployee
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let employee = AuthenticatedEmployee::from_request_parts(parts, state).await?;
        employee.ensure_admin()?;
        Ok(AdminEmployee(employee))
    }
}
