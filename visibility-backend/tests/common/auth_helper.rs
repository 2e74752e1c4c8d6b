// tests/common/auth_helper.rs

use axum::{
    body::{self, Body},
    http::{header, Request},
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use visibility_backend::config::AppConfig;
use visibility_backend::utils::jwt::AccessTokenClaims;

/// 認証基盤が発行するのと同じ形のアクセストークンを作る
pub fn issue_token(employee_id: &str, account_id: i64, role: Option<&str>) -> String {
    let config = AppConfig::for_testing();
    let now = Utc::now().timestamp();
    let claims = AccessTokenClaims {
        sub: employee_id.to_string(),
        account_id,
        role: role.map(str::to_string),
        iat: now,
        exp: now + 900,
        nbf: now - 5,
        iss: config.jwt.issuer.clone(),
        aud: config.jwt.audience.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt.secret.as_bytes()),
    )
    .unwrap()
}

pub fn employee_token(employee: (&str, i64)) -> String {
    issue_token(employee.0, employee.1, Some("EMPLOYEE"))
}

pub fn admin_token(employee: (&str, i64)) -> String {
    issue_token(employee.0, employee.1, Some("ADMIN"))
}

/// 認証付きリクエストを作成
pub fn create_authenticated_request(
    method: &str,
    uri: &str,
    token: &str,
    body: Option<String>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json");

    match body {
        Some(json) => builder.body(Body::from(json)).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// レスポンスボディを JSON として読む
pub async fn body_json(response: Response) -> Value {
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// `data.visible_ids` を文字列の配列として取り出す
pub fn visible_ids(json: &Value) -> Vec<String> {
    json["data"]["visible_ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}
