// visibility-backend/src/db.rs
use crate::config::Config;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::time::Duration;

pub type DbPool = DatabaseConnection;

fn connect_options(config: &Config) -> ConnectOptions {
    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(50)
        .min_connections(2)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8 * 60))
        .sqlx_logging(config.is_development());
    opt
}

pub async fn create_db_pool(config: &Config) -> Result<DbPool, DbErr> {
    Database::connect(connect_options(config)).await
}

// スキーマを指定して接続する
pub async fn create_db_pool_with_schema(config: &Config, schema: &str) -> Result<DbPool, DbErr> {
    let mut opt = connect_options(config);
    opt.set_schema_search_path(schema.to_string());
    Database::connect(opt).await
}

// スキーマが存在するか確認する
pub async fn schema_exists(conn: &DbPool, schema: &str) -> Result<bool, DbErr> {
    let result = conn
        .query_one(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT EXISTS (SELECT 1 FROM information_schema.schemata WHERE schema_name = $1) AS exists",
            [schema.into()],
        ))
        .await?;

    match result {
        Some(row) => row.try_get("", "exists"),
        None => Ok(false),
    }
}

pub async fn create_schema(conn: &DbPool, schema: &str) -> Result<(), DbErr> {
    // 識別子はバインドできないので二重引用符をエスケープする
    let create_schema = format!(
        "CREATE SCHEMA IF NOT EXISTS \"{}\";",
        schema.replace('"', "\"\"")
    );
    conn.execute(Statement::from_string(
        sea_orm::DatabaseBackend::Postgres,
        create_schema,
    ))
    .await?;
    Ok(())
}

/// 設定に応じた接続プールを作成（DB_SCHEMA 指定時はスキーマを用意してから接続）
pub async fn connect(config: &Config) -> Result<DbPool, DbErr> {
    match &config.db_schema {
        Some(schema) => {
            let base_pool = create_db_pool(config).await?;
            if !schema_exists(&base_pool, schema).await? {
                tracing::info!(schema = %schema, "Schema does not exist, creating it");
                create_schema(&base_pool, schema).await?;
            }
            create_db_pool_with_schema(config, schema).await
        }
        None => create_db_pool(config).await,
    }
}
