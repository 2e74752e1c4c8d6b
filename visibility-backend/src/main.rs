// src/main.rs
use migration::Migrator;
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use visibility_backend::api::{build_app_router, AppState};
use visibility_backend::config::Config;
use visibility_backend::db;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // トレーシングの設定
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "visibility_backend=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting Visibility Backend server...");

    // 設定を読み込む
    let app_config = Config::from_env()?;
    tracing::info!(
        environment = %app_config.environment,
        addr = %app_config.server_addr(),
        schema = ?app_config.db_schema,
        "Configuration loaded"
    );

    // データベース接続を作成（DB_SCHEMA 指定時はスキーマも用意する）
    let db_pool = db::connect(&app_config).await?;
    tracing::info!("Database pool created successfully.");

    Migrator::up(&db_pool, None).await?;
    tracing::info!("Migrations applied.");

    let app_state = AppState::new(db_pool, &app_config)?;
    let app_router = build_app_router(app_state);

    // サーバーの起動
    let server_addr = app_config.server_addr();
    tracing::info!("Router configured. Server listening on {}", server_addr);

    let listener = TcpListener::bind(&server_addr).await?;
    axum::serve(listener, app_router.into_make_service()).await?;

    Ok(())
}
