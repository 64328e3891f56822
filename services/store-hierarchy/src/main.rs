//! Store Hierarchy Service - 门店层级服务入口
//!
//! 加载配置、初始化日志、建立连接池并应用迁移，随后组装业务处理器。

use std::sync::Arc;
use std::time::Duration;

use sales_adapter_postgres::{PostgresConfig, check_connection, create_pool};
use sales_common::{RetryConfig, is_transient_error, with_conditional_retry};
use sales_telemetry::HealthStatus;
use secrecy::ExposeSecret;
use tracing::{error, info};

use store_hierarchy::application::{ListActiveStoresQuery, ServiceHandler};
use store_hierarchy::config::StoreServiceConfig;
use store_hierarchy::infrastructure::persistence::{
    PostgresStoreRepository, PostgresUnitOfWorkFactory, run_migrations,
};

const CONFIG_DIR: &str = "config";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = StoreServiceConfig::load(CONFIG_DIR)?;
    sales_telemetry::init(&config.app.telemetry.log_level, config.app.json_logs())?;

    info!(
        app_name = %config.app.app_name,
        app_env = %config.app.app_env,
        "Starting store hierarchy service"
    );

    // 1. 连接池（仅对瞬时错误重试）
    let database = &config.app.database;
    let pg_config = PostgresConfig::new(database.url.expose_secret().as_str())
        .with_max_connections(database.max_connections)
        .with_connect_timeout(Duration::from_secs(database.connect_timeout_secs));
    let pool = with_conditional_retry(
        &RetryConfig::default(),
        "PostgreSQL connection",
        || create_pool(&pg_config),
        |e| is_transient_error(&e.to_string()),
    )
    .await?;

    // 2. 启动自检
    let mut health = HealthStatus::new();
    health.record("migrations", &run_migrations(&pool).await);
    health.record("postgres", &check_connection(&pool).await);
    if !health.healthy {
        error!(failed = ?health.failed(), "Startup checks failed");
        return Err(format!("startup checks failed: {:?}", health.failed()).into());
    }

    // 3. 组装处理器
    let handler = ServiceHandler::new(
        Arc::new(PostgresStoreRepository::new(pool.clone())),
        Arc::new(PostgresUnitOfWorkFactory::new(pool.clone())),
        config.allocation.retry_config(),
    );

    let active = handler.list_active(ListActiveStoresQuery::default()).await?;
    let headquarters = handler.list_active_headquarters().await?;
    info!(
        active_stores = active.len(),
        active_headquarters = headquarters.len(),
        "Store hierarchy service ready"
    );

    pool.close().await;
    Ok(())
}
