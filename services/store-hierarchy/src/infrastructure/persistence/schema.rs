//! 门店表结构迁移

use sales_adapter_postgres::{Migration, MigrationManager, MigrationResult};
use sales_errors::AppResult;
use sqlx::PgPool;
use tracing::info;

/// 本服务的迁移记录表
pub const MIGRATION_TABLE: &str = "_store_hierarchy_migrations";

const CREATE_STORES: &str = r#"
CREATE TABLE IF NOT EXISTS stores (
    id UUID PRIMARY KEY,
    store_code VARCHAR(6) NOT NULL,
    store_name VARCHAR(100) NOT NULL,
    category VARCHAR(20) NOT NULL,
    business_number VARCHAR(12) NOT NULL,
    open_date DATE NOT NULL,
    close_date DATE,
    closed BOOLEAN NOT NULL DEFAULT FALSE,
    store_type VARCHAR(20) NOT NULL DEFAULT 'FRANCHISE',
    headquarter_id UUID REFERENCES stores (id),
    created_at TIMESTAMPTZ NOT NULL,
    created_by UUID NOT NULL,
    created_by_name VARCHAR(100) NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL,
    updated_by UUID NOT NULL,
    updated_by_name VARCHAR(100) NOT NULL,
    CONSTRAINT uq_stores_store_code UNIQUE (store_code),
    CONSTRAINT uq_stores_business_number UNIQUE (business_number),
    CONSTRAINT ck_stores_store_code CHECK (store_code ~ '^[A-Z]{2}-[0-9]{3}$'),
    CONSTRAINT ck_stores_business_number CHECK (business_number ~ '^[0-9]{3}-[0-9]{2}-[0-9]{5}$'),
    CONSTRAINT ck_stores_hierarchy CHECK (
        (store_type = 'HEADQUARTER' AND headquarter_id IS NULL)
        OR (store_type = 'FRANCHISE' AND headquarter_id IS NOT NULL)
    ),
    CONSTRAINT ck_stores_closed CHECK (closed = (close_date IS NOT NULL))
);

CREATE INDEX IF NOT EXISTS idx_stores_active_category ON stores (category) WHERE NOT closed;
CREATE INDEX IF NOT EXISTS idx_stores_active_headquarter ON stores (headquarter_id) WHERE NOT closed;
CREATE INDEX IF NOT EXISTS idx_stores_created_at ON stores (created_at DESC);
"#;

const CREATE_STORE_CODE_SEQUENCES: &str = r#"
CREATE TABLE IF NOT EXISTS store_code_sequences (
    name VARCHAR(32) PRIMARY KEY,
    last_code VARCHAR(6) NOT NULL
);

INSERT INTO store_code_sequences (name, last_code)
SELECT 'store', COALESCE(MAX(store_code), 'AA-000') FROM stores
ON CONFLICT (name) DO NOTHING;
"#;

/// 全部迁移，按版本排列
pub fn migrations() -> Vec<Migration> {
    vec![
        Migration::new(1, "create_stores", CREATE_STORES),
        Migration::new(2, "create_store_code_sequences", CREATE_STORE_CODE_SEQUENCES),
    ]
}

/// 应用待执行的迁移，任一失败即返回错误
pub async fn run_migrations(pool: &PgPool) -> AppResult<MigrationResult> {
    let result = MigrationManager::new(pool.clone())
        .with_table_name(MIGRATION_TABLE)
        .migrate(&migrations())
        .await?
        .into_result()?;

    info!(
        applied = result.applied_count(),
        skipped = result.skipped.len(),
        "Store schema up to date"
    );
    Ok(result)
}
