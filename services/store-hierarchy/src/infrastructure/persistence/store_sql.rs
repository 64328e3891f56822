//! 门店 SQL
//!
//! 连接池仓储与事务仓储共用，均以 `&mut PgConnection` 执行。

use sales_adapter_postgres::{map_sqlx_error, unique_violation_constraint};
use sales_domain_core::{AggregateRoot, Entity};
use sales_errors::AppError;
use sqlx::PgConnection;

use crate::domain::entities::Store;
use crate::domain::enums::{StoreCategory, StoreType};
use crate::domain::services::next_store_code;
use crate::domain::value_objects::{BusinessNumber, StoreCode, StoreId};
use crate::error::{ServiceResult, StoreError};

use super::converters::store_from_row;
use super::rows::StoreRow;

/// 门店编码唯一约束
pub const STORE_CODE_CONSTRAINT: &str = "uq_stores_store_code";
/// 营业执照号唯一约束
pub const BUSINESS_NUMBER_CONSTRAINT: &str = "uq_stores_business_number";
/// 编码序列行名
pub const STORE_CODE_SEQUENCE: &str = "store";

macro_rules! select_stores {
    ($tail:literal) => {
        concat!(
            r#"
            SELECT s.id, s.store_code, s.store_name, s.category, s.business_number,
                   s.open_date, s.close_date, s.closed, s.store_type, s.headquarter_id,
                   hq.store_code AS headquarter_code, hq.store_name AS headquarter_name,
                   s.created_at, s.created_by, s.created_by_name,
                   s.updated_at, s.updated_by, s.updated_by_name
            FROM stores s
            LEFT JOIN stores hq ON hq.id = s.headquarter_id
            "#,
            $tail
        )
    };
}

/// 营业中门店的过滤条件
#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveFilter {
    pub category: Option<StoreCategory>,
    pub store_type: Option<StoreType>,
    pub headquarter_id: Option<StoreId>,
}

fn to_stores(rows: Vec<StoreRow>) -> ServiceResult<Vec<Store>> {
    rows.into_iter().map(store_from_row).collect()
}

pub async fn find_by_code(conn: &mut PgConnection, code: &StoreCode) -> ServiceResult<Option<Store>> {
    let row = sqlx::query_as::<_, StoreRow>(select_stores!("WHERE s.store_code = $1"))
        .bind(code.to_string())
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

    row.map(store_from_row).transpose()
}

/// 行锁只加在门店本身，不锁关联的总部行
pub async fn find_by_code_for_update(
    conn: &mut PgConnection,
    code: &StoreCode,
) -> ServiceResult<Option<Store>> {
    let row = sqlx::query_as::<_, StoreRow>(select_stores!(
        "WHERE s.store_code = $1 FOR UPDATE OF s"
    ))
    .bind(code.to_string())
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    row.map(store_from_row).transpose()
}

pub async fn exists_by_business_number(
    conn: &mut PgConnection,
    number: &BusinessNumber,
    excluding: Option<&StoreId>,
) -> ServiceResult<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM stores
            WHERE business_number = $1
              AND ($2::uuid IS NULL OR id <> $2)
        )
        "#,
    )
    .bind(number.as_str())
    .bind(excluding.map(|id| id.0))
    .fetch_one(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    Ok(exists)
}

pub async fn find_active(conn: &mut PgConnection, filter: ActiveFilter) -> ServiceResult<Vec<Store>> {
    let rows = sqlx::query_as::<_, StoreRow>(select_stores!(
        r#"
        WHERE NOT s.closed
          AND ($1::varchar IS NULL OR s.category = $1)
          AND ($2::varchar IS NULL OR s.store_type = $2)
          AND ($3::uuid IS NULL OR s.headquarter_id = $3)
        ORDER BY s.store_code ASC
        "#
    ))
    .bind(filter.category.map(|c| c.as_str()))
    .bind(filter.store_type.map(|t| t.as_str()))
    .bind(filter.headquarter_id.map(|id| id.0))
    .fetch_all(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    to_stores(rows)
}

pub async fn exists_active_by_headquarter(
    conn: &mut PgConnection,
    headquarter_id: &StoreId,
) -> ServiceResult<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM stores WHERE headquarter_id = $1 AND NOT closed)",
    )
    .bind(headquarter_id.0)
    .fetch_one(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    Ok(exists)
}

pub async fn find_recent_active(conn: &mut PgConnection, limit: u32) -> ServiceResult<Vec<Store>> {
    let rows = sqlx::query_as::<_, StoreRow>(select_stores!(
        "WHERE NOT s.closed ORDER BY s.created_at DESC, s.store_code DESC LIMIT $1"
    ))
    .bind(i64::from(limit))
    .fetch_all(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    to_stores(rows)
}

/// 唯一约束冲突细化为领域错误
fn map_write_error(e: sqlx::Error, store: &Store) -> StoreError {
    match unique_violation_constraint(&e).as_deref() {
        Some(STORE_CODE_CONSTRAINT) => StoreError::CodeCollision(
            store
                .code()
                .map(ToString::to_string)
                .unwrap_or_default(),
        ),
        Some(BUSINESS_NUMBER_CONSTRAINT) => StoreError::duplicate(format!(
            "营业执照号 {} 已被注册",
            store.business_number()
        )),
        _ => map_sqlx_error(e).into(),
    }
}

pub async fn insert(conn: &mut PgConnection, store: &Store) -> ServiceResult<()> {
    let code = store.assigned_code()?;
    let audit = store.audit_info();

    sqlx::query(
        r#"
        INSERT INTO stores (
            id, store_code, store_name, category, business_number,
            open_date, close_date, closed, store_type, headquarter_id,
            created_at, created_by, created_by_name,
            updated_at, updated_by, updated_by_name
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        "#,
    )
    .bind(store.id().0)
    .bind(code.to_string())
    .bind(store.name())
    .bind(store.category().as_str())
    .bind(store.business_number().as_str())
    .bind(store.open_date())
    .bind(store.close_date())
    .bind(store.is_closed())
    .bind(store.store_type().as_str())
    .bind(store.headquarter().map(|hq| hq.id.0))
    .bind(audit.created_at)
    .bind(audit.created_by.id.0)
    .bind(&audit.created_by.name)
    .bind(audit.updated_at)
    .bind(audit.updated_by.id.0)
    .bind(&audit.updated_by.name)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_write_error(e, store))?;

    Ok(())
}

pub async fn update(conn: &mut PgConnection, store: &Store) -> ServiceResult<()> {
    let audit = store.audit_info();

    // 编码、类型和所属总部创建后不变，不参与更新
    let result = sqlx::query(
        r#"
        UPDATE stores
        SET store_name = $2, category = $3, business_number = $4, open_date = $5,
            close_date = $6, closed = $7,
            updated_at = $8, updated_by = $9, updated_by_name = $10
        WHERE id = $1
        "#,
    )
    .bind(store.id().0)
    .bind(store.name())
    .bind(store.category().as_str())
    .bind(store.business_number().as_str())
    .bind(store.open_date())
    .bind(store.close_date())
    .bind(store.is_closed())
    .bind(audit.updated_at)
    .bind(audit.updated_by.id.0)
    .bind(&audit.updated_by.name)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_write_error(e, store))?;

    if result.rows_affected() == 0 {
        return Err(StoreError::not_found(format!("门店 {} 不存在", store.id())));
    }
    Ok(())
}

/// 分配下一个编码
///
/// 锁住序列行直到事务结束；取序列记录与现有最大编码中的较大者，
/// 兼容序列表建立之前已存在的门店。
pub async fn allocate_code(conn: &mut PgConnection) -> ServiceResult<StoreCode> {
    let recorded: Option<String> = sqlx::query_scalar(
        "SELECT last_code FROM store_code_sequences WHERE name = $1 FOR UPDATE",
    )
    .bind(STORE_CODE_SEQUENCE)
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    let existing: Option<String> =
        sqlx::query_scalar("SELECT store_code FROM stores ORDER BY store_code DESC LIMIT 1")
            .fetch_optional(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;

    let mut current: Option<StoreCode> = None;
    for raw in recorded.iter().chain(existing.iter()) {
        let code = StoreCode::parse(raw).map_err(|e| {
            StoreError::Infrastructure(AppError::internal(format!(
                "编码序列数据损坏: {}",
                e
            )))
        })?;
        current = current.max(Some(code));
    }

    let next = next_store_code(current.as_ref())?;

    sqlx::query(
        r#"
        INSERT INTO store_code_sequences (name, last_code)
        VALUES ($1, $2)
        ON CONFLICT (name) DO UPDATE SET last_code = EXCLUDED.last_code
        "#,
    )
    .bind(STORE_CODE_SEQUENCE)
    .bind(next.to_string())
    .execute(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    Ok(next)
}
