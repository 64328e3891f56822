//! PostgreSQL 门店仓储（连接池）
//!
//! 只读查询走这里；写操作经由工作单元在事务内完成。

use async_trait::async_trait;
use sales_adapter_postgres::map_sqlx_error;
use sqlx::PgPool;

use crate::domain::entities::Store;
use crate::domain::enums::{StoreCategory, StoreType};
use crate::domain::repositories::StoreRepository;
use crate::domain::value_objects::{BusinessNumber, StoreCode, StoreId};
use crate::error::ServiceResult;

use super::store_sql::{self, ActiveFilter};

/// 从连接池取一个连接执行 SQL
macro_rules! with_conn {
    ($self:ident, $conn:ident => $body:expr) => {{
        let mut pooled = $self.pool.acquire().await.map_err(map_sqlx_error)?;
        let $conn = &mut *pooled;
        $body.await
    }};
}

pub struct PostgresStoreRepository {
    pool: PgPool,
}

impl PostgresStoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreRepository for PostgresStoreRepository {
    async fn find_by_code(&self, code: &StoreCode) -> ServiceResult<Option<Store>> {
        with_conn!(self, conn => store_sql::find_by_code(conn, code))
    }

    async fn find_by_code_for_update(&self, code: &StoreCode) -> ServiceResult<Option<Store>> {
        // 自动提交模式下行锁随语句释放，直接按普通查询处理
        self.find_by_code(code).await
    }

    async fn exists_by_business_number(&self, number: &BusinessNumber) -> ServiceResult<bool> {
        with_conn!(self, conn => store_sql::exists_by_business_number(conn, number, None))
    }

    async fn exists_by_business_number_excluding_id(
        &self,
        number: &BusinessNumber,
        id: &StoreId,
    ) -> ServiceResult<bool> {
        with_conn!(self, conn => store_sql::exists_by_business_number(conn, number, Some(id)))
    }

    async fn find_all_active(&self) -> ServiceResult<Vec<Store>> {
        with_conn!(self, conn => store_sql::find_active(conn, ActiveFilter::default()))
    }

    async fn find_active_by_category(&self, category: StoreCategory) -> ServiceResult<Vec<Store>> {
        let filter = ActiveFilter {
            category: Some(category),
            ..Default::default()
        };
        with_conn!(self, conn => store_sql::find_active(conn, filter))
    }

    async fn find_active_by_type(&self, store_type: StoreType) -> ServiceResult<Vec<Store>> {
        let filter = ActiveFilter {
            store_type: Some(store_type),
            ..Default::default()
        };
        with_conn!(self, conn => store_sql::find_active(conn, filter))
    }

    async fn find_active_by_headquarter(
        &self,
        headquarter_id: &StoreId,
    ) -> ServiceResult<Vec<Store>> {
        let filter = ActiveFilter {
            headquarter_id: Some(*headquarter_id),
            ..Default::default()
        };
        with_conn!(self, conn => store_sql::find_active(conn, filter))
    }

    async fn exists_active_by_headquarter(&self, headquarter_id: &StoreId) -> ServiceResult<bool> {
        with_conn!(self, conn => store_sql::exists_active_by_headquarter(conn, headquarter_id))
    }

    async fn find_recent_active(&self, limit: u32) -> ServiceResult<Vec<Store>> {
        with_conn!(self, conn => store_sql::find_recent_active(conn, limit))
    }

    async fn save(&self, store: &Store) -> ServiceResult<()> {
        with_conn!(self, conn => store_sql::insert(conn, store))
    }

    async fn update(&self, store: &Store) -> ServiceResult<()> {
        with_conn!(self, conn => store_sql::update(conn, store))
    }
}
