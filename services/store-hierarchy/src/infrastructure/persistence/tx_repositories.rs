//! 事务感知的仓储实现
//!
//! 与工作单元共享同一个 Transaction，而非 PgPool。

use async_trait::async_trait;
use sales_errors::AppError;
use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entities::Store;
use crate::domain::enums::{StoreCategory, StoreType};
use crate::domain::repositories::StoreRepository;
use crate::domain::services::StoreCodeAllocator;
use crate::domain::value_objects::{BusinessNumber, StoreCode, StoreId};
use crate::error::ServiceResult;

use super::store_sql::{self, ActiveFilter};

/// 共享事务类型
pub(crate) type SharedTx = Arc<Mutex<Option<Transaction<'static, Postgres>>>>;

/// 宏：定义一个持有共享事务的结构体
macro_rules! define_tx_repo {
    ($name:ident) => {
        pub struct $name {
            tx: SharedTx,
        }

        impl $name {
            pub fn new(tx: SharedTx) -> Self {
                Self { tx }
            }
        }
    };
}

/// 锁住共享事务并在其上执行 SQL
macro_rules! with_tx {
    ($self:ident, $conn:ident => $body:expr) => {{
        let mut guard = $self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;
        let $conn = &mut **tx;
        $body.await
    }};
}

define_tx_repo!(TxStoreRepository);
define_tx_repo!(TxStoreCodeAllocator);

// =============================================================================
// StoreRepository 实现
// =============================================================================

#[async_trait]
impl StoreRepository for TxStoreRepository {
    async fn find_by_code(&self, code: &StoreCode) -> ServiceResult<Option<Store>> {
        with_tx!(self, conn => store_sql::find_by_code(conn, code))
    }

    async fn find_by_code_for_update(&self, code: &StoreCode) -> ServiceResult<Option<Store>> {
        with_tx!(self, conn => store_sql::find_by_code_for_update(conn, code))
    }

    async fn exists_by_business_number(&self, number: &BusinessNumber) -> ServiceResult<bool> {
        with_tx!(self, conn => store_sql::exists_by_business_number(conn, number, None))
    }

    async fn exists_by_business_number_excluding_id(
        &self,
        number: &BusinessNumber,
        id: &StoreId,
    ) -> ServiceResult<bool> {
        with_tx!(self, conn => store_sql::exists_by_business_number(conn, number, Some(id)))
    }

    async fn find_all_active(&self) -> ServiceResult<Vec<Store>> {
        with_tx!(self, conn => store_sql::find_active(conn, ActiveFilter::default()))
    }

    async fn find_active_by_category(&self, category: StoreCategory) -> ServiceResult<Vec<Store>> {
        let filter = ActiveFilter {
            category: Some(category),
            ..Default::default()
        };
        with_tx!(self, conn => store_sql::find_active(conn, filter))
    }

    async fn find_active_by_type(&self, store_type: StoreType) -> ServiceResult<Vec<Store>> {
        let filter = ActiveFilter {
            store_type: Some(store_type),
            ..Default::default()
        };
        with_tx!(self, conn => store_sql::find_active(conn, filter))
    }

    async fn find_active_by_headquarter(
        &self,
        headquarter_id: &StoreId,
    ) -> ServiceResult<Vec<Store>> {
        let filter = ActiveFilter {
            headquarter_id: Some(*headquarter_id),
            ..Default::default()
        };
        with_tx!(self, conn => store_sql::find_active(conn, filter))
    }

    async fn exists_active_by_headquarter(&self, headquarter_id: &StoreId) -> ServiceResult<bool> {
        with_tx!(self, conn => store_sql::exists_active_by_headquarter(conn, headquarter_id))
    }

    async fn find_recent_active(&self, limit: u32) -> ServiceResult<Vec<Store>> {
        with_tx!(self, conn => store_sql::find_recent_active(conn, limit))
    }

    async fn save(&self, store: &Store) -> ServiceResult<()> {
        with_tx!(self, conn => store_sql::insert(conn, store))
    }

    async fn update(&self, store: &Store) -> ServiceResult<()> {
        with_tx!(self, conn => store_sql::update(conn, store))
    }
}

// =============================================================================
// StoreCodeAllocator 实现
// =============================================================================

#[async_trait]
impl StoreCodeAllocator for TxStoreCodeAllocator {
    /// 序列行锁随事务提交或回滚释放
    async fn allocate(&self) -> ServiceResult<StoreCode> {
        with_tx!(self, conn => store_sql::allocate_code(conn))
    }
}
