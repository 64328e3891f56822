//! PostgreSQL Unit of Work 实现
//!
//! 使用 SQLx Transaction 提供事务协调能力。

use async_trait::async_trait;
use sales_errors::AppError;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::repositories::StoreRepository;
use crate::domain::services::StoreCodeAllocator;
use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use crate::error::ServiceResult;

use super::tx_repositories::{SharedTx, TxStoreCodeAllocator, TxStoreRepository};

/// PostgreSQL Unit of Work 工厂
pub struct PostgresUnitOfWorkFactory {
    pool: PgPool,
}

impl PostgresUnitOfWorkFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWorkFactory for PostgresUnitOfWorkFactory {
    async fn begin(&self) -> ServiceResult<Box<dyn UnitOfWork>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))?;

        Ok(Box::new(PostgresUnitOfWork::new(Arc::new(Mutex::new(Some(tx))))))
    }
}

/// PostgreSQL Unit of Work 实现
///
/// 门店仓储与编码分配器共享同一个事务。
pub struct PostgresUnitOfWork {
    tx: SharedTx,
    store_repo: TxStoreRepository,
    code_allocator: TxStoreCodeAllocator,
}

impl PostgresUnitOfWork {
    fn new(tx: SharedTx) -> Self {
        Self {
            store_repo: TxStoreRepository::new(tx.clone()),
            code_allocator: TxStoreCodeAllocator::new(tx.clone()),
            tx,
        }
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    fn stores(&self) -> &dyn StoreRepository {
        &self.store_repo
    }

    fn codes(&self) -> &dyn StoreCodeAllocator {
        &self.code_allocator
    }

    async fn commit(self: Box<Self>) -> ServiceResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed"))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {}", e)))?;

        Ok(())
    }

    async fn rollback(self: Box<Self>) -> ServiceResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed"))?;

        tx.rollback()
            .await
            .map_err(|e| AppError::database(format!("Failed to rollback transaction: {}", e)))?;

        Ok(())
    }
}
