//! Unit of Work 模式
//!
//! 一次写操作内的所有仓储调用和编码分配共享同一个事务。

use async_trait::async_trait;

use crate::domain::repositories::StoreRepository;
use crate::domain::services::StoreCodeAllocator;
use crate::error::ServiceResult;

/// Unit of Work trait
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// 事务内的门店仓储
    fn stores(&self) -> &dyn StoreRepository;

    /// 事务内的编码分配器
    fn codes(&self) -> &dyn StoreCodeAllocator;

    /// 提交事务
    async fn commit(self: Box<Self>) -> ServiceResult<()>;

    /// 回滚事务
    async fn rollback(self: Box<Self>) -> ServiceResult<()>;
}

/// Unit of Work 工厂 trait
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    /// 开始新的事务
    async fn begin(&self) -> ServiceResult<Box<dyn UnitOfWork>>;
}
