//! 门店编码分配

use async_trait::async_trait;

use crate::domain::value_objects::StoreCode;
use crate::error::ServiceResult;

/// 门店编码分配器
///
/// 实现必须保证在所属工作单元提交或回滚之前，其他分配者拿不到同一个编码。
#[async_trait]
pub trait StoreCodeAllocator: Send + Sync {
    /// 分配下一个门店编码
    async fn allocate(&self) -> ServiceResult<StoreCode>;
}

/// 根据当前最大编码计算下一个编码；尚无门店时从 `AA-000` 之后开始
pub fn next_store_code(current_max: Option<&StoreCode>) -> ServiceResult<StoreCode> {
    let current = current_max.copied().unwrap_or(StoreCode::SEED);
    Ok(current.next()?)
}
