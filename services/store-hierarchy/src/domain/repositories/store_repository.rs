//! 门店仓储接口

use async_trait::async_trait;

use crate::domain::entities::Store;
use crate::domain::enums::{StoreCategory, StoreType};
use crate::domain::value_objects::{BusinessNumber, StoreCode, StoreId};
use crate::error::ServiceResult;

/// 门店仓储接口
///
/// 列表查询只返回营业中的门店，按门店编码升序。
#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// 根据编码查找门店
    async fn find_by_code(&self, code: &StoreCode) -> ServiceResult<Option<Store>>;

    /// 根据编码查找门店并锁定该行直至事务结束
    ///
    /// 写操作校验的门店（被修改、被关闭的门店以及新加盟店的总部）都经由这里读取，
    /// 并发的写操作因此按门店串行。事务之外与 `find_by_code` 相同。
    async fn find_by_code_for_update(&self, code: &StoreCode) -> ServiceResult<Option<Store>>;

    /// 营业执照号是否已被任何门店使用
    async fn exists_by_business_number(&self, number: &BusinessNumber) -> ServiceResult<bool>;

    /// 营业执照号是否已被指定门店以外的门店使用
    async fn exists_by_business_number_excluding_id(
        &self,
        number: &BusinessNumber,
        id: &StoreId,
    ) -> ServiceResult<bool>;

    /// 所有营业中的门店
    async fn find_all_active(&self) -> ServiceResult<Vec<Store>>;

    /// 指定业态的营业中门店
    async fn find_active_by_category(&self, category: StoreCategory) -> ServiceResult<Vec<Store>>;

    /// 指定类型的营业中门店
    async fn find_active_by_type(&self, store_type: StoreType) -> ServiceResult<Vec<Store>>;

    /// 指定总部下营业中的加盟店
    async fn find_active_by_headquarter(&self, headquarter_id: &StoreId)
    -> ServiceResult<Vec<Store>>;

    /// 指定总部下是否还有营业中的加盟店
    async fn exists_active_by_headquarter(&self, headquarter_id: &StoreId) -> ServiceResult<bool>;

    /// 最近创建的营业中门店，新的在前
    async fn find_recent_active(&self, limit: u32) -> ServiceResult<Vec<Store>>;

    /// 保存门店（新建）
    async fn save(&self, store: &Store) -> ServiceResult<()>;

    /// 更新门店
    async fn update(&self, store: &Store) -> ServiceResult<()>;
}
