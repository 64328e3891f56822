//! Store queries

use crate::domain::enums::{StoreCategory, StoreType};

/// 最近门店列表的默认条数
pub const DEFAULT_RECENT_LIMIT: u32 = 3;

/// 按编码获取门店
#[derive(Debug, Clone)]
pub struct GetStoreQuery {
    pub code: String,
}

/// 营业中门店列表，可按类型过滤
#[derive(Debug, Clone, Default)]
pub struct ListActiveStoresQuery {
    pub store_type: Option<StoreType>,
}

/// 按业态列出营业中门店
#[derive(Debug, Clone)]
pub struct ListActiveByCategoryQuery {
    pub category: StoreCategory,
}

/// 列出总部下营业中的加盟店
#[derive(Debug, Clone)]
pub struct ListFranchisesQuery {
    pub headquarter_code: String,
}

/// 最近创建的营业中门店
#[derive(Debug, Clone)]
pub struct ListRecentStoresQuery {
    pub limit: u32,
}

impl Default for ListRecentStoresQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RECENT_LIMIT,
        }
    }
}
