//! 门店输出视图

use chrono::NaiveDate;
use sales_domain_core::AggregateRoot;
use serde::Serialize;

use crate::domain::entities::Store;
use crate::domain::enums::{StoreCategory, StoreType};
use crate::error::StoreError;

/// 门店视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreView {
    pub store_code: String,
    pub store_name: String,
    pub category: StoreCategory,
    pub business_number: String,
    pub open_date: NaiveDate,
    pub close_date: Option<NaiveDate>,
    pub closed: bool,
    pub store_type: StoreType,
    /// 仅加盟店
    pub headquarter_code: Option<String>,
    /// 仅加盟店
    pub headquarter_name: Option<String>,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
    pub created_by: String,
    pub updated_by: String,
}

impl TryFrom<&Store> for StoreView {
    type Error = StoreError;

    fn try_from(store: &Store) -> Result<Self, Self::Error> {
        let audit = store.audit_info();
        let headquarter = store.headquarter();

        Ok(Self {
            store_code: store.assigned_code()?.to_string(),
            store_name: store.name().to_string(),
            category: store.category(),
            business_number: store.business_number().to_string(),
            open_date: store.open_date(),
            close_date: store.close_date(),
            closed: store.is_closed(),
            store_type: store.store_type(),
            headquarter_code: headquarter.map(|hq| hq.code.to_string()),
            headquarter_name: headquarter.map(|hq| hq.name.clone()),
            created_at: audit.created_at.date_naive(),
            updated_at: audit.updated_at.date_naive(),
            created_by: audit.created_by.name.clone(),
            updated_by: audit.updated_by.name.clone(),
        })
    }
}

/// 批量转换
pub fn to_views(stores: &[Store]) -> Result<Vec<StoreView>, StoreError> {
    stores.iter().map(StoreView::try_from).collect()
}
