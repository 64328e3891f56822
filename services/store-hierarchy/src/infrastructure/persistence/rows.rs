//! 数据库行映射结构

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// 门店数据库行（附带所属总部的编码和名称）
#[derive(Debug, Clone, FromRow)]
pub struct StoreRow {
    pub id: Uuid,
    pub store_code: String,
    pub store_name: String,
    pub category: String,
    pub business_number: String,
    pub open_date: NaiveDate,
    pub close_date: Option<NaiveDate>,
    pub closed: bool,
    pub store_type: String,
    pub headquarter_id: Option<Uuid>,
    pub headquarter_code: Option<String>,
    pub headquarter_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub created_by_name: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Uuid,
    pub updated_by_name: String,
}
