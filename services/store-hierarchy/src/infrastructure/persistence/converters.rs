//! 数据库行到领域对象的转换

use sales_common::{Actor, AuditInfo, UserId};
use sales_errors::AppError;

use crate::domain::entities::{HeadquarterRef, Store, StoreKind};
use crate::domain::enums::{StoreCategory, StoreStatus, StoreType};
use crate::domain::value_objects::{BusinessNumber, StoreCode, StoreId};
use crate::error::{ServiceResult, StoreError};

use super::rows::StoreRow;

fn corrupt(row: &StoreRow, what: impl std::fmt::Display) -> StoreError {
    StoreError::Infrastructure(AppError::internal(format!(
        "门店数据损坏 (id={}): {}",
        row.id, what
    )))
}

/// 将 StoreRow 转换为 Store
pub fn store_from_row(row: StoreRow) -> ServiceResult<Store> {
    let code = StoreCode::parse(&row.store_code).map_err(|e| corrupt(&row, e))?;
    let category: StoreCategory = row.category.parse().map_err(|e| corrupt(&row, e))?;
    let store_type: StoreType = row.store_type.parse().map_err(|e| corrupt(&row, e))?;
    let business_number =
        BusinessNumber::new(row.business_number.as_str()).map_err(|e| corrupt(&row, e))?;

    let status = match (row.closed, row.close_date) {
        (false, None) => StoreStatus::Open,
        (true, Some(close_date)) => StoreStatus::Closed { close_date },
        (closed, close_date) => {
            return Err(corrupt(
                &row,
                format!("closed={} close_date={:?}", closed, close_date),
            ));
        }
    };

    let kind = match store_type {
        StoreType::Headquarter if row.headquarter_id.is_none() => StoreKind::Headquarter,
        StoreType::Franchise => match (
            row.headquarter_id,
            row.headquarter_code.as_deref(),
            row.headquarter_name.as_ref(),
        ) {
            (Some(id), Some(hq_code), Some(hq_name)) => StoreKind::Franchise {
                headquarter: HeadquarterRef {
                    id: StoreId::from_uuid(id),
                    code: StoreCode::parse(hq_code).map_err(|e| corrupt(&row, e))?,
                    name: hq_name.clone(),
                },
            },
            _ => return Err(corrupt(&row, "加盟店缺少所属总部")),
        },
        StoreType::Headquarter => return Err(corrupt(&row, "总部不应引用其他门店")),
    };

    let audit_info = AuditInfo {
        created_at: row.created_at,
        created_by: Actor::new(UserId::from_uuid(row.created_by), row.created_by_name.clone()),
        updated_at: row.updated_at,
        updated_by: Actor::new(UserId::from_uuid(row.updated_by), row.updated_by_name.clone()),
    };

    Ok(Store::from_parts(
        StoreId::from_uuid(row.id),
        code,
        row.store_name,
        category,
        business_number,
        row.open_date,
        status,
        kind,
        audit_info,
    ))
}
