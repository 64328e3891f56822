//! Store commands

use chrono::NaiveDate;
use sales_common::Actor;

use crate::domain::enums::{StoreCategory, StoreType};
use crate::error::{ServiceResult, StoreError};

/// 创建门店命令
#[derive(Debug, Clone)]
pub struct CreateStoreCommand {
    pub name: String,
    pub category: StoreCategory,
    pub business_number: String,
    pub open_date: NaiveDate,
    pub store_type: StoreType,
    /// 仅加盟店需要；总部忽略此字段
    pub headquarter_code: Option<String>,
    pub actor: Actor,
}

impl CreateStoreCommand {
    pub fn validate(&self) -> ServiceResult<()> {
        validate_actor(&self.actor)
    }
}

/// 修改门店信息命令
#[derive(Debug, Clone)]
pub struct UpdateStoreCommand {
    pub code: String,
    pub name: String,
    pub category: StoreCategory,
    pub business_number: String,
    pub open_date: NaiveDate,
    pub actor: Actor,
}

impl UpdateStoreCommand {
    pub fn validate(&self) -> ServiceResult<()> {
        validate_actor(&self.actor)
    }
}

/// 关闭门店命令
#[derive(Debug, Clone)]
pub struct CloseStoreCommand {
    pub code: String,
    pub close_date: NaiveDate,
    pub actor: Actor,
}

impl CloseStoreCommand {
    pub fn validate(&self) -> ServiceResult<()> {
        validate_actor(&self.actor)
    }
}

fn validate_actor(actor: &Actor) -> ServiceResult<()> {
    if actor.name.trim().is_empty() {
        return Err(StoreError::invalid("操作人名称不能为空"));
    }
    Ok(())
}
