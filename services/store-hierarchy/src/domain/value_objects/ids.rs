//! 强类型 ID 定义

use derive_more::{Display, From};
use std::str::FromStr;
use uuid::Uuid;

/// 门店 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From)]
#[display("{_0}")]
pub struct StoreId(pub Uuid);

impl StoreId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for StoreId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for StoreId {
    fn default() -> Self {
        Self::new()
    }
}
