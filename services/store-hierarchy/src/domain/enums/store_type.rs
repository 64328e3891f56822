//! 门店类型枚举

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// 门店类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreType {
    /// 总部
    Headquarter,
    /// 加盟店
    #[default]
    Franchise,
}

impl StoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreType::Headquarter => "HEADQUARTER",
            StoreType::Franchise => "FRANCHISE",
        }
    }

    /// 显示名称
    pub fn label(&self) -> &'static str {
        match self {
            StoreType::Headquarter => "总部",
            StoreType::Franchise => "加盟店",
        }
    }
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HEADQUARTER" => Ok(StoreType::Headquarter),
            "FRANCHISE" => Ok(StoreType::Franchise),
            _ => Err(StoreError::invalid(format!("未知的门店类型: {}", s))),
        }
    }
}
