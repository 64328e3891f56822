//! 门店业态枚举

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// 门店业态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreCategory {
    /// 餐厅
    Restaurant,
    /// 咖啡店
    Cafe,
    /// 零售
    Retail,
    /// 服装
    Fashion,
    /// 美容
    Beauty,
    /// 食品杂货
    Grocery,
    /// 其他
    Other,
}

impl StoreCategory {
    pub const ALL: [StoreCategory; 7] = [
        StoreCategory::Restaurant,
        StoreCategory::Cafe,
        StoreCategory::Retail,
        StoreCategory::Fashion,
        StoreCategory::Beauty,
        StoreCategory::Grocery,
        StoreCategory::Other,
    ];

    /// 存储与接口中使用的名称
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreCategory::Restaurant => "RESTAURANT",
            StoreCategory::Cafe => "CAFE",
            StoreCategory::Retail => "RETAIL",
            StoreCategory::Fashion => "FASHION",
            StoreCategory::Beauty => "BEAUTY",
            StoreCategory::Grocery => "GROCERY",
            StoreCategory::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for StoreCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreCategory {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == upper)
            .ok_or_else(|| StoreError::invalid(format!("未知的门店业态: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for category in StoreCategory::ALL {
            assert_eq!(category.as_str().parse::<StoreCategory>().unwrap(), category);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("cafe".parse::<StoreCategory>().unwrap(), StoreCategory::Cafe);
    }

    #[test]
    fn test_unknown_category() {
        assert!(matches!(
            "BAKERY".parse::<StoreCategory>(),
            Err(StoreError::InvalidValue(_))
        ));
    }
}
