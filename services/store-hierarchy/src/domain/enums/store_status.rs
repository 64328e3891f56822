//! 门店营业状态

use chrono::NaiveDate;

/// 门店营业状态
///
/// 关闭是终态，关闭日期只存在于 `Closed` 中。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoreStatus {
    /// 营业中
    #[default]
    Open,
    /// 已关闭
    Closed { close_date: NaiveDate },
}

impl StoreStatus {
    /// 是否可以修改基本信息
    pub fn can_update(&self) -> bool {
        self.is_open()
    }

    /// 是否可以关闭
    pub fn can_close(&self) -> bool {
        self.is_open()
    }

    pub fn is_open(&self) -> bool {
        matches!(self, StoreStatus::Open)
    }

    pub fn is_closed(&self) -> bool {
        !self.is_open()
    }

    pub fn close_date(&self) -> Option<NaiveDate> {
        match self {
            StoreStatus::Open => None,
            StoreStatus::Closed { close_date } => Some(*close_date),
        }
    }
}
