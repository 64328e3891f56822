//! 门店编码值对象

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 编码数字部分上限
const MAX_NUMBER: u16 = 999;

/// 门店编码错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreCodeError {
    #[error("门店编码格式应为 LL-NNN: {0}")]
    Malformed(String),
    #[error("门店编码 {0} 之后已无可用编码")]
    Exhausted(String),
}

/// 门店编码值对象
///
/// 格式 `LL-NNN`：两位大写字母、连字符、三位数字，例如 `AB-042`。
/// 字段顺序决定了 `Ord` 与字符串字典序一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StoreCode {
    prefix: [u8; 2],
    number: u16,
}

impl StoreCode {
    /// 尚无任何门店时的起点，本身从不分配
    pub const SEED: StoreCode = StoreCode {
        prefix: *b"AA",
        number: 0,
    };

    /// 解析编码，输入会先去除空白并转为大写
    pub fn parse(code: &str) -> Result<Self, StoreCodeError> {
        let normalized = code.trim().to_ascii_uppercase();
        let bytes = normalized.as_bytes();

        let well_formed = bytes.len() == 6
            && bytes[..2].iter().all(u8::is_ascii_uppercase)
            && bytes[2] == b'-'
            && bytes[3..].iter().all(u8::is_ascii_digit);
        if !well_formed {
            return Err(StoreCodeError::Malformed(code.to_string()));
        }

        let number = bytes[3..]
            .iter()
            .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'));

        Ok(Self {
            prefix: [bytes[0], bytes[1]],
            number,
        })
    }

    /// 后继编码
    ///
    /// 数字部分未满 999 时加一；否则数字归零，字母部分按 26 进制进位（Z 回到 A）。
    /// `ZZ-999` 没有后继。
    pub fn next(&self) -> Result<Self, StoreCodeError> {
        if self.number < MAX_NUMBER {
            return Ok(Self {
                prefix: self.prefix,
                number: self.number + 1,
            });
        }

        let [first, second] = self.prefix;
        let prefix = if second < b'Z' {
            [first, second + 1]
        } else if first < b'Z' {
            [first + 1, b'A']
        } else {
            return Err(StoreCodeError::Exhausted(self.to_string()));
        };

        Ok(Self { prefix, number: 0 })
    }

    /// 字母部分
    pub fn prefix(&self) -> String {
        self.prefix.iter().map(|b| char::from(*b)).collect()
    }

    /// 数字部分
    pub fn number(&self) -> u16 {
        self.number
    }
}

impl fmt::Display for StoreCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}-{:03}",
            char::from(self.prefix[0]),
            char::from(self.prefix[1]),
            self.number
        )
    }
}

impl FromStr for StoreCode {
    type Err = StoreCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StoreCode {
    type Error = StoreCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StoreCode> for String {
    fn from(code: StoreCode) -> Self {
        code.to_string()
    }
}
