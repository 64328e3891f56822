//! 营业执照号值对象

use thiserror::Error;

/// 各段数字长度，形如 `123-45-67890`
const GROUPS: [usize; 3] = [3, 2, 5];

/// 营业执照号错误
#[derive(Debug, Error)]
pub enum BusinessNumberError {
    #[error("营业执照号不能为空")]
    Empty,
    #[error("营业执照号格式应为 NNN-NN-NNNNN: {0}")]
    InvalidFormat(String),
}

/// 营业执照号值对象
///
/// 业务规则:
/// - 不能为空
/// - 三段数字，以连字符分隔，长度依次为 3、2、5
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BusinessNumber(String);

impl BusinessNumber {
    pub fn new(number: impl Into<String>) -> Result<Self, BusinessNumberError> {
        let number = number.into().trim().to_string();

        if number.is_empty() {
            return Err(BusinessNumberError::Empty);
        }

        let groups: Vec<&str> = number.split('-').collect();
        let well_formed = groups.len() == GROUPS.len()
            && groups
                .iter()
                .zip(GROUPS)
                .all(|(group, len)| group.len() == len && group.bytes().all(|b| b.is_ascii_digit()));
        if !well_formed {
            return Err(BusinessNumberError::InvalidFormat(number));
        }

        Ok(Self(number))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BusinessNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_business_number() {
        let number = BusinessNumber::new(" 123-45-67890 ").unwrap();
        assert_eq!(number.as_str(), "123-45-67890");
    }

    #[test]
    fn test_empty_number() {
        assert!(matches!(
            BusinessNumber::new("   "),
            Err(BusinessNumberError::Empty)
        ));
    }

    #[test]
    fn test_invalid_formats() {
        for bad in ["1234567890", "123-456-7890", "12-345-67890", "123-45-6789a", "123-45-67890-1"] {
            assert!(
                matches!(BusinessNumber::new(bad), Err(BusinessNumberError::InvalidFormat(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
