//! 门店服务错误类型

use sales_errors::AppError;
use thiserror::Error;

use crate::domain::value_objects::StoreCodeError;

/// 门店服务错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 营业执照号等唯一属性已被占用
    #[error("Duplicate entity: {0}")]
    DuplicateEntity(String),

    /// 按编码查找门店或总部失败
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// 业务规则拒绝
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// 总部/加盟店结构不一致
    #[error("Structural invariant violated: {0}")]
    InvariantViolation(String),

    /// 编码空间耗尽（ZZ-999 之后）
    #[error("Store code space exhausted after {0}")]
    CodeExhausted(String),

    /// 并发分配导致编码冲突，可整体重试
    #[error("Store code collision: {0}")]
    CodeCollision(String),

    #[error(transparent)]
    Infrastructure(#[from] AppError),
}

impl StoreError {
    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::DuplicateEntity(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::EntityNotFound(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// 只有编码冲突值得重新执行整个工作单元
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CodeCollision(_))
    }
}

impl From<StoreCodeError> for StoreError {
    fn from(error: StoreCodeError) -> Self {
        match error {
            StoreCodeError::Exhausted(last) => Self::CodeExhausted(last),
            StoreCodeError::Malformed(_) => Self::InvalidValue(error.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::DuplicateEntity(msg) => AppError::conflict(msg),
            StoreError::EntityNotFound(msg) => AppError::not_found(msg),
            StoreError::InvalidValue(msg) => AppError::validation(msg),
            StoreError::InvariantViolation(msg) => AppError::failed_precondition(msg),
            StoreError::CodeExhausted(last) => {
                AppError::resource_exhausted(format!("门店编码已耗尽: {}", last))
            }
            StoreError::CodeCollision(msg) => AppError::conflict(msg),
            StoreError::Infrastructure(e) => e,
        }
    }
}

pub type ServiceResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_collision_is_retryable() {
        assert!(StoreError::CodeCollision("AA-002".into()).is_retryable());
        assert!(!StoreError::duplicate("123-45-67890").is_retryable());
        assert!(!StoreError::CodeExhausted("ZZ-999".into()).is_retryable());
        assert!(!StoreError::Infrastructure(AppError::internal("x")).is_retryable());
    }

    #[test]
    fn test_app_error_mapping() {
        assert!(matches!(
            AppError::from(StoreError::duplicate("dup")),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(StoreError::not_found("AA-001")),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(StoreError::invalid("closed")),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from(StoreError::invariant("hq")),
            AppError::FailedPrecondition(_)
        ));
        assert!(matches!(
            AppError::from(StoreError::CodeExhausted("ZZ-999".into())),
            AppError::ResourceExhausted(_)
        ));
    }

    #[test]
    fn test_infrastructure_error_passes_through() {
        let err = AppError::from(StoreError::from(AppError::database("down")));
        assert!(matches!(err, AppError::Database(msg) if msg == "down"));
    }

    #[test]
    fn test_store_code_error_conversion() {
        let err = StoreError::from(StoreCodeError::Exhausted("ZZ-999".into()));
        assert!(matches!(err, StoreError::CodeExhausted(last) if last == "ZZ-999"));

        let err = StoreError::from(StoreCodeError::Malformed("A1-000".into()));
        assert!(matches!(err, StoreError::InvalidValue(_)));
    }
}
