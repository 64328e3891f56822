//! sales-errors - 统一错误处理
//!
//! 各服务的领域错误最终都会折叠为 [`AppError`]

use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),

    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn failed_precondition(msg: impl Into<String>) -> Self {
        Self::FailedPrecondition(msg.into())
    }

    pub fn resource_exhausted(msg: impl Into<String>) -> Self {
        Self::ResourceExhausted(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Unauthenticated(_) => 401,
            Self::Conflict(_) => 409,
            Self::FailedPrecondition(_) => 412,
            Self::ResourceExhausted(_) => 507,
            Self::Internal(_) => 500,
            Self::Database(_) => 500,
        }
    }

    /// 是否为调用方可修正的错误（4xx）
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::not_found("store").status_code(), 404);
        assert_eq!(AppError::validation("name").status_code(), 400);
        assert_eq!(AppError::conflict("dup").status_code(), 409);
        assert_eq!(AppError::database("down").status_code(), 500);
    }

    #[test]
    fn test_client_error_classification() {
        assert!(AppError::conflict("dup").is_client_error());
        assert!(AppError::failed_precondition("closed").is_client_error());
        assert!(!AppError::internal("boom").is_client_error());
        assert!(!AppError::resource_exhausted("codes").is_client_error());
    }

    #[test]
    fn test_display_keeps_message() {
        let err = AppError::not_found("Store AA-001");
        assert_eq!(err.to_string(), "Not found: Store AA-001");
    }
}
