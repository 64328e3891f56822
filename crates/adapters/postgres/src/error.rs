//! 数据库错误映射工具
//!
//! 统一的 SQLx 错误到 AppError 的转换

use sales_errors::AppError;

/// PostgreSQL 唯一约束违规
pub const UNIQUE_VIOLATION: &str = "23505";

/// 若为唯一约束违规，返回触发的约束名
pub fn unique_violation_constraint(e: &sqlx::Error) -> Option<String> {
    match e {
        sqlx::Error::Database(db_err)
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
        {
            Some(db_err.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

/// 将 SQLx 错误转换为 AppError，区分不同错误类型
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    // PostgreSQL 约束违规代码
                    UNIQUE_VIOLATION => {
                        AppError::conflict("Duplicate entry violates unique constraint")
                    }
                    "23503" => AppError::validation("Foreign key constraint violation"),
                    "23514" => AppError::validation("Check constraint violation"),
                    "23502" => AppError::validation("Not null constraint violation"),
                    "22001" => AppError::validation("String data too long"),
                    "22P02" => AppError::validation("Invalid input syntax"),
                    _ => AppError::database(format!("Database error ({}): {}", code, db_err)),
                }
            } else {
                AppError::database(db_err.to_string())
            }
        }
        sqlx::Error::PoolTimedOut => AppError::internal("Database connection pool timeout"),
        sqlx::Error::PoolClosed => AppError::internal("Database connection pool is closed"),
        sqlx::Error::Protocol(msg) => {
            AppError::internal(format!("Database protocol error: {}", msg))
        }
        _ => AppError::database(e.to_string()),
    }
}
