//! 仓储接口

mod store_repository;

pub use store_repository::*;
