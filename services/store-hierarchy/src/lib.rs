//! Store Hierarchy Service Library
//!
//! 门店层级与编码分配：
//! - `domain`: 门店聚合、编码值对象、仓储与工作单元接口
//! - `application`: 命令、查询与业务处理器
//! - `infrastructure`: PostgreSQL 持久化与迁移

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
