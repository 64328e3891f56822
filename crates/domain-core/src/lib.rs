//! sales-domain-core - 跨 context 的领域核心类型

mod entity;

pub use entity::*;

// Re-export common types
pub use sales_common::{Actor, AuditInfo, UserId};
