//! 实体基础 trait

use sales_common::{Actor, AuditInfo};

/// 实体 trait
pub trait Entity {
    type Id;

    fn id(&self) -> &Self::Id;
}

/// 聚合根 trait
pub trait AggregateRoot: Entity {
    fn audit_info(&self) -> &AuditInfo;
    fn audit_info_mut(&mut self) -> &mut AuditInfo;

    /// 记录一次变更
    fn touch(&mut self, actor: Actor) {
        self.audit_info_mut().update(actor);
    }
}
