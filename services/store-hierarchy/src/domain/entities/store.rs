//! 门店聚合根

use chrono::NaiveDate;
use sales_common::{Actor, AuditInfo};
use sales_domain_core::{AggregateRoot, Entity};

use crate::domain::enums::{StoreCategory, StoreStatus, StoreType};
use crate::domain::value_objects::{BusinessNumber, StoreCode, StoreId};
use crate::error::{ServiceResult, StoreError};

/// 门店名称最大长度
pub const MAX_NAME_LENGTH: usize = 100;

/// 加盟店所引用的总部
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadquarterRef {
    pub id: StoreId,
    pub code: StoreCode,
    pub name: String,
}

/// 门店在层级中的位置
///
/// 总部不引用任何门店；加盟店恰好引用一个总部。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Headquarter,
    Franchise { headquarter: HeadquarterRef },
}

impl StoreKind {
    pub fn store_type(&self) -> StoreType {
        match self {
            StoreKind::Headquarter => StoreType::Headquarter,
            StoreKind::Franchise { .. } => StoreType::Franchise,
        }
    }

    pub fn headquarter(&self) -> Option<&HeadquarterRef> {
        match self {
            StoreKind::Headquarter => None,
            StoreKind::Franchise { headquarter } => Some(headquarter),
        }
    }
}

/// 新建门店所需的属性
#[derive(Debug, Clone)]
pub struct NewStore {
    pub name: String,
    pub category: StoreCategory,
    pub business_number: BusinessNumber,
    pub open_date: NaiveDate,
    pub store_type: StoreType,
}

/// 可修改的门店基本信息
#[derive(Debug, Clone)]
pub struct StoreInfo {
    pub name: String,
    pub category: StoreCategory,
    pub business_number: BusinessNumber,
    pub open_date: NaiveDate,
}

/// 门店聚合根
#[derive(Debug, Clone)]
pub struct Store {
    id: StoreId,
    /// 创建后分配一次，此后不变
    code: Option<StoreCode>,
    name: String,
    category: StoreCategory,
    business_number: BusinessNumber,
    open_date: NaiveDate,
    status: StoreStatus,
    kind: StoreKind,
    audit_info: AuditInfo,
}

impl Store {
    /// 创建门店
    ///
    /// 总部不能指定所属总部，加盟店必须指定一个已编码的总部。
    pub fn new(new: NewStore, headquarter: Option<&Store>, actor: Actor) -> ServiceResult<Self> {
        let name = validate_name(&new.name)?;

        let kind = match (new.store_type, headquarter) {
            (StoreType::Headquarter, None) => StoreKind::Headquarter,
            (StoreType::Headquarter, Some(_)) => {
                return Err(StoreError::invariant("总部门店不能指定所属总部"));
            }
            (StoreType::Franchise, None) => {
                return Err(StoreError::invariant("加盟店必须指定所属总部"));
            }
            (StoreType::Franchise, Some(hq)) => StoreKind::Franchise {
                headquarter: hq.as_headquarter_ref()?,
            },
        };

        Ok(Self {
            id: StoreId::new(),
            code: None,
            name,
            category: new.category,
            business_number: new.business_number,
            open_date: new.open_date,
            status: StoreStatus::Open,
            kind,
            audit_info: AuditInfo::new(actor),
        })
    }

    /// 从持久化数据重建
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: StoreId,
        code: StoreCode,
        name: String,
        category: StoreCategory,
        business_number: BusinessNumber,
        open_date: NaiveDate,
        status: StoreStatus,
        kind: StoreKind,
        audit_info: AuditInfo,
    ) -> Self {
        Self {
            id,
            code: Some(code),
            name,
            category,
            business_number,
            open_date,
            status,
            kind,
            audit_info,
        }
    }

    // ========== Getters ==========

    pub fn code(&self) -> Option<&StoreCode> {
        self.code.as_ref()
    }

    /// 已持久化门店的编码
    pub fn assigned_code(&self) -> ServiceResult<StoreCode> {
        self.code
            .ok_or_else(|| StoreError::invariant(format!("门店 {} 尚未分配编码", self.id)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> StoreCategory {
        self.category
    }

    pub fn business_number(&self) -> &BusinessNumber {
        &self.business_number
    }

    pub fn open_date(&self) -> NaiveDate {
        self.open_date
    }

    pub fn status(&self) -> StoreStatus {
        self.status
    }

    pub fn close_date(&self) -> Option<NaiveDate> {
        self.status.close_date()
    }

    pub fn is_closed(&self) -> bool {
        self.status.is_closed()
    }

    pub fn kind(&self) -> &StoreKind {
        &self.kind
    }

    pub fn store_type(&self) -> StoreType {
        self.kind.store_type()
    }

    pub fn is_headquarter(&self) -> bool {
        matches!(self.kind, StoreKind::Headquarter)
    }

    pub fn headquarter(&self) -> Option<&HeadquarterRef> {
        self.kind.headquarter()
    }

    /// 作为总部被加盟店引用
    pub fn as_headquarter_ref(&self) -> ServiceResult<HeadquarterRef> {
        if !self.is_headquarter() {
            return Err(StoreError::invariant(format!(
                "门店 {} 不是总部",
                self.name
            )));
        }
        Ok(HeadquarterRef {
            id: self.id,
            code: self.assigned_code()?,
            name: self.name.clone(),
        })
    }

    // ========== 状态变更 ==========

    /// 分配门店编码（仅一次）
    pub fn assign_code(&mut self, code: StoreCode) -> ServiceResult<()> {
        if let Some(existing) = self.code {
            return Err(StoreError::invariant(format!(
                "门店已有编码 {}，不能重新分配",
                existing
            )));
        }
        self.code = Some(code);
        Ok(())
    }

    /// 修改基本信息
    pub fn update_info(&mut self, info: StoreInfo, actor: Actor) -> ServiceResult<()> {
        if !self.status.can_update() {
            return Err(StoreError::invalid(format!(
                "门店 {} 已关闭，不能修改",
                self.display_code()
            )));
        }

        self.name = validate_name(&info.name)?;
        self.category = info.category;
        self.business_number = info.business_number;
        self.open_date = info.open_date;
        self.touch(actor);
        Ok(())
    }

    /// 关闭门店
    ///
    /// 总部下是否仍有营业中的加盟店由服务层检查。
    pub fn close(&mut self, close_date: NaiveDate, actor: Actor) -> ServiceResult<()> {
        if !self.status.can_close() {
            return Err(StoreError::invalid(format!(
                "门店 {} 已经关闭",
                self.display_code()
            )));
        }
        if close_date < self.open_date {
            return Err(StoreError::invalid(format!(
                "关闭日期 {} 早于开业日期 {}",
                close_date, self.open_date
            )));
        }

        self.status = StoreStatus::Closed { close_date };
        self.touch(actor);
        Ok(())
    }

    fn display_code(&self) -> String {
        self.code
            .map(|c| c.to_string())
            .unwrap_or_else(|| self.name.clone())
    }
}

fn validate_name(name: &str) -> ServiceResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::invalid("门店名称不能为空"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(StoreError::invalid(format!(
            "门店名称长度不能超过{}个字符",
            MAX_NAME_LENGTH
        )));
    }
    Ok(name.to_string())
}

impl Entity for Store {
    type Id = StoreId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Store {
    fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    fn audit_info_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit_info
    }
}
