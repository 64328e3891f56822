//! Business logic handler
//!
//! 写操作各自运行在一个工作单元内；读操作直接走连接池仓储。

use std::sync::Arc;

use metrics::counter;
use sales_common::{RetryConfig, with_conditional_retry};
use sales_domain_core::Entity;
use tracing::{info, warn};

use crate::domain::entities::{NewStore, Store, StoreInfo};
use crate::domain::enums::StoreType;
use crate::domain::repositories::StoreRepository;
use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use crate::domain::value_objects::{BusinessNumber, StoreCode};
use crate::error::{ServiceResult, StoreError};

use super::commands::*;
use super::queries::*;
use super::views::{StoreView, to_views};

const STORES_CREATED: &str = "store_hierarchy_stores_created_total";
const STORES_UPDATED: &str = "store_hierarchy_stores_updated_total";
const STORES_CLOSED: &str = "store_hierarchy_stores_closed_total";
const CODE_COLLISIONS: &str = "store_hierarchy_code_collisions_total";

pub struct ServiceHandler {
    store_repo: Arc<dyn StoreRepository>,
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    /// 编码冲突时整体重试创建
    allocation_retry: RetryConfig,
}

impl ServiceHandler {
    pub fn new(
        store_repo: Arc<dyn StoreRepository>,
        uow_factory: Arc<dyn UnitOfWorkFactory>,
        allocation_retry: RetryConfig,
    ) -> Self {
        Self {
            store_repo,
            uow_factory,
            allocation_retry,
        }
    }

    // ========== 写操作 ==========

    /// 创建门店
    pub async fn create_store(&self, cmd: CreateStoreCommand) -> ServiceResult<StoreView> {
        info!(
            store_name = %cmd.name,
            store_type = %cmd.store_type,
            actor = %cmd.actor.name,
            "Creating store"
        );

        cmd.validate()?;
        let business_number = parse_business_number(&cmd.business_number)?;

        let store = with_conditional_retry(
            &self.allocation_retry,
            "create_store",
            || self.try_create_store(&cmd, &business_number),
            StoreError::is_retryable,
        )
        .await?;

        let view = StoreView::try_from(&store)?;
        counter!(STORES_CREATED, "store_type" => store.store_type().as_str()).increment(1);
        info!(
            store_code = %view.store_code,
            store_type = %view.store_type,
            headquarter_code = ?view.headquarter_code,
            "Store created"
        );
        Ok(view)
    }

    async fn try_create_store(
        &self,
        cmd: &CreateStoreCommand,
        business_number: &BusinessNumber,
    ) -> ServiceResult<Store> {
        let uow = self.uow_factory.begin().await?;
        let result = Self::create_in(uow.as_ref(), cmd, business_number).await;
        if let Err(StoreError::CodeCollision(code)) = &result {
            counter!(CODE_COLLISIONS).increment(1);
            warn!(store_code = %code, "Store code collision, retrying allocation");
        }
        finish(uow, result).await
    }

    async fn create_in(
        uow: &dyn UnitOfWork,
        cmd: &CreateStoreCommand,
        business_number: &BusinessNumber,
    ) -> ServiceResult<Store> {
        let stores = uow.stores();

        // 1. 营业执照号唯一
        if stores.exists_by_business_number(business_number).await? {
            warn!(business_number = %business_number, "Duplicate business number");
            return Err(StoreError::duplicate(format!(
                "营业执照号 {} 已被注册",
                business_number
            )));
        }

        // 2. 加盟店解析所属总部
        let headquarter = match cmd.store_type {
            StoreType::Headquarter => None,
            StoreType::Franchise => {
                Some(resolve_headquarter(stores, cmd.headquarter_code.as_deref()).await?)
            }
        };

        // 3. 构造聚合（自身校验层级结构）
        let mut store = Store::new(
            NewStore {
                name: cmd.name.clone(),
                category: cmd.category,
                business_number: business_number.clone(),
                open_date: cmd.open_date,
                store_type: cmd.store_type,
            },
            headquarter.as_ref(),
            cmd.actor.clone(),
        )?;

        // 4. 在同一事务内分配编码
        let code = uow.codes().allocate().await?;
        store.assign_code(code)?;

        // 5. 持久化
        stores.save(&store).await?;
        Ok(store)
    }

    /// 修改门店基本信息
    pub async fn update_store(&self, cmd: UpdateStoreCommand) -> ServiceResult<StoreView> {
        info!(store_code = %cmd.code, actor = %cmd.actor.name, "Updating store");

        cmd.validate()?;
        let business_number = parse_business_number(&cmd.business_number)?;
        let code = parse_lookup_code(&cmd.code)?;

        let uow = self.uow_factory.begin().await?;
        let result = Self::update_in(uow.as_ref(), &cmd, &code, business_number).await;
        let store = finish(uow, result).await?;

        counter!(STORES_UPDATED).increment(1);
        info!(store_code = %code, "Store updated");
        StoreView::try_from(&store)
    }

    async fn update_in(
        uow: &dyn UnitOfWork,
        cmd: &UpdateStoreCommand,
        code: &StoreCode,
        business_number: BusinessNumber,
    ) -> ServiceResult<Store> {
        let stores = uow.stores();

        let mut store = lock_store(stores, code).await?;

        if stores
            .exists_by_business_number_excluding_id(&business_number, store.id())
            .await?
        {
            warn!(store_code = %code, business_number = %business_number, "Duplicate business number");
            return Err(StoreError::duplicate(format!(
                "营业执照号 {} 已被其他门店使用",
                business_number
            )));
        }

        store.update_info(
            StoreInfo {
                name: cmd.name.clone(),
                category: cmd.category,
                business_number,
                open_date: cmd.open_date,
            },
            cmd.actor.clone(),
        )?;

        stores.update(&store).await?;
        Ok(store)
    }

    /// 关闭门店
    pub async fn close_store(&self, cmd: CloseStoreCommand) -> ServiceResult<StoreView> {
        info!(
            store_code = %cmd.code,
            close_date = %cmd.close_date,
            actor = %cmd.actor.name,
            "Closing store"
        );

        cmd.validate()?;
        let code = parse_lookup_code(&cmd.code)?;

        let uow = self.uow_factory.begin().await?;
        let result = Self::close_in(uow.as_ref(), &cmd, &code).await;
        let store = finish(uow, result).await?;

        counter!(STORES_CLOSED, "store_type" => store.store_type().as_str()).increment(1);
        info!(store_code = %code, "Store closed");
        StoreView::try_from(&store)
    }

    async fn close_in(
        uow: &dyn UnitOfWork,
        cmd: &CloseStoreCommand,
        code: &StoreCode,
    ) -> ServiceResult<Store> {
        let stores = uow.stores();

        // 锁住门店后再检查：并发的关闭或在其下新建加盟店会等待本事务结束
        let mut store = lock_store(stores, code).await?;

        if store.is_headquarter() && stores.exists_active_by_headquarter(store.id()).await? {
            warn!(store_code = %code, "Headquarter still has open franchises");
            return Err(StoreError::invalid(format!(
                "总部 {} 下仍有营业中的加盟店，不能关闭",
                code
            )));
        }

        if store.is_closed() {
            return Err(StoreError::invalid(format!("门店 {} 已经关闭", code)));
        }

        store.close(cmd.close_date, cmd.actor.clone())?;
        stores.update(&store).await?;
        Ok(store)
    }

    // ========== 查询 ==========

    /// 按编码获取门店
    pub async fn get_store(&self, query: GetStoreQuery) -> ServiceResult<StoreView> {
        let code = parse_lookup_code(&query.code)?;
        let store = find_store(self.store_repo.as_ref(), &code).await?;
        StoreView::try_from(&store)
    }

    /// 营业中门店，可按类型过滤
    pub async fn list_active(&self, query: ListActiveStoresQuery) -> ServiceResult<Vec<StoreView>> {
        let stores = match query.store_type {
            None => self.store_repo.find_all_active().await?,
            Some(store_type) => self.store_repo.find_active_by_type(store_type).await?,
        };
        to_views(&stores)
    }

    /// 营业中的总部
    pub async fn list_active_headquarters(&self) -> ServiceResult<Vec<StoreView>> {
        self.list_active(ListActiveStoresQuery {
            store_type: Some(StoreType::Headquarter),
        })
        .await
    }

    /// 营业中的加盟店
    pub async fn list_active_franchises(&self) -> ServiceResult<Vec<StoreView>> {
        self.list_active(ListActiveStoresQuery {
            store_type: Some(StoreType::Franchise),
        })
        .await
    }

    /// 按业态列出营业中门店
    pub async fn list_active_by_category(
        &self,
        query: ListActiveByCategoryQuery,
    ) -> ServiceResult<Vec<StoreView>> {
        let stores = self.store_repo.find_active_by_category(query.category).await?;
        to_views(&stores)
    }

    /// 总部下营业中的加盟店
    pub async fn list_active_franchises_of(
        &self,
        query: ListFranchisesQuery,
    ) -> ServiceResult<Vec<StoreView>> {
        let code = parse_lookup_code(&query.headquarter_code)?;
        let headquarter = self
            .store_repo
            .find_by_code(&code)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("总部门店 {} 不存在", code)))?;

        if !headquarter.is_headquarter() {
            return Err(StoreError::invalid(format!("门店 {} 不是总部", code)));
        }

        let franchises = self
            .store_repo
            .find_active_by_headquarter(headquarter.id())
            .await?;
        to_views(&franchises)
    }

    /// 最近创建的营业中门店
    pub async fn list_recent_active(
        &self,
        query: ListRecentStoresQuery,
    ) -> ServiceResult<Vec<StoreView>> {
        let stores = self.store_repo.find_recent_active(query.limit).await?;
        to_views(&stores)
    }
}

/// 成功则提交，失败则回滚并返回原错误
async fn finish<T>(uow: Box<dyn UnitOfWork>, result: ServiceResult<T>) -> ServiceResult<T> {
    match result {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = uow.rollback().await {
                warn!(error = %rollback_err, "Failed to rollback unit of work");
            }
            Err(e)
        }
    }
}

async fn find_store(stores: &dyn StoreRepository, code: &StoreCode) -> ServiceResult<Store> {
    stores
        .find_by_code(code)
        .await?
        .ok_or_else(|| StoreError::not_found(format!("门店 {} 不存在", code)))
}

async fn lock_store(stores: &dyn StoreRepository, code: &StoreCode) -> ServiceResult<Store> {
    stores
        .find_by_code_for_update(code)
        .await?
        .ok_or_else(|| StoreError::not_found(format!("门店 {} 不存在", code)))
}

/// 锁定总部行，使其在本事务提交前不能被关闭
async fn resolve_headquarter(
    stores: &dyn StoreRepository,
    code: Option<&str>,
) -> ServiceResult<Store> {
    let raw = code
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| StoreError::invalid("加盟店必须提供总部编码"))?;
    let code = parse_lookup_code(raw)?;

    let headquarter = stores
        .find_by_code_for_update(&code)
        .await?
        .ok_or_else(|| StoreError::not_found(format!("总部门店 {} 不存在", code)))?;

    if !headquarter.is_headquarter() {
        return Err(StoreError::invalid(format!("门店 {} 不是总部", code)));
    }
    if headquarter.is_closed() {
        return Err(StoreError::invalid(format!("总部 {} 已关闭", code)));
    }

    Ok(headquarter)
}

fn parse_business_number(raw: &str) -> ServiceResult<BusinessNumber> {
    BusinessNumber::new(raw).map_err(|e| StoreError::invalid(e.to_string()))
}

/// 格式不合法的编码不可能存在，按未找到处理
fn parse_lookup_code(raw: &str) -> ServiceResult<StoreCode> {
    StoreCode::parse(raw).map_err(|_| StoreError::not_found(format!("门店 {} 不存在", raw.trim())))
}
