//! 测试用内存仓储与工作单元
//!
//! 工作单元持有已提交数据的独占锁，相当于数据库中的序列行锁；
//! 写入先落在工作副本上，提交时整体写回。

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use sales_common::{Actor, RetryConfig, UserId};
use sales_domain_core::{AggregateRoot, Entity};
use tokio::sync::{Mutex, OwnedMutexGuard};

use store_hierarchy::application::{CloseStoreCommand, CreateStoreCommand, ServiceHandler};
use store_hierarchy::domain::entities::{NewStore, Store};
use store_hierarchy::domain::enums::{StoreCategory, StoreType};
use store_hierarchy::domain::repositories::StoreRepository;
use store_hierarchy::domain::services::{StoreCodeAllocator, next_store_code};
use store_hierarchy::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use store_hierarchy::domain::value_objects::{BusinessNumber, StoreCode, StoreId};
use store_hierarchy::error::{ServiceResult, StoreError};

type Committed = Arc<Mutex<Vec<Store>>>;

// =============================================================================
// 对内存快照的查询
// =============================================================================

fn active_where(stores: &[Store], pred: impl Fn(&Store) -> bool) -> Vec<Store> {
    let mut found: Vec<Store> = stores
        .iter()
        .filter(|s| !s.is_closed() && pred(s))
        .cloned()
        .collect();
    found.sort_by_key(|s| s.code().copied());
    found
}

fn find_by_code(stores: &[Store], code: &StoreCode) -> Option<Store> {
    stores.iter().find(|s| s.code() == Some(code)).cloned()
}

fn business_number_taken(stores: &[Store], number: &BusinessNumber, excluding: Option<&StoreId>) -> bool {
    stores
        .iter()
        .any(|s| s.business_number() == number && Some(s.id()) != excluding)
}

fn recent_active(stores: &[Store], limit: u32) -> Vec<Store> {
    let mut found = active_where(stores, |_| true);
    found.sort_by(|a, b| {
        b.audit_info()
            .created_at
            .cmp(&a.audit_info().created_at)
            .then_with(|| b.code().cmp(&a.code()))
    });
    found.truncate(limit as usize);
    found
}

fn insert(stores: &mut Vec<Store>, store: &Store) -> ServiceResult<()> {
    let code = store.assigned_code()?;
    if stores.iter().any(|s| s.code() == Some(&code)) {
        return Err(StoreError::CodeCollision(code.to_string()));
    }
    if business_number_taken(stores, store.business_number(), None) {
        return Err(StoreError::duplicate(format!(
            "营业执照号 {} 已被注册",
            store.business_number()
        )));
    }
    stores.push(store.clone());
    Ok(())
}

fn replace(stores: &mut [Store], store: &Store) -> ServiceResult<()> {
    let slot = stores
        .iter_mut()
        .find(|s| s.id() == store.id())
        .ok_or_else(|| StoreError::not_found(format!("门店 {} 不存在", store.id())))?;
    *slot = store.clone();
    Ok(())
}

// =============================================================================
// 读仓储（已提交数据）
// =============================================================================

pub struct MemoryStoreRepository {
    committed: Committed,
}

#[async_trait]
impl StoreRepository for MemoryStoreRepository {
    async fn find_by_code(&self, code: &StoreCode) -> ServiceResult<Option<Store>> {
        Ok(find_by_code(&*self.committed.lock().await, code))
    }

    async fn find_by_code_for_update(&self, code: &StoreCode) -> ServiceResult<Option<Store>> {
        self.find_by_code(code).await
    }

    async fn exists_by_business_number(&self, number: &BusinessNumber) -> ServiceResult<bool> {
        Ok(business_number_taken(&*self.committed.lock().await, number, None))
    }

    async fn exists_by_business_number_excluding_id(
        &self,
        number: &BusinessNumber,
        id: &StoreId,
    ) -> ServiceResult<bool> {
        Ok(business_number_taken(&*self.committed.lock().await, number, Some(id)))
    }

    async fn find_all_active(&self) -> ServiceResult<Vec<Store>> {
        Ok(active_where(&*self.committed.lock().await, |_| true))
    }

    async fn find_active_by_category(&self, category: StoreCategory) -> ServiceResult<Vec<Store>> {
        Ok(active_where(&*self.committed.lock().await, |s| s.category() == category))
    }

    async fn find_active_by_type(&self, store_type: StoreType) -> ServiceResult<Vec<Store>> {
        Ok(active_where(&*self.committed.lock().await, |s| s.store_type() == store_type))
    }

    async fn find_active_by_headquarter(
        &self,
        headquarter_id: &StoreId,
    ) -> ServiceResult<Vec<Store>> {
        Ok(active_where(&*self.committed.lock().await, |s| {
            s.headquarter().map(|hq| &hq.id) == Some(headquarter_id)
        }))
    }

    async fn exists_active_by_headquarter(&self, headquarter_id: &StoreId) -> ServiceResult<bool> {
        Ok(!self.find_active_by_headquarter(headquarter_id).await?.is_empty())
    }

    async fn find_recent_active(&self, limit: u32) -> ServiceResult<Vec<Store>> {
        Ok(recent_active(&*self.committed.lock().await, limit))
    }

    async fn save(&self, store: &Store) -> ServiceResult<()> {
        insert(&mut *self.committed.lock().await, store)
    }

    async fn update(&self, store: &Store) -> ServiceResult<()> {
        replace(&mut *self.committed.lock().await, store)
    }
}

// =============================================================================
// 工作单元
// =============================================================================

pub struct MemoryUnitOfWorkFactory {
    committed: Committed,
    stale_allocations: Arc<AtomicUsize>,
}

#[async_trait]
impl UnitOfWorkFactory for MemoryUnitOfWorkFactory {
    async fn begin(&self) -> ServiceResult<Box<dyn UnitOfWork>> {
        let guard = self.committed.clone().lock_owned().await;
        let working = guard.to_vec();
        Ok(Box::new(MemoryUnitOfWork {
            committed: guard,
            working: StdMutex::new(working),
            stale_allocations: self.stale_allocations.clone(),
        }))
    }
}

pub struct MemoryUnitOfWork {
    committed: OwnedMutexGuard<Vec<Store>>,
    working: StdMutex<Vec<Store>>,
    stale_allocations: Arc<AtomicUsize>,
}

impl MemoryUnitOfWork {
    fn working(&self) -> std::sync::MutexGuard<'_, Vec<Store>> {
        self.working.lock().unwrap()
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    fn stores(&self) -> &dyn StoreRepository {
        self
    }

    fn codes(&self) -> &dyn StoreCodeAllocator {
        self
    }

    async fn commit(self: Box<Self>) -> ServiceResult<()> {
        let MemoryUnitOfWork {
            mut committed,
            working,
            ..
        } = *self;
        *committed = working.into_inner().unwrap();
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> ServiceResult<()> {
        Ok(())
    }
}

#[async_trait]
impl StoreCodeAllocator for MemoryUnitOfWork {
    /// 处于陈旧模式时返回已被占用的最大编码，模拟并发分配冲突
    async fn allocate(&self) -> ServiceResult<StoreCode> {
        let current = self.working().iter().filter_map(|s| s.code().copied()).max();

        let stale = self
            .stale_allocations
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        match current {
            Some(code) if stale => Ok(code),
            _ => next_store_code(current.as_ref()),
        }
    }
}

#[async_trait]
impl StoreRepository for MemoryUnitOfWork {
    async fn find_by_code(&self, code: &StoreCode) -> ServiceResult<Option<Store>> {
        Ok(find_by_code(&*self.working(), code))
    }

    /// 工作单元已独占全部数据
    async fn find_by_code_for_update(&self, code: &StoreCode) -> ServiceResult<Option<Store>> {
        self.find_by_code(code).await
    }

    async fn exists_by_business_number(&self, number: &BusinessNumber) -> ServiceResult<bool> {
        Ok(business_number_taken(&*self.working(), number, None))
    }

    async fn exists_by_business_number_excluding_id(
        &self,
        number: &BusinessNumber,
        id: &StoreId,
    ) -> ServiceResult<bool> {
        Ok(business_number_taken(&*self.working(), number, Some(id)))
    }

    async fn find_all_active(&self) -> ServiceResult<Vec<Store>> {
        Ok(active_where(&*self.working(), |_| true))
    }

    async fn find_active_by_category(&self, category: StoreCategory) -> ServiceResult<Vec<Store>> {
        Ok(active_where(&*self.working(), |s| s.category() == category))
    }

    async fn find_active_by_type(&self, store_type: StoreType) -> ServiceResult<Vec<Store>> {
        Ok(active_where(&*self.working(), |s| s.store_type() == store_type))
    }

    async fn find_active_by_headquarter(
        &self,
        headquarter_id: &StoreId,
    ) -> ServiceResult<Vec<Store>> {
        Ok(active_where(&*self.working(), |s| {
            s.headquarter().map(|hq| &hq.id) == Some(headquarter_id)
        }))
    }

    async fn exists_active_by_headquarter(&self, headquarter_id: &StoreId) -> ServiceResult<bool> {
        Ok(!self.find_active_by_headquarter(headquarter_id).await?.is_empty())
    }

    async fn find_recent_active(&self, limit: u32) -> ServiceResult<Vec<Store>> {
        Ok(recent_active(&*self.working(), limit))
    }

    async fn save(&self, store: &Store) -> ServiceResult<()> {
        insert(&mut *self.working(), store)
    }

    async fn update(&self, store: &Store) -> ServiceResult<()> {
        replace(&mut *self.working(), store)
    }
}

// =============================================================================
// 测试夹具
// =============================================================================

pub struct TestContext {
    pub handler: ServiceHandler,
    pub committed: Committed,
    /// 接下来若干次分配返回已占用的编码
    pub stale_allocations: Arc<AtomicUsize>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_retry(RetryConfig::from_millis(5, 1, 5))
    }

    pub fn with_retry(retry: RetryConfig) -> Self {
        let committed: Committed = Arc::new(Mutex::new(Vec::new()));
        let stale_allocations = Arc::new(AtomicUsize::new(0));

        let handler = ServiceHandler::new(
            Arc::new(MemoryStoreRepository {
                committed: committed.clone(),
            }),
            Arc::new(MemoryUnitOfWorkFactory {
                committed: committed.clone(),
                stale_allocations: stale_allocations.clone(),
            }),
            retry,
        );

        Self {
            handler,
            committed,
            stale_allocations,
        }
    }

    /// 绕过服务层直接写入一个已编码的总部
    pub async fn seed_headquarter(&self, code: &str, business_number: &str) {
        let mut store = Store::new(
            NewStore {
                name: format!("Seeded {}", code),
                category: StoreCategory::Retail,
                business_number: BusinessNumber::new(business_number).unwrap(),
                open_date: date(2020, 1, 1),
                store_type: StoreType::Headquarter,
            },
            None,
            actor(),
        )
        .unwrap();
        store.assign_code(StoreCode::parse(code).unwrap()).unwrap();
        self.committed.lock().await.push(store);
    }

    pub async fn store_count(&self) -> usize {
        self.committed.lock().await.len()
    }
}

pub fn actor() -> Actor {
    Actor::new(UserId::new(), "kim")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn headquarter(name: &str, business_number: &str) -> CreateStoreCommand {
    CreateStoreCommand {
        name: name.to_string(),
        category: StoreCategory::Cafe,
        business_number: business_number.to_string(),
        open_date: date(2024, 1, 1),
        store_type: StoreType::Headquarter,
        headquarter_code: None,
        actor: actor(),
    }
}

pub fn franchise(name: &str, business_number: &str, headquarter_code: &str) -> CreateStoreCommand {
    CreateStoreCommand {
        name: name.to_string(),
        category: StoreCategory::Cafe,
        business_number: business_number.to_string(),
        open_date: date(2024, 2, 1),
        store_type: StoreType::Franchise,
        headquarter_code: Some(headquarter_code.to_string()),
        actor: actor(),
    }
}

pub fn close(code: &str, close_date: NaiveDate) -> CloseStoreCommand {
    CloseStoreCommand {
        code: code.to_string(),
        close_date,
        actor: actor(),
    }
}
