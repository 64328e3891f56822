//! 门店编码分配测试

mod common;

use std::collections::HashSet;
use std::sync::atomic::Ordering;

use common::{TestContext, franchise, headquarter};
use futures::future::join_all;
use sales_common::RetryConfig;
use store_hierarchy::error::StoreError;

#[tokio::test]
async fn test_first_code_is_aa_001() {
    let ctx = TestContext::new();
    let view = ctx
        .handler
        .create_store(headquarter("Seoul HQ", "100-00-00001"))
        .await
        .unwrap();
    assert_eq!(view.store_code, "AA-001");
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_codes() {
    let ctx = TestContext::new();
    ctx.handler
        .create_store(headquarter("Seoul HQ", "100-00-00001"))
        .await
        .unwrap();

    let commands: Vec<_> = (1..=20)
        .map(|i| franchise(&format!("Store {i}"), &format!("200-00-{i:05}"), "AA-001"))
        .collect();
    let results = join_all(commands.into_iter().map(|cmd| ctx.handler.create_store(cmd))).await;

    let codes: HashSet<String> = results
        .into_iter()
        .map(|r| r.unwrap().store_code)
        .collect();
    let expected: HashSet<String> = (2..=21).map(|n| format!("AA-{n:03}")).collect();
    assert_eq!(codes, expected);
}

#[tokio::test]
async fn test_collision_is_retried() {
    let ctx = TestContext::new();
    ctx.handler
        .create_store(headquarter("Seoul HQ", "100-00-00001"))
        .await
        .unwrap();

    ctx.stale_allocations.store(2, Ordering::SeqCst);
    let view = ctx
        .handler
        .create_store(franchise("Gangnam", "200-00-00001", "AA-001"))
        .await
        .unwrap();

    assert_eq!(view.store_code, "AA-002");
    assert_eq!(ctx.stale_allocations.load(Ordering::SeqCst), 0);
    assert_eq!(ctx.store_count().await, 2);
}

#[tokio::test]
async fn test_collision_gives_up_after_max_attempts() {
    let ctx = TestContext::with_retry(RetryConfig::from_millis(3, 1, 1));
    ctx.handler
        .create_store(headquarter("Seoul HQ", "100-00-00001"))
        .await
        .unwrap();

    ctx.stale_allocations.store(10, Ordering::SeqCst);
    let err = ctx
        .handler
        .create_store(franchise("Gangnam", "200-00-00001", "AA-001"))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::CodeCollision(_)));
    assert_eq!(ctx.stale_allocations.load(Ordering::SeqCst), 7);
    assert_eq!(ctx.store_count().await, 1);
}

#[tokio::test]
async fn test_prefix_rolls_over() {
    let ctx = TestContext::new();
    ctx.seed_headquarter("AZ-999", "100-00-00001").await;

    let view = ctx
        .handler
        .create_store(headquarter("Next HQ", "100-00-00002"))
        .await
        .unwrap();
    assert_eq!(view.store_code, "BA-000");

    let view = ctx
        .handler
        .create_store(franchise("After Rollover", "200-00-00001", "BA-000"))
        .await
        .unwrap();
    assert_eq!(view.store_code, "BA-001");
}

#[tokio::test]
async fn test_code_space_exhaustion() {
    let ctx = TestContext::new();
    ctx.seed_headquarter("ZZ-999", "100-00-00001").await;

    let err = ctx
        .handler
        .create_store(headquarter("One Too Many", "100-00-00002"))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::CodeExhausted(_)));
    assert_eq!(ctx.store_count().await, 1);
}
