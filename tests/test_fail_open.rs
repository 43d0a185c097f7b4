//! 存储故障时三个组件都应放行，且不向调用方抛错

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use edge_guard::cache::{
    CacheConfig, LockoutConfig, LockoutGuard, RateLimitConfig, RateLimiter, ResponseCache,
};
use edge_guard::clock::ManualClock;
use edge_guard::store::{KvStore, MemoryStore};

use common::{FailingStore, ReadOnlyStore};

#[tokio::test]
async fn failing_store_allows_everything() {
    let store = Arc::new(FailingStore::default());
    let clock = Arc::new(ManualClock::new(0));

    let limiter = RateLimiter::new(Some(store.clone()), clock.clone());
    let guard = LockoutGuard::new(Some(store.clone()), clock.clone());
    let cache = ResponseCache::new(
        Some(store.clone()),
        clock,
        CacheConfig {
            prefix: "balance".into(),
            freshness_secs: 60,
        },
    );

    let rate = RateLimitConfig {
        max_requests: 1,
        window_secs: 60,
    };
    let lockout = LockoutConfig {
        max_attempts: 1,
        lockout_secs: 60,
    };

    for ip in ["1.1.1.1", "1.1.1.1", "2001:db8::1", ""] {
        assert!(limiter.check_and_consume(ip, &rate, true).await);
    }
    for account in ["alice", "alice", "bob"] {
        assert!(!guard.record_failure(account, &lockout, true).await);
        assert!(!guard.is_locked(account, true).await);
        guard.clear_on_success(account, true).await;
    }
    cache.set("alice", "10.00", true).await;
    assert_eq!(cache.get("alice", true).await, None);

    assert!(store.calls.load(Ordering::SeqCst) > 0);
}

#[tokio::test]
async fn failing_store_allows_even_zero_limit() {
    let store = Arc::new(FailingStore::default());
    let limiter = RateLimiter::new(Some(store.clone()), Arc::new(ManualClock::new(0)));
    let deny_all = RateLimitConfig {
        max_requests: 0,
        window_secs: 60,
    };

    assert!(limiter.check_and_consume("1.1.1.1", &deny_all, false).await);
    assert_eq!(store.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn write_failures_do_not_block() {
    let clock = Arc::new(ManualClock::new(0));
    let store = Arc::new(ReadOnlyStore {
        inner: MemoryStore::new(clock.clone()),
    });
    let limiter = RateLimiter::new(Some(store.clone()), clock.clone());
    let rate = RateLimitConfig {
        max_requests: 2,
        window_secs: 60,
    };

    // 写入一直失败，计数永远停留在 0，请求一直放行
    for _ in 0..5 {
        assert!(limiter.check_and_consume("3.3.3.3", &rate, false).await);
    }
    assert!(store.get("rate:3.3.3.3").await.unwrap().is_none());
}

#[tokio::test]
async fn missing_store_disables_protection() {
    let clock = Arc::new(ManualClock::new(0));
    let limiter = RateLimiter::new(None, clock.clone());
    let guard = LockoutGuard::new(None, clock.clone());
    let cache = ResponseCache::new(
        None,
        clock,
        CacheConfig {
            prefix: "balance".into(),
            freshness_secs: 60,
        },
    );

    let rate = RateLimitConfig {
        max_requests: 1,
        window_secs: 60,
    };
    assert!(limiter.check_and_consume("1.1.1.1", &rate, false).await);
    assert!(limiter.check_and_consume("1.1.1.1", &rate, false).await);

    let lockout = LockoutConfig {
        max_attempts: 1,
        lockout_secs: 60,
    };
    assert!(!guard.record_failure("alice", &lockout, false).await);
    assert!(!guard.is_locked("alice", false).await);

    cache.set("alice", "1.00", false).await;
    assert_eq!(cache.get("alice", false).await, None);
}
