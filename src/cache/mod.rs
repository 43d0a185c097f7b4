// 缓存模块
// 包含防护状态的键、数据结构和操作逻辑

pub mod keys;
pub mod models;
pub mod operations;

// 重新导出常用类型，方便其他模块使用
pub use models::{CacheEntry, LockoutState, RateWindow};
pub use operations::{
    CacheConfig, LockStatus, LockoutConfig, LockoutGuard, RateLimitConfig, RateLimiter,
    ResponseCache,
};
