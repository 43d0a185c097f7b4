/// 缓存操作
/// 三个防护组件共用同一个存储，但各自的键空间和策略互相独立

// IP 限流
pub mod rate_limit;

// 登录失败锁定
pub mod lockout;

// 响应缓存
pub mod response;

pub use lockout::{LockStatus, LockoutConfig, LockoutGuard};
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use response::{CacheConfig, ResponseCache};
