/// 缓存数据模型
/// 定义持久化到共享存储中的记录结构，字段名对其他读取方保持稳定

// 限流窗口
pub mod rate_limit;

// 登录锁定状态
pub mod lockout;

// 响应缓存条目
pub mod response;

pub use lockout::LockoutState;
pub use rate_limit::RateWindow;
pub use response::CacheEntry;
