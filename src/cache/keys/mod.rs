/// 缓存键模块
/// 各防护组件使用互不重叠的键前缀
pub mod guard_keys;

pub use guard_keys::{lockout_key, rate_limit_key, response_key};
