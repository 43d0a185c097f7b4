use serde::{Deserialize, Serialize};

/// 连续登录失败记录
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LockoutState {
    pub failed_attempts: u32,
    pub last_failure: i64, // 毫秒时间戳
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_until: Option<i64>,
}

impl LockoutState {
    pub fn first_failure(now: i64) -> Self {
        Self {
            failed_attempts: 1,
            last_failure: now,
            locked_until: None,
        }
    }

    /// 锁定是否仍然有效
    pub fn is_locked_at(&self, now: i64) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }

    /// 曾经锁定但已到期
    pub fn lock_expired_at(&self, now: i64) -> bool {
        self.locked_until.is_some_and(|until| now >= until)
    }
}
