use std::sync::Arc;

use tracing::{error, info, warn};

use crate::cache::keys::lockout_key;
use crate::cache::models::LockoutState;
use crate::clock::Clock;
use crate::error::{ConfigError, StoreError};
use crate::store::{KvStore, SharedStore, load_record, save_record};
use crate::utils::mask_secret;

/// 登录锁定配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutConfig {
    /// 连续失败多少次后锁定，0 表示第一次失败即锁定
    pub max_attempts: u32,
    pub lockout_secs: u64,
}

impl LockoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lockout_secs == 0 {
            return Err(ConfigError::invalid(
                "LOCKOUT_DURATION",
                "lockout must be at least one second",
            ));
        }
        Ok(())
    }

    fn lockout_millis(&self) -> i64 {
        (self.lockout_secs as i64).saturating_mul(1000)
    }

    /// 记录保留时间为锁定时长的两倍，锁定到期后仍能短暂记住失败次数
    fn record_ttl_secs(&self) -> u64 {
        self.lockout_secs.saturating_mul(2)
    }
}

/// 账号当前的锁定状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    Unlocked,
    Locked { until_ms: i64 },
}

impl LockStatus {
    pub fn is_locked(&self) -> bool {
        matches!(self, LockStatus::Locked { .. })
    }

    /// 距解锁剩余的秒数（向上取整），未锁定时为 `None`
    pub fn retry_after_secs(&self, now_ms: i64) -> Option<u64> {
        match self {
            LockStatus::Unlocked => None,
            LockStatus::Locked { until_ms } => {
                let remaining = until_ms.saturating_sub(now_ms).max(0) as u64;
                Some(remaining.div_ceil(1000))
            }
        }
    }
}

/// 按账号追踪连续认证失败的锁定守卫
///
/// 状态流转：未知 -> 计数(n) -> 锁定(until) -> 到期后再失败回到计数(1)；
/// 认证成功或存储 TTL 回收后回到未知。存储故障一律视为未锁定。
#[derive(Clone)]
pub struct LockoutGuard {
    store: SharedStore,
    clock: Arc<dyn Clock>,
}

impl LockoutGuard {
    pub fn new(store: SharedStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// 查询锁定状态，到期的锁不会在这里清除
    pub async fn lock_status(&self, identity: &str, debug: bool) -> LockStatus {
        let Some(store) = self.store.as_deref() else {
            return LockStatus::Unlocked;
        };

        let key = lockout_key(identity);
        let state = match load_record::<LockoutState>(store, &key).await {
            Ok(state) => state,
            Err(e) => {
                error!(
                    account = %mask_secret(identity),
                    error = %e,
                    "Lockout store read failed, treating as unlocked"
                );
                return LockStatus::Unlocked;
            }
        };

        let now = self.clock.now_millis();
        let status = match &state {
            Some(state) if state.is_locked_at(now) => LockStatus::Locked {
                until_ms: state.locked_until.unwrap_or(now),
            },
            _ => LockStatus::Unlocked,
        };

        if debug {
            info!(
                account = %mask_secret(identity),
                locked = status.is_locked(),
                failed_attempts = state.as_ref().map(|s| s.failed_attempts).unwrap_or(0),
                "Lockout status checked"
            );
        }
        status
    }

    pub async fn is_locked(&self, identity: &str, debug: bool) -> bool {
        self.lock_status(identity, debug).await.is_locked()
    }

    /// 记录一次认证失败，返回本次调用后账号是否处于锁定状态
    pub async fn record_failure(
        &self,
        identity: &str,
        config: &LockoutConfig,
        debug: bool,
    ) -> bool {
        let Some(store) = self.store.as_deref() else {
            return false;
        };

        let key = lockout_key(identity);
        match self.apply_failure(store, &key, config).await {
            Ok(state) => {
                let now = self.clock.now_millis();
                let locked = state.is_locked_at(now);
                if locked && state.failed_attempts == config.max_attempts.max(1) {
                    warn!(
                        account = %mask_secret(identity),
                        failed_attempts = state.failed_attempts,
                        lockout_secs = config.lockout_secs,
                        "Account locked due to too many failed attempts"
                    );
                }
                if debug {
                    info!(
                        account = %mask_secret(identity),
                        failed_attempts = state.failed_attempts,
                        max_attempts = config.max_attempts,
                        locked_until = state.locked_until,
                        locked,
                        "Recorded failed attempt"
                    );
                }
                locked
            }
            Err(e) => {
                error!(
                    account = %mask_secret(identity),
                    error = %e,
                    "Lockout store failure, failed attempt not recorded"
                );
                false
            }
        }
    }

    async fn apply_failure(
        &self,
        store: &dyn KvStore,
        key: &str,
        config: &LockoutConfig,
    ) -> Result<LockoutState, StoreError> {
        let now = self.clock.now_millis();

        let mut state = match load_record::<LockoutState>(store, key).await? {
            Some(state) if !state.lock_expired_at(now) => LockoutState {
                // 锁定期间的失败继续累加，不做截断
                failed_attempts: state.failed_attempts.saturating_add(1),
                last_failure: now,
                locked_until: state.locked_until,
            },
            _ => LockoutState::first_failure(now),
        };

        if state.failed_attempts >= config.max_attempts {
            let until = now.saturating_add(config.lockout_millis());
            state.locked_until = Some(state.locked_until.map_or(until, |prev| prev.max(until)));
        }

        save_record(store, key, &state, config.record_ttl_secs()).await?;
        Ok(state)
    }

    /// 认证成功后清除失败记录
    pub async fn clear_on_success(&self, identity: &str, debug: bool) {
        let Some(store) = self.store.as_deref() else {
            return;
        };

        let key = lockout_key(identity);
        match store.delete(&key).await {
            Ok(()) => {
                if debug {
                    info!(account = %mask_secret(identity), "Lockout state cleared");
                }
            }
            Err(e) => {
                error!(
                    account = %mask_secret(identity),
                    error = %e,
                    "Failed to clear lockout state"
                );
            }
        }
    }
}
