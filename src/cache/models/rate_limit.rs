use serde::{Deserialize, Serialize};

/// 限流窗口
///
/// `count` 只会在新窗口重置为 1 或在同一窗口内加 1。
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RateWindow {
    pub count: u32,
    pub window_start: i64, // 毫秒时间戳
}

impl RateWindow {
    pub fn start(now: i64) -> Self {
        Self {
            count: 1,
            window_start: now,
        }
    }

    /// 窗口起点在未来（时钟偏差或脏数据）也按过期处理
    pub fn is_expired(&self, now: i64, window_secs: u64) -> bool {
        self.window_start > now
            || now.saturating_sub(self.window_start) > (window_secs as i64).saturating_mul(1000)
    }
}
