use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CacheConfig, LockoutConfig, RateLimitConfig};
use crate::error::ConfigError;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// 未配置时以"安全防护关闭"模式运行
    pub redis_url: Option<String>,
    pub server_host: String,
    pub server_port: u16,
    pub rate_limit_window_secs: u64,
    pub rate_limit_requests: u32,
    pub lockout_max_attempts: u32,
    pub lockout_duration_secs: u64,
    pub balance_cache_prefix: String,
    pub balance_cache_ttl_secs: u64,
    pub store_timeout_ms: u64,
    /// 仅在可信反向代理之后开启，否则 X-Real-IP / X-Forwarded-For 可被客户端伪造
    pub trust_proxy_headers: bool,
    pub security_debug: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源构建配置，缺省项使用默认值，无法解析的值直接报错
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Config {
            redis_url: lookup("REDIS_URL")
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            server_port: parse_or(&lookup, "SERVER_PORT", 3000)?,
            rate_limit_window_secs: parse_secs_or(&lookup, "RATE_LIMIT_WINDOW", 60)?,
            rate_limit_requests: parse_or(&lookup, "RATE_LIMIT_REQUESTS", 100)?,
            lockout_max_attempts: parse_or(&lookup, "LOCKOUT_MAX_ATTEMPTS", 5)?,
            lockout_duration_secs: parse_secs_or(&lookup, "LOCKOUT_DURATION", 900)?,
            balance_cache_prefix: lookup("BALANCE_CACHE_PREFIX")
                .unwrap_or_else(|| "balance".into()),
            balance_cache_ttl_secs: parse_secs_or(&lookup, "BALANCE_CACHE_TTL", 60)?,
            store_timeout_ms: parse_or(&lookup, "STORE_TIMEOUT_MS", 500)?,
            trust_proxy_headers: parse_flag(&lookup, "TRUST_PROXY_HEADERS")?,
            security_debug: parse_flag(&lookup, "SECURITY_DEBUG")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rate_limit().validate()?;
        self.lockout().validate()?;
        self.balance_cache().validate()?;
        if self.store_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "STORE_TIMEOUT_MS",
                "timeout must be positive",
            ));
        }
        Ok(())
    }

    pub fn security_enabled(&self) -> bool {
        self.redis_url.is_some()
    }

    pub fn rate_limit(&self) -> RateLimitConfig {
        RateLimitConfig {
            max_requests: self.rate_limit_requests,
            window_secs: self.rate_limit_window_secs,
        }
    }

    pub fn lockout(&self) -> LockoutConfig {
        LockoutConfig {
            max_attempts: self.lockout_max_attempts,
            lockout_secs: self.lockout_duration_secs,
        }
    }

    pub fn balance_cache(&self) -> CacheConfig {
        CacheConfig {
            prefix: self.balance_cache_prefix.clone(),
            freshness_secs: self.balance_cache_ttl_secs,
        }
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(key, e.to_string())),
        None => Ok(default),
    }
}

/// 秒数，允许带 `s` 后缀，如 `60s`
fn parse_secs_or<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .trim_end_matches('s')
            .parse()
            .map_err(|e: std::num::ParseIntError| ConfigError::invalid(key, e.to_string())),
        None => Ok(default),
    }
}

fn parse_flag<F>(lookup: &F, key: &'static str) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" || v.eq_ignore_ascii_case("yes") => {
            Ok(true)
        }
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" || v.eq_ignore_ascii_case("no") => {
            Ok(false)
        }
        Some(v) => Err(ConfigError::invalid(key, format!("not a boolean: {v}"))),
    }
}
