/// 限流窗口键前缀
const RATE_LIMIT_PREFIX: &str = "rate:";

/// 登录锁定键前缀
const LOCKOUT_PREFIX: &str = "lockout:";

/// 生成客户端限流窗口键
pub fn rate_limit_key(client_identity: &str) -> String {
    format!("{}{}", RATE_LIMIT_PREFIX, client_identity)
}

/// 生成账号锁定状态键
pub fn lockout_key(account_identity: &str) -> String {
    format!("{}{}", LOCKOUT_PREFIX, account_identity)
}

/// 生成响应缓存键，前缀由缓存配置决定
pub fn response_key(prefix: &str, account_identity: &str) -> String {
    format!("{}:{}", prefix, account_identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_do_not_collide() {
        assert_eq!(rate_limit_key("9.9.9.9"), "rate:9.9.9.9");
        assert_eq!(lockout_key("alice"), "lockout:alice");
        assert_eq!(response_key("balance", "alice"), "balance:alice");
        assert_ne!(lockout_key("alice"), response_key("balance", "alice"));
    }
}
