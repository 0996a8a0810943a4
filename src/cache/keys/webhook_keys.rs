/// 限流窗口计数缓存键前缀
const RATE_LIMIT_PREFIX: &str = "rate_limit:";

/// 失效 webhook 负缓存键前缀
const DEAD_WEBHOOK_PREFIX: &str = "dead_webhook:";

/// 生成限流窗口计数缓存键
pub fn rate_limit_key(webhook_id: &str) -> String {
    format!("{}{}", RATE_LIMIT_PREFIX, webhook_id)
}

/// 生成失效 webhook 负缓存键
pub fn dead_webhook_key(webhook_id: &str) -> String {
    format!("{}{}", DEAD_WEBHOOK_PREFIX, webhook_id)
}
