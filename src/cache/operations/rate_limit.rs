use redis::{AsyncCommands, Client as RedisClient};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::keys::rate_limit_key;
use crate::cache::models::rate_limit::RateLimitWindow;

/// 限流窗口计数操作
pub struct RateLimitCacheOperations;

impl RateLimitCacheOperations {
    /// 在当前窗口内为 webhook 记一次请求，返回计数与窗口剩余毫秒数
    pub async fn count_request(
        redis: &Arc<RedisClient>,
        webhook_id: &str,
        window: Duration,
    ) -> Result<RateLimitWindow, redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let key = rate_limit_key(webhook_id);

        // 使用 Redis 的 INCR 和 EXPIRE 命令实现窗口计数器
        let count: i64 = conn.incr(&key, 1).await?;

        if count == 1 {
            // 窗口内第一次请求，设置过期时间
            let _: () = conn.expire(&key, window.as_secs() as i64).await?;
        }

        let mut reset_after_ms: i64 = conn.pttl(&key).await?;
        if reset_after_ms < 0 {
            // 键没有过期时间（INCR 与 EXPIRE 之间曾被中断），补设完整窗口
            let _: () = conn.expire(&key, window.as_secs() as i64).await?;
            reset_after_ms = window.as_millis() as i64;
        }

        Ok(RateLimitWindow {
            count,
            reset_after_ms,
        })
    }
}
