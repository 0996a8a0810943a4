use redis::{AsyncCommands, Client as RedisClient};
use std::sync::Arc;

use crate::cache::keys::dead_webhook_key;
use crate::cache::models::dead_webhook::CachedDeadWebhook;

/// 失效 webhook 负缓存操作
pub struct DeadWebhookCacheOperations;

impl DeadWebhookCacheOperations {
    /// 查询 webhook 是否已被记录为失效
    pub async fn lookup(
        redis: &Arc<RedisClient>,
        webhook_id: &str,
    ) -> Result<Option<CachedDeadWebhook>, redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let key = dead_webhook_key(webhook_id);
        let result: Option<String> = conn.get(key).await?;

        match result {
            Some(json) => {
                let cached = serde_json::from_str(&json).map_err(|e| {
                    redis::RedisError::from((
                        redis::ErrorKind::IoError,
                        "反序列化错误",
                        e.to_string(),
                    ))
                })?;
                Ok(Some(cached))
            }
            None => Ok(None),
        }
    }

    /// 记录一个已失效的 webhook，覆盖旧条目
    /// 不设置过期时间，条目永久生效
    pub async fn record(
        redis: &Arc<RedisClient>,
        webhook_id: &str,
        status: u16,
        body: &str,
    ) -> Result<(), redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let cached = CachedDeadWebhook {
            webhook_id: webhook_id.to_string(),
            status,
            body: body.to_string(),
            cached_at: chrono::Utc::now().timestamp(),
        };

        let key = dead_webhook_key(webhook_id);
        let json = serde_json::to_string(&cached).map_err(|e| {
            redis::RedisError::from((redis::ErrorKind::IoError, "序列化错误", e.to_string()))
        })?;

        let _: () = conn.set(key, json).await?;

        Ok(())
    }
}
