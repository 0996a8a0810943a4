use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::{
    cache::operations::rate_limit::RateLimitCacheOperations,
    config::Config,
    error::ProxyError,
};

#[derive(Clone)]
pub struct RateLimiter {
    redis: Arc<redis::Client>,
    config: Arc<Config>,
}

impl RateLimiter {
    pub fn new(redis: redis::Client, config: Config) -> Self {
        Self {
            redis: Arc::new(redis),
            config: Arc::new(config),
        }
    }

    pub async fn check_rate_limit(
        self: Arc<Self>,
        req: Request<Body>,
        next: Next,
    ) -> Result<Response, ProxyError> {
        // 限流按目标 webhook 计数而不是按来源 IP，多实例共用同一份 Redis 计数
        let Some(webhook_id) = webhook_id_from_path(req.uri().path()).map(str::to_string) else {
            return Ok(next.run(req).await);
        };

        let window = RateLimitCacheOperations::count_request(
            &self.redis,
            &webhook_id,
            self.config.rate_limit_window(),
        )
        .await?;

        if window.count > self.config.rate_limit_requests as i64 {
            tracing::warn!(
                "Rate limit exceeded for webhook {}: {} requests in current window",
                webhook_id,
                window.count
            );
            return Err(ProxyError::RateLimited {
                retry_after_ms: window.reset_after_ms,
            });
        }

        Ok(next.run(req).await)
    }
}

/// 从请求路径中提取 webhook id，路径形如 /api/webhooks/{id}/{token}[/messages/{mid}]
fn webhook_id_from_path(path: &str) -> Option<&str> {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    segments.find(|segment| *segment == "webhooks")?;
    segments.next()
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ProxyError> {
    limiter.check_rate_limit(req, next).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_id_from_path() {
        assert_eq!(
            webhook_id_from_path("/api/webhooks/123456/token-abc"),
            Some("123456")
        );
        assert_eq!(
            webhook_id_from_path("/api/webhooks/123456/token-abc/messages/789"),
            Some("123456")
        );
    }

    #[test]
    fn test_webhook_id_missing() {
        assert_eq!(webhook_id_from_path("/"), None);
        assert_eq!(webhook_id_from_path("/api/webhooks"), None);
        assert_eq!(webhook_id_from_path("/api/other/123"), None);
    }
}
