use axum::{
    body::Bytes,
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::AppState;
use crate::cache::models::dead_webhook::CachedDeadWebhook;
use crate::cache::operations::dead_webhook::DeadWebhookCacheOperations;
use crate::database::models::attempt_log::{DebugBundle, NewAttemptLog};
use crate::database::operations::attempt_log::AttemptLogOperation;
use crate::database::operations::webhook::WebhookOperation;
use crate::error::ProxyError;
use crate::forward::{ForwardOutcome, validate_payload};

/// webhook 转发管线
/// 单次请求内的步骤顺序固定：负缓存查询 → 请求体校验 → 上游分发 →
/// 尝试日志写入 → 404 负缓存更新 → 投递计数（后台） → 回放上游响应
pub struct WebhookRelay;

impl WebhookRelay {
    pub async fn relay(
        state: &AppState,
        method: Method,
        webhook_id: &str,
        webhook_token: &str,
        message_id: Option<&str>,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<Response, ProxyError> {
        // 已知失效的 webhook 直接回放缓存的上游响应，不再访问上游
        if let Some(cached) = DeadWebhookCacheOperations::lookup(&state.redis, webhook_id).await? {
            tracing::debug!(
                "Replaying cached response for dead webhook {} (status {})",
                webhook_id,
                cached.status
            );
            return Ok(Self::replay_cached(&cached));
        }

        // POST/PATCH 必须带合法请求体，DELETE 只在带请求体时校验
        let send_body = if method == Method::POST || method == Method::PATCH {
            validate_payload(headers, &body)?;
            Some(body.clone())
        } else if method == Method::DELETE && !body.is_empty() {
            validate_payload(headers, &body)?;
            Some(body.clone())
        } else {
            None
        };

        // 上游分发；连接层失败合成 502，走同一条日志与回放路径
        let outcome = match state
            .forwarder
            .dispatch(
                &state.egress,
                method.clone(),
                webhook_id,
                webhook_token,
                message_id,
                send_body.clone(),
            )
            .await
        {
            Ok(outcome) => outcome,
            Err(err) => ForwardOutcome::transport_failure(&err),
        };

        // 每次转发尝试记一行日志，失败时附带完整调试快照
        let log = NewAttemptLog {
            webhook_id: webhook_id.to_string(),
            method: method.to_string(),
            status: outcome.status.as_u16() as i32,
            debug: if outcome.is_success() {
                None
            } else {
                Some(DebugBundle::capture(
                    headers,
                    send_body.as_ref(),
                    &outcome.headers,
                    &outcome.body,
                ))
            },
        };

        let request_id = match AttemptLogOperation::record(&state.pool, &log).await {
            Ok(log_id) => Some(log_id),
            Err(err) => {
                // 日志写入失败不阻断回放，只是响应缺少 X-Request-ID
                tracing::error!("Failed to record attempt log: {}", err);
                None
            }
        };

        // 上游明确返回 404 时记入负缓存，此后同一 webhook 不再访问上游
        if outcome.is_not_found() {
            let body_text = String::from_utf8_lossy(&outcome.body);
            match DeadWebhookCacheOperations::record(
                &state.redis,
                webhook_id,
                outcome.status.as_u16(),
                &body_text,
            )
            .await
            {
                Ok(()) => tracing::info!(
                    "Webhook {} marked dead, future requests served from cache",
                    webhook_id
                ),
                Err(err) => {
                    tracing::error!("Failed to cache dead webhook {}: {}", webhook_id, err)
                }
            }
        }

        // 响应内容已定，投递计数在后台完成，不阻塞回放也不重试
        let pool = state.pool.clone();
        let counted_id = webhook_id.to_string();
        tokio::spawn(async move {
            if let Err(err) = WebhookOperation::increment_delivery(&pool, &counted_id).await {
                tracing::error!("Failed to count delivery for {}: {}", counted_id, err);
            }
        });

        Ok(Self::relay_response(outcome, request_id))
    }

    /// 回放缓存的失效响应，不访问上游也不写日志，因此没有 X-Request-ID
    fn replay_cached(cached: &CachedDeadWebhook) -> Response {
        let status = StatusCode::from_u16(cached.status).unwrap_or(StatusCode::NOT_FOUND);
        (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            cached.body.clone(),
        )
            .into_response()
    }

    /// 将上游响应原样回放给调用方，状态码与响应体逐字节一致
    fn relay_response(outcome: ForwardOutcome, request_id: Option<String>) -> Response {
        let content_type = outcome
            .headers
            .get(header::CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static("application/json"));

        let mut response = (outcome.status, outcome.body).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type);

        if let Some(request_id) = request_id {
            if let Ok(value) = HeaderValue::from_str(&request_id) {
                response.headers_mut().insert("x-request-id", value);
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    fn dead_entry() -> CachedDeadWebhook {
        CachedDeadWebhook {
            webhook_id: "123".to_string(),
            status: 404,
            body: r#"{"message": "Unknown Webhook", "code": 10015}"#.to_string(),
            cached_at: 1700000000,
        }
    }

    #[tokio::test]
    async fn test_replay_cached_returns_stored_status_and_body() {
        let response = WebhookRelay::replay_cached(&dead_entry());

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        // 回放不经过日志写入，响应没有 X-Request-ID
        assert!(response.headers().get("x-request-id").is_none());

        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(
            body.as_ref(),
            br#"{"message": "Unknown Webhook", "code": 10015}"#
        );
    }

    #[tokio::test]
    async fn test_relay_response_keeps_upstream_body_and_tags_request_id() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
        let outcome = ForwardOutcome {
            status: StatusCode::OK,
            headers,
            body: Bytes::from_static(b"<p>ok</p>"),
        };

        let response = WebhookRelay::relay_response(outcome, Some("log-1".to_string()));

        assert_eq!(response.status(), StatusCode::OK);
        // 上游给了 Content-Type 就原样转回
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("text/html")
        );
        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("log-1")
        );

        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(body.as_ref(), b"<p>ok</p>");
    }

    #[tokio::test]
    async fn test_relay_response_defaults_content_type_without_request_id() {
        let outcome = ForwardOutcome {
            status: StatusCode::BAD_GATEWAY,
            headers: HeaderMap::new(),
            body: Bytes::from_static(b"{}"),
        };

        // 日志写入失败时 request_id 为 None，响应省略 X-Request-ID
        let response = WebhookRelay::relay_response(outcome, None);

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        assert!(response.headers().get("x-request-id").is_none());
    }
}
