use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode, header};
use serde_json::json;

use crate::egress::EgressPool;

/// 一次上游转发的结果，状态、响应头和响应体原样保留
#[derive(Debug)]
pub struct ForwardOutcome {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ForwardOutcome {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    /// 上游连接失败时合成 502 响应
    /// 传输错误原文放进响应体，失败日志的调试快照里也就留有失败原因
    pub fn transport_failure(err: &reqwest::Error) -> Self {
        tracing::error!("Upstream request failed: {}", err);
        let body = json!({
            "message": "Bad Gateway",
            "error": err.to_string(),
        })
        .to_string();
        Self {
            status: StatusCode::BAD_GATEWAY,
            headers: HeaderMap::new(),
            body: Bytes::from(body),
        }
    }
}

/// 上游转发器，按 webhook 路径拼接目标地址并通过出口池发送
#[derive(Debug, Clone)]
pub struct Forwarder {
    upstream_url: String,
}

impl Forwarder {
    pub fn new(upstream_url: &str) -> Self {
        Self {
            upstream_url: upstream_url.trim_end_matches('/').to_string(),
        }
    }

    /// 拼接上游 webhook 地址，message_id 存在时指向单条消息
    pub fn upstream_url(
        &self,
        webhook_id: &str,
        webhook_token: &str,
        message_id: Option<&str>,
    ) -> String {
        let mut url = format!(
            "{}/api/webhooks/{}/{}",
            self.upstream_url, webhook_id, webhook_token
        );
        if let Some(message_id) = message_id {
            url.push_str("/messages/");
            url.push_str(message_id);
        }
        url
    }

    /// 发送请求并完整读取响应，连接层错误通过 Err 返回由调用方合成 502
    pub async fn dispatch(
        &self,
        egress: &EgressPool,
        method: Method,
        webhook_id: &str,
        webhook_token: &str,
        message_id: Option<&str>,
        body: Option<Bytes>,
    ) -> Result<ForwardOutcome, reqwest::Error> {
        let url = self.upstream_url(webhook_id, webhook_token, message_id);
        let client = egress.next();

        let mut request = client.request(method, &url);
        if let Some(bytes) = body {
            request = request
                .header(header::CONTENT_TYPE, "application/json")
                .body(bytes);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(ForwardOutcome {
            status,
            headers,
            body,
        })
    }
}
