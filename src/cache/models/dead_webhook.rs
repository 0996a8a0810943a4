use serde::{Deserialize, Serialize};

/// 失效 webhook 负缓存数据模型
/// 仅在上游返回 404 时写入，之后对该 webhook 的请求直接回放缓存内容
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CachedDeadWebhook {
    pub webhook_id: String,
    /// 上游返回的状态码（当前只会是 404）
    pub status: u16,
    /// 上游 404 响应体原文
    pub body: String,
    pub cached_at: i64, // Unix timestamp
}
