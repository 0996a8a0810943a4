use serde::Serialize;
use sqlx::FromRow;

/// webhook 聚合统计，对应统计页的展示数据
#[derive(Debug, Serialize, FromRow)]
pub struct WebhookStats {
    /// 出现过的 webhook 数量
    pub webhook_count: i64,
    /// 转发尝试总数
    pub delivery_total: i64,
}
