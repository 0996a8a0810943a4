use sqlx::{Error as SqlxError, PgPool};

use crate::database::models::webhook::WebhookStats;

/// webhook 使用统计操作，处理 webhooks 表的所有数据库操作
pub struct WebhookOperation;

impl WebhookOperation {
    /// 为 webhook 的投递计数加一，首次出现时插入新行
    pub async fn increment_delivery(pool: &PgPool, webhook_id: &str) -> Result<(), SqlxError> {
        sqlx::query(
            r#"
            INSERT INTO webhooks (webhook_id, delivery_count, first_seen_at, last_delivery_at)
            VALUES ($1, 1, NOW(), NOW())
            ON CONFLICT (webhook_id) DO UPDATE
            SET delivery_count = webhooks.delivery_count + 1,
                last_delivery_at = NOW()
            "#,
        )
        .bind(webhook_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// 统计页聚合数据：webhook 总数与投递总数
    pub async fn stats(pool: &PgPool) -> Result<WebhookStats, SqlxError> {
        sqlx::query_as::<_, WebhookStats>(
            r#"
            SELECT
                COUNT(*) AS webhook_count,
                COALESCE(SUM(delivery_count), 0)::BIGINT AS delivery_total
            FROM webhooks
            "#,
        )
        .fetch_one(pool)
        .await
    }
}
