use sqlx::PgPool;

/// 创建代理所需的全部数据表和索引，使用 IF NOT EXISTS，可重复调用
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    // webhook 使用统计表
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS webhooks (
            webhook_id TEXT PRIMARY KEY,
            delivery_count BIGINT NOT NULL DEFAULT 0,
            first_seen_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            last_delivery_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // 转发尝试日志表，只追加
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS attempt_logs (
            log_id TEXT PRIMARY KEY,
            webhook_id TEXT NOT NULL,
            method TEXT NOT NULL,
            status INT NOT NULL,
            request_headers TEXT,
            request_body TEXT,
            response_headers TEXT,
            response_body TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // 按 webhook 查询日志的索引
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_attempt_logs_webhook_id ON attempt_logs(webhook_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
