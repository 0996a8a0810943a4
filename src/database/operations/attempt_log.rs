use sqlx::{Error as SqlxError, PgPool};
use uuid::Uuid;

use crate::database::models::attempt_log::NewAttemptLog;

/// 转发尝试日志操作，日志只追加、写入后不再修改
pub struct AttemptLogOperation;

impl AttemptLogOperation {
    /// 写入一条转发尝试日志，返回生成的日志 ID
    pub async fn record(pool: &PgPool, log: &NewAttemptLog) -> Result<String, SqlxError> {
        let log_id = Uuid::new_v4().to_string();

        let (request_headers, request_body, response_headers, response_body) = match &log.debug {
            Some(debug) => (
                Some(debug.request_headers.as_str()),
                Some(debug.request_body.as_str()),
                Some(debug.response_headers.as_str()),
                Some(debug.response_body.as_str()),
            ),
            None => (None, None, None, None),
        };

        sqlx::query(
            r#"
            INSERT INTO attempt_logs
                (log_id, webhook_id, method, status,
                 request_headers, request_body, response_headers, response_body, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            "#,
        )
        .bind(&log_id)
        .bind(&log.webhook_id)
        .bind(&log.method)
        .bind(log.status)
        .bind(request_headers)
        .bind(request_body)
        .bind(response_headers)
        .bind(response_body)
        .execute(pool)
        .await?;

        Ok(log_id)
    }
}
