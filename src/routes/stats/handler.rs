use axum::{extract::State, response::Html};

use crate::AppState;
use crate::database::operations::webhook::WebhookOperation;
use crate::error::ProxyError;

/// 首页统计：已见过的 webhook 数量与转发总次数
#[axum::debug_handler]
pub async fn stats_page(State(state): State<AppState>) -> Result<Html<String>, ProxyError> {
    let stats = WebhookOperation::stats(&state.pool).await?;
    Ok(Html(render(stats.webhook_count, stats.delivery_total)))
}

fn render(webhook_count: i64, delivery_total: i64) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>webhook-proxy</title>
  <style>
    body {{ font-family: sans-serif; max-width: 40em; margin: 4em auto; color: #222; }}
    .stat {{ font-size: 2em; font-weight: bold; }}
  </style>
</head>
<body>
  <h1>webhook-proxy</h1>
  <p>A forwarding proxy for webhook deliveries.</p>
  <p><span class="stat">{webhook_count}</span> webhooks seen</p>
  <p><span class="stat">{delivery_total}</span> requests forwarded</p>
</body>
</html>
"#
    )
}
