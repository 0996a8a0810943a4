use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::{error, warn};

/// 记录转发失败的请求，响应体是透传内容且可能很大，这里只看状态行和请求头
pub async fn log_failures(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let status = response.status();
    if status.is_server_error() || status.is_client_error() {
        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        if status.is_server_error() {
            error!(
                "Request failed - {} {} -> {} (request id: {})",
                method, path, status, request_id
            );
        } else {
            warn!(
                "Request rejected - {} {} -> {} (request id: {})",
                method, path, status, request_id
            );
        }
    }

    response
}
