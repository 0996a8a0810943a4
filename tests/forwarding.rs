//! 上游转发集成测试
//! 所有用例只依赖回环地址上的模拟上游，不需要外部服务

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Bytes,
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, Method, StatusCode},
    routing::{get, patch, post},
};
use tokio::sync::Mutex;

use webhook_proxy::egress::EgressPool;
use webhook_proxy::forward::{ForwardOutcome, Forwarder};

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(5);

type SharedHeaders = Arc<Mutex<Option<HeaderMap>>>;

/// 在回环地址上启动模拟上游，返回监听地址
async fn spawn_upstream(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn loopback_pool() -> EgressPool {
    EgressPool::from_addrs(vec![Ipv4Addr::LOCALHOST], UPSTREAM_TIMEOUT).unwrap()
}

#[tokio::test]
async fn test_forwards_body_and_headers_verbatim() {
    let seen: SharedHeaders = Arc::new(Mutex::new(None));

    // 模拟上游原样回显请求体，同时记下收到的请求头
    let app = Router::new()
        .route(
            "/api/webhooks/{webhook_id}/{webhook_token}",
            post(
                |State(seen): State<SharedHeaders>, headers: HeaderMap, body: Bytes| async move {
                    *seen.lock().await = Some(headers);
                    body
                },
            ),
        )
        .with_state(seen.clone());

    let addr = spawn_upstream(app).await;
    let pool = loopback_pool();
    let forwarder = Forwarder::new(&format!("http://{}", addr));

    let payload = Bytes::from_static(br#"{"content":"hello"}"#);
    let outcome = forwarder
        .dispatch(
            &pool,
            Method::POST,
            "123",
            "token-abc",
            None,
            Some(payload.clone()),
        )
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.body, payload, "request body should pass through untouched");

    let headers = seen.lock().await.take().expect("upstream saw no request");
    let via = headers
        .get("via")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(
        via.starts_with("1.1 webhook-proxy/"),
        "outbound requests should carry the proxy Via tag, got {:?}",
        via
    );
    assert_eq!(
        headers.get("content-type").and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
}

#[tokio::test]
async fn test_relays_status_and_body_byte_for_byte() {
    async fn canned(Path((webhook_id, _token)): Path<(String, String)>) -> (StatusCode, &'static str) {
        match webhook_id.as_str() {
            "gone" => (
                StatusCode::NOT_FOUND,
                r#"{"message": "Unknown Webhook", "code": 10015}"#,
            ),
            "boom" => (
                StatusCode::INTERNAL_SERVER_ERROR,
                r#"{"message": "Internal Server Error"}"#,
            ),
            _ => (StatusCode::OK, r#"{"id": "1", "channel_id": "2"}"#),
        }
    }

    let app = Router::new().route("/api/webhooks/{webhook_id}/{webhook_token}", get(canned));
    let addr = spawn_upstream(app).await;
    let pool = loopback_pool();
    let forwarder = Forwarder::new(&format!("http://{}", addr));

    let ok = forwarder
        .dispatch(&pool, Method::GET, "fine", "t", None, None)
        .await
        .unwrap();
    assert!(ok.is_success());
    assert_eq!(ok.body.as_ref(), br#"{"id": "1", "channel_id": "2"}"#);

    let gone = forwarder
        .dispatch(&pool, Method::GET, "gone", "t", None, None)
        .await
        .unwrap();
    assert!(gone.is_not_found());
    assert_eq!(
        gone.body.as_ref(),
        br#"{"message": "Unknown Webhook", "code": 10015}"#
    );

    let boom = forwarder
        .dispatch(&pool, Method::GET, "boom", "t", None, None)
        .await
        .unwrap();
    assert_eq!(boom.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(boom.body.as_ref(), br#"{"message": "Internal Server Error"}"#);
}

#[tokio::test]
async fn test_message_routes_hit_message_url() {
    async fn edit(Path((_, _, message_id)): Path<(String, String, String)>) -> String {
        format!(r#"{{"id": "{}"}}"#, message_id)
    }

    let app = Router::new().route(
        "/api/webhooks/{webhook_id}/{webhook_token}/messages/{message_id}",
        patch(edit),
    );
    let addr = spawn_upstream(app).await;
    let pool = loopback_pool();
    let forwarder = Forwarder::new(&format!("http://{}", addr));

    let outcome = forwarder
        .dispatch(
            &pool,
            Method::PATCH,
            "123",
            "token-abc",
            Some("987"),
            Some(Bytes::from_static(br#"{"content":"edited"}"#)),
        )
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.body.as_ref(), br#"{"id": "987"}"#);
}

#[tokio::test]
async fn test_transport_failure_synthesizes_502() {
    // 拿到一个刚释放的端口，向它转发必然连接失败
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let pool = loopback_pool();
    let forwarder = Forwarder::new(&format!("http://{}", addr));

    let err = forwarder
        .dispatch(
            &pool,
            Method::POST,
            "123",
            "t",
            None,
            Some(Bytes::from_static(b"{}")),
        )
        .await
        .expect_err("dispatch to a closed port should fail");
    let outcome = ForwardOutcome::transport_failure(&err);

    assert_eq!(outcome.status, StatusCode::BAD_GATEWAY);
    assert!(outcome.headers.is_empty(), "synthesized responses carry no upstream headers");

    // 合成响应体必须带上传输错误原文，日志快照才能留下失败原因
    let body: serde_json::Value = serde_json::from_slice(&outcome.body).unwrap();
    assert_eq!(body["message"], "Bad Gateway");
    assert_eq!(body["error"], err.to_string().as_str());
}

#[tokio::test]
async fn test_requests_rotate_across_egress_addresses() {
    let seen: Arc<Mutex<Vec<IpAddr>>> = Arc::new(Mutex::new(Vec::new()));

    // 模拟上游记录每个请求的来源地址
    let app = Router::new()
        .route(
            "/api/webhooks/{webhook_id}/{webhook_token}",
            get(
                |State(seen): State<Arc<Mutex<Vec<IpAddr>>>>,
                 ConnectInfo(peer): ConnectInfo<SocketAddr>| async move {
                    seen.lock().await.push(peer.ip());
                    r#"{"id": "1"}"#
                },
            ),
        )
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    // 回环网段内的两个不同源地址
    let pool = EgressPool::from_addrs(
        vec![Ipv4Addr::new(127, 0, 0, 1), Ipv4Addr::new(127, 0, 0, 2)],
        UPSTREAM_TIMEOUT,
    )
    .unwrap();
    let forwarder = Forwarder::new(&format!("http://{}", addr));

    for _ in 0..4 {
        let outcome = forwarder
            .dispatch(&pool, Method::GET, "123", "t", None, None)
            .await
            .unwrap();
        assert!(outcome.is_success());
    }

    let seen = seen.lock().await;
    let from_first = seen
        .iter()
        .filter(|ip| **ip == IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)))
        .count();
    let from_second = seen
        .iter()
        .filter(|ip| **ip == IpAddr::V4(Ipv4Addr::new(127, 0, 0, 2)))
        .count();
    assert_eq!(from_first, 2, "half the requests should leave from the first address");
    assert_eq!(from_second, 2, "half the requests should leave from the second address");
}
