use axum::body::Bytes;
use axum::http::HeaderMap;

use crate::utils::headers_to_json;

/// 待写入的转发尝试日志
#[derive(Debug)]
pub struct NewAttemptLog {
    pub webhook_id: String,
    /// HTTP 方法
    pub method: String,
    /// 最终状态码
    pub status: i32,
    /// 仅在最终状态不在 200..300 范围内时填充
    pub debug: Option<DebugBundle>,
}

/// 失败请求的调试快照，失败时四个字段全部填充
#[derive(Debug)]
pub struct DebugBundle {
    pub request_headers: String,
    pub request_body: String,
    pub response_headers: String,
    pub response_body: String,
}

impl DebugBundle {
    /// 从请求与上游响应中截取调试快照
    pub fn capture(
        request_headers: &HeaderMap,
        request_body: Option<&Bytes>,
        response_headers: &HeaderMap,
        response_body: &Bytes,
    ) -> Self {
        Self {
            request_headers: headers_to_json(request_headers).to_string(),
            request_body: request_body
                .map(|b| String::from_utf8_lossy(b).into_owned())
                .unwrap_or_default(),
            response_headers: headers_to_json(response_headers).to_string(),
            response_body: String::from_utf8_lossy(response_body).into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_capture_populates_all_fields() {
        let mut request_headers = HeaderMap::new();
        request_headers.insert("content-type", HeaderValue::from_static("application/json"));
        let request_body = Bytes::from_static(b"{\"content\":\"hi\"}");
        let mut response_headers = HeaderMap::new();
        response_headers.insert("content-type", HeaderValue::from_static("application/json"));
        let response_body = Bytes::from_static(b"{\"message\":\"Unknown Webhook\",\"code\":10015}");

        let bundle = DebugBundle::capture(
            &request_headers,
            Some(&request_body),
            &response_headers,
            &response_body,
        );

        assert!(bundle.request_headers.contains("content-type"));
        assert_eq!(bundle.request_body, "{\"content\":\"hi\"}");
        assert!(bundle.response_headers.contains("application/json"));
        assert!(bundle.response_body.contains("Unknown Webhook"));
    }

    #[test]
    fn test_capture_without_request_body() {
        let bundle = DebugBundle::capture(
            &HeaderMap::new(),
            None,
            &HeaderMap::new(),
            &Bytes::from_static(b"gone"),
        );

        // GET 请求没有请求体，对应字段记为空串
        assert_eq!(bundle.request_body, "");
        assert_eq!(bundle.response_body, "gone");
    }
}
