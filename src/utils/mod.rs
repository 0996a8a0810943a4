use axum::http::HeaderMap;
use serde_json::Value;

// 上游 API 的数字错误码，校验结果与上游约定保持一致
pub mod error_codes {
    /// 空消息（content 或 embeds 为空）
    pub const EMPTY_MESSAGE: i32 = 50006;
    /// 请求体不是合法 JSON
    pub const INVALID_JSON: i32 = 50109;
}

/// 将请求/响应头转换为 JSON 对象，用于失败请求的调试快照
/// 同名的头只保留最后一个值
pub fn headers_to_json(headers: &HeaderMap) -> Value {
    let map = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
            )
        })
        .collect::<serde_json::Map<String, Value>>();

    Value::Object(map)
}
