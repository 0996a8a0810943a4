use axum::body::Bytes;
use axum::http::{HeaderMap, header};
use serde_json::Value;

use crate::utils::error_codes;

/// content 字段允许的最大字符数
const MAX_CONTENT_LENGTH: usize = 2000;

/// 请求体校验错误，数字错误码与上游 API 的约定一致
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub code: Option<i32>,
    pub message: String,
}

impl ValidationError {
    fn new(code: Option<i32>, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
        }
    }
}

/// 校验带请求体的转发请求，规则按顺序匹配，命中即返回：
/// 1. Content-Type 缺失或不是 JSON
/// 2. 请求体不是合法 JSON
/// 3. content 存在且为空字符串
/// 4. content 超过 2000 字符
/// 5. embeds 存在且为空数组
/// content 不是字符串、embeds 不是数组时不在本地拦截，交由上游判断
pub fn validate_payload(headers: &HeaderMap, body: &Bytes) -> Result<(), ValidationError> {
    if !has_json_content_type(headers) {
        return Err(ValidationError::new(
            None,
            "Expected \"Content-Type\" header to be \"application/json\".",
        ));
    }

    let payload: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) => {
            return Err(ValidationError::new(
                Some(error_codes::INVALID_JSON),
                "The request body contains invalid JSON.",
            ));
        }
    };

    if let Some(content) = payload.get("content").and_then(Value::as_str) {
        if content.is_empty() {
            return Err(ValidationError::new(
                Some(error_codes::EMPTY_MESSAGE),
                "Cannot send an empty message",
            ));
        }
        if content.chars().count() > MAX_CONTENT_LENGTH {
            return Err(ValidationError::new(
                None,
                "content must be 2000 or fewer in length.",
            ));
        }
    }

    if let Some(embeds) = payload.get("embeds").and_then(Value::as_array) {
        if embeds.is_empty() {
            return Err(ValidationError::new(
                Some(error_codes::EMPTY_MESSAGE),
                "Cannot send an empty message",
            ));
        }
    }

    Ok(())
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .split(';')
                .next()
                .unwrap_or("")
                .trim()
                .eq_ignore_ascii_case("application/json")
        })
        .unwrap_or(false)
}
