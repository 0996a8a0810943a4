// 转发模块
// 负责请求体校验、上游 URL 构造与上游调用

pub mod forwarder;
pub mod validate;

pub use forwarder::{ForwardOutcome, Forwarder};
pub use validate::validate_payload;
