// 数据库实体定义

// 转发尝试日志实体
pub mod attempt_log;

// webhook 统计实体
pub mod webhook;

// 重新导出常用类型
pub use attempt_log::{DebugBundle, NewAttemptLog};
pub use webhook::WebhookStats;
