// 数据库操作实现

// 转发尝试日志操作
pub mod attempt_log;

// webhook 统计操作
pub mod webhook;

// 重新导出常用操作
pub use attempt_log::AttemptLogOperation;
pub use webhook::WebhookOperation;
