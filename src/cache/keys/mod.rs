/// 缓存键模块
/// 提供各种缓存键生成函数

// webhook 相关缓存键模块
pub mod webhook_keys;

// 重新导出常用的键生成函数
pub use webhook_keys::{dead_webhook_key, rate_limit_key};
