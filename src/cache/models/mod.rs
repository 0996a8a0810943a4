/// 缓存数据模型
/// 定义缓存数据的结构体

// 失效 webhook 负缓存模型
pub mod dead_webhook;

// 限流窗口模型
pub mod rate_limit;

// 重新导出常用类型
pub use dead_webhook::CachedDeadWebhook;
pub use rate_limit::RateLimitWindow;
