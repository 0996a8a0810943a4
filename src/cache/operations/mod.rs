/// 缓存操作
/// 提供缓存操作的功能实现

// 失效 webhook 负缓存操作
pub mod dead_webhook;

// 限流窗口计数操作
pub mod rate_limit;

// 重新导出常用操作
pub use dead_webhook::DeadWebhookCacheOperations;
pub use rate_limit::RateLimitCacheOperations;
