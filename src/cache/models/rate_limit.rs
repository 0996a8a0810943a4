/// 限流窗口统计结果
/// 由限流缓存操作返回，count 为当前窗口已放行的请求数
#[derive(Debug, Clone, Copy)]
pub struct RateLimitWindow {
    pub count: i64,
    /// 距当前窗口重置的毫秒数
    pub reset_after_ms: i64,
}
