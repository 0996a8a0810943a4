// 出口地址池模块
// 将出站请求分摊到本机全部非回环 IPv4 地址上

pub mod pool;

pub use pool::{EgressPool, EgressPoolError};
