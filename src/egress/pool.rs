use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::http::{HeaderMap, HeaderValue};
use if_addrs::IfAddr;
use reqwest::Client;

/// 出站请求携带的代理标识头
const VIA_HEADER_VALUE: &str = concat!("1.1 webhook-proxy/", env!("CARGO_PKG_VERSION"));

#[derive(Debug)]
pub enum EgressPoolError {
    /// 本机没有可用的非回环 IPv4 地址
    NoAddresses,
    Io(std::io::Error),
    Client(reqwest::Error),
}

/// 出口地址池
/// 每个本机 IPv4 地址对应一个绑定了该源地址的 HTTP 客户端，
/// next() 以严格轮询顺序选取客户端
pub struct EgressPool {
    clients: Vec<Client>,
    addrs: Vec<Ipv4Addr>,
    cursor: AtomicUsize,
}

impl EgressPool {
    /// 发现本机全部非回环 IPv4 地址并构建地址池
    pub fn discover(timeout: Duration) -> Result<Self, EgressPoolError> {
        let addrs: Vec<Ipv4Addr> = if_addrs::get_if_addrs()
            .map_err(EgressPoolError::Io)?
            .into_iter()
            .filter(|iface| !iface.is_loopback())
            .filter_map(|iface| match iface.addr {
                IfAddr::V4(v4) => Some(v4.ip),
                IfAddr::V6(_) => None,
            })
            .collect();

        Self::from_addrs(addrs, timeout)
    }

    /// 用给定地址构建地址池，地址列表为空时立即失败
    /// 不过滤回环地址，测试可传入 127.0.0.1
    pub fn from_addrs(addrs: Vec<Ipv4Addr>, timeout: Duration) -> Result<Self, EgressPoolError> {
        if addrs.is_empty() {
            return Err(EgressPoolError::NoAddresses);
        }

        let mut headers = HeaderMap::new();
        headers.insert("via", HeaderValue::from_static(VIA_HEADER_VALUE));

        let mut clients = Vec::with_capacity(addrs.len());
        for addr in &addrs {
            let client = Client::builder()
                .local_address(IpAddr::V4(*addr))
                .default_headers(headers.clone())
                .timeout(timeout)
                .build()
                .map_err(EgressPoolError::Client)?;
            clients.push(client);
        }

        Ok(Self {
            clients,
            addrs,
            cursor: AtomicUsize::new(0),
        })
    }

    /// 返回下一个出站客户端
    pub fn next(&self) -> &Client {
        &self.clients[self.advance()]
    }

    /// 原子地推进游标并返回本次使用的下标
    /// 单调递增取模保证每个地址按严格循环顺序使用
    fn advance(&self) -> usize {
        self.cursor.fetch_add(1, Ordering::Relaxed) % self.clients.len()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn addrs(&self) -> &[Ipv4Addr] {
        &self.addrs
    }
}
