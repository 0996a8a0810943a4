use std::sync::Arc;

use config::Config;
use egress::EgressPool;
use forward::Forwarder;
use redis::Client as RedisClient;
use sqlx::PgPool;

pub mod cache;
pub mod config;
pub mod database;
pub mod egress;
pub mod error;
pub mod forward;
pub mod middleware;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub redis: Arc<RedisClient>,
    pub egress: Arc<EgressPool>,
    pub forwarder: Arc<Forwarder>,
}
