mod error_handler;
mod rate_limit;

pub use error_handler::log_failures;
pub use rate_limit::{RateLimiter, rate_limit};
