mod handler;

pub use handler::stats_page;
