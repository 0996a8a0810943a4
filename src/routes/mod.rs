pub mod stats;
pub mod webhook;
