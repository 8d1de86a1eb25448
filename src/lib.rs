pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod query;
pub mod rate_limit;
pub mod score;
pub mod stats;

pub use client::{ClientOptions, StatsClient};
pub use config::Config;
pub use error::Error;
