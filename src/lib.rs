pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod seed;
pub mod services;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;
pub use dashboard::{AdminDashboard, View};
pub use error::{AdminError, ServiceError};

use tracing_subscriber::EnvFilter;

/// Log to stderr; `RUST_LOG` overrides the configured level
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
