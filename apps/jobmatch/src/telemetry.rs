use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Installs the global structured-logging subscriber using `config.rust_log`.
pub fn init_tracing(config: &Config) -> Result<()> {
    tracing_subscriber::registry()
        .with(log_filter(config)?)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    tracing::info!("jobmatch v{} tracing initialized", env!("CARGO_PKG_VERSION"));
    Ok(())
}

fn log_filter(config: &Config) -> Result<EnvFilter> {
    EnvFilter::try_new(&config.rust_log)
        .with_context(|| format!("Invalid RUST_LOG directives '{}'", config.rust_log))
}
