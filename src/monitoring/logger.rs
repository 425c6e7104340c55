use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, MonitoringConfig};

pub fn init_logging(config: &MonitoringConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match config.log_format {
        LogFormat::Json => builder
            .json()
            .with_file(true)
            .with_line_number(true)
            .try_init(),
        LogFormat::Pretty => builder.try_init(),
    };

    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
