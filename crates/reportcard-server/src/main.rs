//! Report Card Server - Main entry point

use anyhow::Result;
use reportcard_common::logging::{init_logging, LogConfig};
use tracing::info;

use reportcard_server::{api, config::Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Defaults for this binary, then environment variables on top
    let log_config = LogConfig::builder()
        .log_file_prefix("reportcard-server")
        .filter_directives("reportcard_server=debug,tower_http=debug,sqlx=warn")
        .build()
        .merge_env()?;

    let _guard = init_logging(&log_config)?;

    info!("Starting report card server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    api::serve(config).await
}
