//! Users API - REST server for the in-memory user directory

use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        name_policy = %config.directory.name_policy,
        email_reuse = %config.directory.email_reuse,
        "Starting {} v{}",
        config.app.name,
        config.app.version
    );

    let app = api::router(&config)?;

    axum_helpers::create_app(app, &config.server)
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Users API shutdown complete");
    Ok(())
}
