//! HTTP server startup

use tracing::info;

use crate::config::Config;
use crate::email::EmailService;
use crate::routes::{router, AppState};

/// Start the web server and block until it exits.
pub async fn serve(
    config: Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> anyhow::Result<()> {
    config.warn_if_dev_secret();

    let host = host_override.unwrap_or_else(|| config.server.host.clone());
    let port = port_override.unwrap_or(config.server.port);

    let pool = crate::db::create_pool(&config.database.url, config.database.max_connections).await?;

    let email = EmailService::new(&config.email)?;

    let state = AppState {
        pool,
        config,
        email,
    };

    let app = router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
