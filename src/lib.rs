pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod middleware;
pub mod observability;
pub mod queries;
pub mod routes;
pub mod server;

pub use routes::AppState;

/// Create app router for testing
///
/// Builds the Axum router with all routes configured against the given pool,
/// a fixed development config and a mock email service, so integration tests
/// can drive it without starting the full server.
pub async fn create_app(db_pool: sqlx::SqlitePool) -> anyhow::Result<axum::Router> {
    let email_config = config::EmailConfig {
        smtp_host: "localhost".to_string(),
        smtp_port: 1025,
        organizer_emails: vec!["organizer@example.com".to_string()],
        ..config::EmailConfig::default()
    };

    let config = config::Config {
        environment: "development".to_string(),
        server: config::ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        database: config::DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        jwt: config::JwtConfig {
            secret: "test-secret-key-minimum-32-characters!!".to_string(),
        },
        observability: config::ObservabilityConfig::default(),
        email: email_config.clone(),
    };

    let state = AppState {
        pool: db_pool,
        config,
        email: email::EmailService::new_mock(&email_config),
    };

    Ok(routes::router(state))
}
