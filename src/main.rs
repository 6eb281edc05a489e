use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use user_auth::configuration::{get_configuration, StorageBackend};
use user_auth::startup::{run, AppState};
use user_auth::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let (configuration, environment) = match get_configuration() {
        Ok((configuration, environment)) => {
            tracing::info!(
                environment = environment.as_str(),
                "Configuration loaded successfully"
            );
            (configuration, environment)
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };
    tracing::debug!(security = ?configuration.security, ?environment, "Effective security settings");

    let state = match configuration.application.storage {
        StorageBackend::Postgres => {
            tracing::info!("Attempting to connect to database");
            let pool = PgPoolOptions::new()
                .max_connections(configuration.database.max_connections)
                .acquire_timeout(configuration.application.request_timeout())
                .connect(&configuration.database.connection_string())
                .await
                .map_err(|e| {
                    tracing::error!("Failed to create connection pool: {}", e);
                    std::io::Error::new(
                        std::io::ErrorKind::ConnectionRefused,
                        "Database connection error",
                    )
                })?;

            sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
                tracing::error!("Failed to migrate the database: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, "Database migration error")
            })?;
            tracing::info!("Database ready");

            AppState::with_postgres(&configuration, pool)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on shutdown");
            AppState::in_memory(&configuration)
        }
    }
    .map_err(|e| {
        tracing::error!("Failed to build application state: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "Application state error")
    })?;

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    run(listener, state)?.await?;

    tracing::info!("Server stopped");
    Ok(())
}
