use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carebook_api_rest::{router, AppState};
use carebook_core::constants::{DEFAULT_DATA_DIR, DEFAULT_UPLOADS_DIR};
use carebook_core::{rest_addr_from_env_values, CoreConfig};

/// Main entry point for the Carebook server
///
/// Resolves configuration from the environment once, then serves the REST API until the
/// process is stopped.
///
/// # Environment Variables
/// - `CAREBOOK_REST_ADDR`: listen address (default: "0.0.0.0:4000")
/// - `PORT`: overrides only the port of the listen address
/// - `CAREBOOK_DATA_DIR`: document store directory (default: "data")
/// - `CAREBOOK_UPLOADS_DIR`: uploaded and generated files (default: "uploads")
/// - `CAREBOOK_ADMIN_API_KEY`: key for `/api/admin` routes; unset disables them
///
/// # Errors
/// Returns an error if:
/// - the logging configuration cannot be initialised,
/// - the configured directories cannot be created,
/// - the listen address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("carebook_run=info".parse()?)
                .add_directive("carebook_core=info".parse()?)
                .add_directive("carebook_files=info".parse()?)
                .add_directive("carebook_api_rest=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = rest_addr_from_env_values(
        std::env::var("CAREBOOK_REST_ADDR").ok(),
        std::env::var("PORT").ok(),
    )?;
    let data_dir =
        std::env::var("CAREBOOK_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.into());
    let uploads_dir =
        std::env::var("CAREBOOK_UPLOADS_DIR").unwrap_or_else(|_| DEFAULT_UPLOADS_DIR.into());
    let admin_api_key = std::env::var("CAREBOOK_ADMIN_API_KEY").ok();

    let cfg = Arc::new(CoreConfig::new(
        PathBuf::from(data_dir),
        PathBuf::from(uploads_dir),
        admin_api_key,
    )?);
    if cfg.admin_api_key().is_none() {
        tracing::warn!("CAREBOOK_ADMIN_API_KEY is not set; admin routes will refuse all requests");
    }

    tracing::info!("++ Starting Carebook REST on {}", rest_addr);
    tracing::info!("   data: {}", cfg.data_dir().display());
    tracing::info!("   uploads: {}", cfg.uploads_dir().display());

    let app = router(AppState::new(cfg));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
