pub mod handlers;
pub mod routes;
pub mod state;
pub mod types;

pub use routes::{create_router, create_router_with, RouterOptions};
pub use state::AppState;

use std::future::Future;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::AppConfig;
use crate::error::{CropError, Result};

/// Bind and serve the API until `shutdown` resolves.
pub async fn serve<F>(state: AppState, config: &AppConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router_with(
        state,
        RouterOptions {
            cors: config.server.cors,
            trace: config.debug,
        },
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(
        "Starting crop advisor on http://{} (debug={})",
        listener.local_addr()?,
        config.debug
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| CropError::Internal(format!("API server error: {}", e)))?;

    info!("API server stopped");
    Ok(())
}
