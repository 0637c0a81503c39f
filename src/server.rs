use axum::middleware;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error_pages::{error_page_middleware, fallback_handler};
use crate::handlers;
use crate::services::sales_source::SalesSource;
use crate::state::{AppState, JsManifest};

/// Build the application state and Axum router from a [`Config`].
///
/// Creates the sales source client, loads the asset manifest, and assembles
/// the middleware stack. Returns the shared state and a ready-to-serve router.
pub fn build_app(config: Config) -> Result<(AppState, Router), Box<dyn std::error::Error>> {
    let source = SalesSource::from_config(&config)?;
    tracing::info!(source_url = %source.url(), "Using sales source");

    let manifest = JsManifest::load(&config.static_path);

    let state = AppState {
        config: Arc::new(config),
        manifest,
        source,
    };

    Ok((state.clone(), router(state)))
}

/// Assemble routes, static files and middleware around an existing state.
///
/// Static files are served from the state's `config.static_path`.
pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_path);

    Router::new()
        .merge(handlers::routes())
        .fallback(fallback_handler)
        .nest_service("/static", static_files)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            error_page_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the router to `host:port` and spawn the server as a tokio task.
///
/// Returns the actual port the server bound to (useful when `port` is 0 for
/// OS-assigned ports) and a [`JoinHandle`] for the server task.
pub async fn serve(
    app: Router,
    host: &str,
    port: u16,
) -> Result<(u16, JoinHandle<()>), Box<dyn std::error::Error>> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    let actual_port = listener.local_addr()?.port();

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((actual_port, handle))
}
