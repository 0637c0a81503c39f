use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use vendas::config::Config;
use vendas::server::{build_app, serve};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vendas=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!("Starting Vendas on {}", config.address());

    let (_state, app) = build_app(config.clone()).expect("Failed to build application");

    let (port, handle) = serve(app, &config.host, config.port)
        .await
        .expect("Failed to bind address");

    tracing::info!("Listening on http://{}:{}", config.host, port);

    if let Err(e) = handle.await {
        tracing::error!("Server task failed: {}", e);
    }
}
