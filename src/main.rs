use std::sync::Arc;

use multi_upload::{config, routes, types::AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = config::resolve_config_dir().join("multi-upload/config");
    let config = config::Config::load(&config_path, |var| std::env::var(var).ok());

    if config.credentials.bearer_token.is_none() && config.credentials.custom_header.is_none() {
        tracing::info!(
            "No credentials in {}; requests must bring their own or use authentication = none",
            config_path.display()
        );
    }

    let listen = config.listen.clone();
    let state = Arc::new(AppState { config });
    let app = routes::router(state);

    let listener = match tokio::net::TcpListener::bind(&listen).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("failed to bind {listen}: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!("Listening on http://{listen}");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}
