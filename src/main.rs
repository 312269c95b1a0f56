use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roster::infrastructure::AppState;
use roster::{config, db, server};

#[tokio::main]
async fn main() {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = config::Config::from_env();

    if config.debug {
        tracing::warn!("DEBUG is on: internal error details will be sent to clients");
    }

    // Initialize database
    let db = db::connect(&config)
        .await
        .expect("Failed to initialize database");

    let state = AppState::with_config(db, &config);

    server::serve(state, &config)
        .await
        .expect("Failed to start server");
}
