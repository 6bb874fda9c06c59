use std::sync::Arc;

use devconnect_api::{
    api,
    config::Config,
    infrastructure::{database, github::HttpGithubClient},
    state::AppState,
    telemetry,
};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    telemetry::init(config.log_format);

    if config.dev_jwt_secret {
        tracing::warn!("JWT_SECRET not set, using development secret");
    }

    let github = match HttpGithubClient::new(&config.github) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build GitHub client");
            std::process::exit(1);
        }
    };

    let state = match &config.database.url {
        Some(url) => match database::connect(url, &config.database).await {
            Ok(pool) => AppState::postgres(pool, config.jwt.clone(), github),
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to database");
                std::process::exit(1);
            }
        },
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            AppState::in_memory(config.jwt.clone(), github)
        }
    };

    let app = api::router(state);

    tracing::info!("Server listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
