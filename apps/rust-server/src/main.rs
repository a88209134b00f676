// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use video_server::{
    api::{cors_layer, router},
    auth::AuthConfig,
    config::{ConfigError, Env, Settings, DEFAULTS_FILE, ENV_PREFIX},
    state::AppState,
    store::InMemoryStore,
    telemetry,
};

#[tokio::main]
async fn main() {
    // Settings decide the log format; until they are read, log pretty to stderr.
    let (env, settings) = {
        let bootstrap = telemetry::bootstrap_subscriber(telemetry::env_filter(), std::io::stderr);
        let _guard = tracing::subscriber::set_default(bootstrap);
        match load_configuration().await {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::error!("Failed to load configuration: {e}");
                std::process::exit(1);
            }
        }
    };

    telemetry::init(settings.log_format);
    tracing::info!(settings = ?settings, defaults = env.defaults_len(), "Loaded configuration");

    let addr = match settings.bind_addr() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("Invalid bind address: {e}");
            std::process::exit(1);
        }
    };

    let state = AppState::new(InMemoryStore::new(), AuthConfig::from_settings(&settings))
        .with_defaults_keys(env.defaults_len());
    let app = router(state, cors_layer(&settings.cors_origins));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!("Video server listening on http://{addr} (docs at /docs)");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
    tracing::info!("Server stopped");
}

/// Registers the defaults bundle named by `VIDEO_DEFAULTS_FILE`, if any, then
/// reads the server settings.
async fn load_configuration() -> Result<(Env, Settings), ConfigError> {
    let mut env = Env::new().prefix(ENV_PREFIX);
    if let Some(path) = env.get_string(DEFAULTS_FILE, None)? {
        env.load_defaults(&path).await?;
    }
    let settings = Settings::load(&env)?;
    Ok((env, settings))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("Shutdown signal received");
}
