use lingo_tutor_server::{ServerConfig, build_state, router, spawn_session_cleanup};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    let state = match build_state(&config) {
        Ok(state) => state,
        Err(report) => {
            tracing::error!("{report}");
            std::process::exit(1);
        }
    };

    // Cleanup expired sessions on startup, then periodically
    let removed = state.tutor.sweep_expired().await.removed_count;
    if removed > 0 {
        tracing::info!(removed_sessions = removed, "Cleaned up expired sessions on startup");
    }
    spawn_session_cleanup(
        state.tutor.clone(),
        Duration::from_secs(config.session.cleanup_interval_seconds),
    );

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", config.bind_address);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
