//! Gateway 应用层
//!
//! HTTP 服务器和请求处理

mod handlers;
mod middleware;
mod state;

pub use state::AppState;

use anyhow::Result;
use axum::{http::StatusCode, middleware as axum_middleware, routing::get, Router};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Config;
use crate::upstream;

pub async fn serve(config: Config) -> Result<()> {
    let dogs = upstream::connect(&config)?;
    let state = AppState::new(dogs);
    let app = build_router(state, &config);
    let addr = config.listen_addr()?;
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!("Dog endpoints: {}/dogs", config.local_base_url());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn build_router(state: AppState, config: &Config) -> Router {
    let dog_routes = Router::new()
        .route("/dogs", get(handlers::handle_welcome))
        .route("/dogs/random", get(handlers::handle_random_image))
        .route("/dogs/breed/{breed}", get(handlers::handle_breed_image))
        .route("/dogs/multiple", get(handlers::handle_multiple_images))
        .route("/dogs/breeds", get(handlers::handle_all_breeds));

    Router::new()
        .merge(dog_routes)
        .route("/health", get(handlers::handle_health))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::request_logger))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    config.request_timeout,
                )),
        )
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    tokio::select! {
        _ = ctrl_c => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
