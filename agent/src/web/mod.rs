//! HTTP server for the command agent
//!
//! One catch-all route: every path and method reaches the same handler,
//! behind the shared-secret middleware.

pub mod auth;
pub mod handlers;
pub mod state;

use anyhow::Result;
use axum::{extract::DefaultBodyLimit, middleware, routing::any, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::AgentConfig;
use state::AppState;

/// Start the agent and serve until the process exits
pub async fn serve(config: AgentConfig) -> Result<()> {
    let listener = TcpListener::bind(config.listen).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!("Command agent listening on port {}", local_addr.port());
    tracing::info!("Shared secret (Senha header): {}", config.shared_secret);

    serve_with_listener(listener, AppState::from_config(&config)).await
}

/// Serve on an already-bound listener
pub async fn serve_with_listener(listener: TcpListener, state: AppState) -> Result<()> {
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

/// Create the router with the single command route
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(handlers::run_command))
        .route("/*path", any(handlers::run_command))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
