pub mod cli;
pub mod handlers;
pub mod shell;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use termweb_proto::{COMMAND_PATH, HEALTH_PATH};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health_check, run_command, SharedShell};
use crate::shell::Shell;

pub fn shared_shell() -> SharedShell {
    Arc::new(Mutex::new(Shell::new()))
}

/// Build the HTTP surface around `shell`. Browsers and other origins are
/// allowed to call the API.
pub fn router(shell: SharedShell) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health_check))
        .route(COMMAND_PATH, post(run_command))
        .with_state(shell)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
