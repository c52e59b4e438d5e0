use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;
use termweb_proto::{CommandRequest, CommandResponse};
use tokio::sync::Mutex;
use tracing::debug;

use crate::shell::Shell;

/// Every request runs against the same shell, one at a time.
pub type SharedShell = Arc<Mutex<Shell>>;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    status: &'static str,
}

pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

pub async fn run_command(
    State(shell): State<SharedShell>,
    Json(request): Json<CommandRequest>,
) -> Json<CommandResponse> {
    let command = request.command.trim();
    let mut shell = shell.lock().await;
    let response = shell.execute(command);
    debug!(
        target: "termweb::server",
        command,
        status = ?response.status,
        cwd = %response.cwd,
        clear = response.clear,
        "command executed"
    );
    Json(response)
}
