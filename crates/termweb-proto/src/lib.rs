//! Wire types shared by the termweb client and the command server.
//! Kept in a dedicated crate so both sides agree on the JSON shape without
//! pulling each other's runtime dependencies.

use serde::{Deserialize, Serialize};

/// Route that executes a single command line.
pub const COMMAND_PATH: &str = "/api/command";

/// Liveness probe route.
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub command: String,
}

impl CommandRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandStatus {
    #[default]
    Ok,
    Error,
}

/// Result of running one command on the server.
///
/// `cwd` is always the server's working directory *after* the command ran,
/// including when `status` is [`CommandStatus::Error`]. When `clear` is set
/// the client discards its transcript and ignores `output`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub output: String,
    pub cwd: String,
    pub status: CommandStatus,
    pub clear: bool,
}

impl CommandResponse {
    pub fn ok(output: impl Into<String>, cwd: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            cwd: cwd.into(),
            status: CommandStatus::Ok,
            clear: false,
        }
    }

    pub fn error(output: impl Into<String>, cwd: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            cwd: cwd.into(),
            status: CommandStatus::Error,
            clear: false,
        }
    }

    pub fn cleared(cwd: impl Into<String>) -> Self {
        Self {
            output: String::new(),
            cwd: cwd.into(),
            status: CommandStatus::Ok,
            clear: true,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == CommandStatus::Error
    }
}
