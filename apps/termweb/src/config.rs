use std::env;
use std::time::Duration;

use crate::session::Identity;
use crate::terminal::cli::Cli;

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";
pub const DEFAULT_USER: &str = "guest";
pub const DEFAULT_HOST: &str = "termweb";

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the command server
    pub server: String,
    pub identity: Identity,
    /// `None` waits for the server indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        let user = non_blank(cli.user.as_deref())
            .or_else(|| env::var("USER").ok().filter(|user| !user.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_USER.to_string());
        let host =
            non_blank(cli.host.as_deref()).unwrap_or_else(|| DEFAULT_HOST.to_string());
        Self {
            server: cli.server.trim().to_string(),
            identity: Identity::new(user, host),
            request_timeout: cli.request_timeout.map(Duration::from_secs),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            identity: Identity::default(),
            request_timeout: None,
        }
    }
}
