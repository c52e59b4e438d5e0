use clap::{Args, Parser};
use std::path::PathBuf;

use crate::telemetry::logging::{LogConfig, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "termweb",
    about = "Interactive terminal for a remote termweb shell",
    author,
    version
)]
pub struct Cli {
    #[arg(
        long,
        env = "TERMWEB_SERVER",
        default_value = "http://127.0.0.1:3000",
        value_name = "URL",
        help = "Base URL of the termweb command server"
    )]
    pub server: String,

    #[arg(
        long,
        env = "TERMWEB_USER",
        value_name = "NAME",
        help = "User name shown in the prompt (defaults to $USER)"
    )]
    pub user: Option<String>,

    #[arg(
        long,
        env = "TERMWEB_HOST",
        value_name = "NAME",
        help = "Host name shown in the prompt"
    )]
    pub host: Option<String>,

    #[arg(
        long = "request-timeout",
        env = "TERMWEB_REQUEST_TIMEOUT",
        value_name = "SECONDS",
        value_parser = parse_timeout_secs,
        help = "Give up on a command after this many seconds (waits indefinitely when unset)"
    )]
    pub request_timeout: Option<u64>,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

#[derive(Args, Debug, Clone)]
pub struct LoggingArgs {
    #[arg(
        long = "log-level",
        value_enum,
        env = "TERMWEB_LOG_LEVEL",
        default_value_t = LogLevel::Warn,
        help = "Minimum log level (error, warn, info, debug, trace)"
    )]
    pub level: LogLevel,

    #[arg(
        long = "log-file",
        value_name = "PATH",
        env = "TERMWEB_LOG_FILE",
        help = "Write structured logs to the specified file"
    )]
    pub file: Option<PathBuf>,
}

impl LoggingArgs {
    pub fn to_config(&self) -> LogConfig {
        LogConfig {
            level: self.level,
            file: self.file.clone(),
        }
    }
}

fn parse_timeout_secs(raw: &str) -> Result<u64, String> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a whole number of seconds"))?;
    if secs == 0 {
        return Err("timeout must be at least one second".to_string());
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_parse() {
        let cli = Cli::try_parse_from([
            "termweb",
            "--server",
            "http://example.test:8080",
            "--user",
            "ada",
            "--host",
            "lab",
            "--request-timeout",
            "15",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.server, "http://example.test:8080");
        assert_eq!(cli.user.as_deref(), Some("ada"));
        assert_eq!(cli.host.as_deref(), Some("lab"));
        assert_eq!(cli.request_timeout, Some(15));
        assert_eq!(cli.logging.to_config().level, LogLevel::Debug);
    }

    #[test]
    fn timeout_must_be_positive() {
        assert!(Cli::try_parse_from(["termweb", "--request-timeout", "0"]).is_err());
        assert!(Cli::try_parse_from(["termweb", "--request-timeout", "soon"]).is_err());
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        assert!(Cli::try_parse_from(["termweb", "--log-level", "loud"]).is_err());
    }
}
