use std::sync::Arc;

use tracing::info;

use crate::client::runtime::{self, App};
use crate::config::Config;
use crate::remote::HttpRemoteShell;
use crate::session::Session;
use crate::terminal::cli::Cli;
use crate::terminal::error::CliError;

pub async fn run(cli: Cli) -> Result<(), CliError> {
    let config = Config::from_cli(&cli);
    let remote = HttpRemoteShell::new(&config.server, config.request_timeout)?;
    info!(
        target: "termweb::client",
        endpoint = %remote.endpoint(),
        user = %config.identity.user,
        host = %config.identity.host,
        timeout = ?config.request_timeout,
        "starting terminal"
    );

    let (app, completions) = App::new(Session::new(config.identity), Arc::new(remote));
    runtime::run(app, completions).await?;

    info!(target: "termweb::client", "terminal closed");
    Ok(())
}
