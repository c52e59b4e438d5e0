use clap::Parser;
use termweb_client::telemetry::logging;
use termweb_client::terminal::{app, cli::Cli, error::CliError};

async fn run(cli: Cli) -> Result<(), CliError> {
    logging::init(&cli.logging.to_config())?;
    app::run(cli).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
