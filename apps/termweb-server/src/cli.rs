use clap::Parser;
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(
    name = "termweb-server",
    about = "Serve the termweb command API over HTTP",
    version
)]
pub struct Cli {
    #[arg(
        long,
        env = "TERMWEB_BIND",
        default_value = "0.0.0.0:3000",
        value_name = "ADDR",
        help = "Address to listen on"
    )]
    pub bind: SocketAddr,

    #[arg(
        long = "log-filter",
        env = "RUST_LOG",
        default_value = "termweb=info,termweb_server=info,tower_http=info",
        value_name = "FILTER",
        help = "tracing filter directives"
    )]
    pub log_filter: String,
}
