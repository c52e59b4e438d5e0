use crate::remote::RemoteError;
use crate::telemetry::logging::InitError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Remote(#[from] RemoteError),
    #[error("logging initialization failed: {0}")]
    Logging(#[from] InitError),
}
