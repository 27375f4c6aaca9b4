//! Startup and runtime errors of the application.

use messaging::AppError;
use thiserror::Error;
use tracing_subscriber::util::TryInitError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to initialise tracing: {0}")]
    Telemetry(#[from] TryInitError),

    #[error(transparent)]
    App(#[from] AppError),
}

pub type Result<T> = std::result::Result<T, Error>;
