//! CLI error type

use thiserror::Error;

use crate::discovery::DiscoveryError;

/// Errors surfaced by CLI commands. All of them end the run with exit code 1.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{}", .0.user_message())]
    Discovery(#[from] DiscoveryError),
}
