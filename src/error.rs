//! Error types for rpzgate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::allowlist::AllowListError;
use crate::config::ConfigError;
use crate::fetch::TransportError;

/// Main error type for an import run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("allow-list error: {0}")]
    AllowList(#[from] AllowListError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

/// Errors writing the destination zone file.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("unable to create {path:?}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;
