use thiserror::Error;

use crate::catalog::CatalogError;

/// Startup and environment failures. Nothing raised by a single user action
/// ends up here; those are reported on screen instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, Error>;
