//! Error types for sdcheck operations.
//!
//! [`SdcheckError`] covers failures of the tool itself: reading a file or
//! loading configuration. Problems found in a constraint file are not
//! errors in this sense; they are reported as data in a
//! [`CheckReport`](crate::CheckReport).

use std::io;

use thiserror::Error;

use sdcheck_parser::error::UnknownKind;

/// The main error type for sdcheck operations.
#[derive(Debug, Error)]
pub enum SdcheckError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<UnknownKind> for SdcheckError {
    fn from(error: UnknownKind) -> Self {
        Self::Config(error.to_string())
    }
}
