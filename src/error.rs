//! Error types shared by the certificate helper and the fixture generators.
//!
//! Every failure is fatal for a fixture run, so the variants only need to carry
//! enough context for a clear diagnostic.

use std::path::PathBuf;

use openssl::error::ErrorStack;
use thiserror::Error;

/// Errors raised while building, signing or writing fixtures.
#[derive(Error, Debug)]
pub enum FixtureError {
    /// An OpenSSL call failed (key generation, signing, encoding)
    #[error("OpenSSL error: {0}")]
    OpenSsl(#[from] ErrorStack),

    /// Reading or writing a fixture file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Embedded or loaded key material is malformed or of the wrong type
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// A certificate could not be issued as requested
    #[error("Certificate error: {0}")]
    Certificate(String),

    /// A certificate could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// A validity date is not in yyyy-mm-dd form
    #[error("Invalid date '{date}': {source}")]
    InvalidDate {
        date: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl FixtureError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FixtureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FixtureError::InvalidKey("end-entity: not RSA".to_string());
        assert_eq!(err.to_string(), "Invalid key: end-entity: not RSA");
    }

    #[test]
    fn test_io_error_names_path() {
        let err = FixtureError::io(
            "/tmp/out/valid_chain.pem",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(
            err.to_string(),
            "I/O error on /tmp/out/valid_chain.pem: denied"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<FixtureError>();
    }
}
