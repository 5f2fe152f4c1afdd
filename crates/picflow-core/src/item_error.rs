//! Per-item error wrapper for batch processing.
//!
//! A failure on one batch item never aborts its siblings; it is recorded and
//! reported. The wrapper tags each failure as recoverable (transient storage
//! or network trouble, worth redelivering) or unrecoverable (undecodable
//! image, malformed envelope — retrying cannot help).

use std::fmt;

/// Error for one unit of work in an inbound batch.
#[derive(Debug)]
pub struct ItemError {
    inner: anyhow::Error,
    recoverable: bool,
}

impl ItemError {
    /// An error that retrying cannot fix: undecodable image payload, a target
    /// codec that rejects the image, a malformed event envelope.
    pub fn unrecoverable(err: impl Into<anyhow::Error>) -> Self {
        Self {
            inner: err.into(),
            recoverable: false,
        }
    }

    /// A transient error: storage fetch/write failures and other I/O trouble
    /// that redelivery may resolve.
    pub fn recoverable(err: impl Into<anyhow::Error>) -> Self {
        Self {
            inner: err.into(),
            recoverable: true,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.recoverable
    }

    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    pub fn into_inner(self) -> anyhow::Error {
        self.inner
    }
}

impl fmt::Display for ItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::error::Error for ItemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

impl From<anyhow::Error> for ItemError {
    /// Default conversion treats the error as recoverable.
    fn from(err: anyhow::Error) -> Self {
        Self::recoverable(err)
    }
}

/// Extension trait for marking a whole `Result` unrecoverable.
pub trait ItemResultExt<T> {
    fn unrecoverable(self) -> Result<T, ItemError>;
}

impl<T, E: Into<anyhow::Error>> ItemResultExt<T> for Result<T, E> {
    fn unrecoverable(self) -> Result<T, ItemError> {
        self.map_err(|e| ItemError::unrecoverable(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecoverable_error() {
        let err = ItemError::unrecoverable(anyhow::anyhow!("not an image"));
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("not an image"));
    }

    #[test]
    fn test_recoverable_error() {
        let err = ItemError::recoverable(anyhow::anyhow!("fetch timed out"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_from_anyhow_defaults_to_recoverable() {
        let err: ItemError = anyhow::anyhow!("some error").into();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_result_ext() {
        let result: Result<(), anyhow::Error> = Err(anyhow::anyhow!("bad payload"));
        assert!(!result.unrecoverable().unwrap_err().is_recoverable());
    }
}
