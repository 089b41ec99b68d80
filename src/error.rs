use thiserror::Error;

/// Errors raised while building a [`crate::ClientConfig`].
///
/// Distinct from [`crate::SendStatus::ConfigError`]: this type covers malformed construction
/// parameters, the other covers a runtime outcome of a `send` call against an already-running
/// session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required field was never supplied to the builder.
    #[error("missing required configuration field: {0}")]
    Missing(&'static str),

    /// `sp_code` was supplied but is not 6 ASCII digits.
    #[error("sp_code must be 6 ASCII digits, got {0:?}")]
    InvalidSpCode(String),
}

/// Infrastructure failures that make a [`crate::Session`] unusable.
///
/// Protocol-level outcomes of an individual `send` call are reported through
/// [`crate::SendStatus`] instead; this type is reserved for conditions under which the whole
/// client, not just one submission, cannot proceed — currently the transport failing during
/// [`crate::Session::start`]'s one synchronous connection attempt.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CmppError {
    /// The transport failed during an operation the session loop cannot retry around.
    #[error("transport I/O error")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// A shared mutex was poisoned by a panic in another thread holding the lock.
    #[error("internal lock was poisoned")]
    Poison,
}

impl<T> From<std::sync::PoisonError<T>> for CmppError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::Poison
    }
}
