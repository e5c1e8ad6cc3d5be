//! Secure store error types.

/// Errors produced by secure store backends.
///
/// An absent entry is not an error — reads return `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum SecureStoreError {
    /// The user dismissed the device authentication challenge.
    #[error("authentication canceled by user")]
    AuthenticationCanceled,

    /// Another authentication challenge is already pending on the platform.
    #[error("authentication already in progress")]
    AuthenticationInProgress,

    /// The platform store itself failed.
    #[error("secure store backend error: {0}")]
    Backend(String),
}
