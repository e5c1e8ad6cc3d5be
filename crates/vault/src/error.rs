//! Vault error types.

use memo_secure_store::SecureStoreError;

/// Errors produced by vault operations.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// No master key is cached — the vault must be unlocked first.
    #[error("vault is locked")]
    Locked,

    /// Wrong key or corrupted ciphertext. There is no safe plaintext to
    /// return, so this propagates to the caller.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// The master key is not a 64-character hex string.
    #[error("malformed master key: {0}")]
    MalformedKey(String),

    /// An encrypted field could not be parsed.
    #[error("malformed encrypted field: {0}")]
    MalformedField(String),

    /// Cipher setup failed.
    #[error("cipher error: {0}")]
    Cipher(String),

    /// Secure store failure surfaced past the manager boundary.
    #[error("secure store error: {0}")]
    Store(#[from] SecureStoreError),

    /// The serializer worker is gone (process shutting down).
    #[error("security operation queue is closed")]
    QueueClosed,

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
