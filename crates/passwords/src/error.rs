//! Password store error types.

use memo_vault::VaultError;

/// Errors produced by password record operations.
#[derive(Debug, thiserror::Error)]
pub enum PasswordStoreError {
    /// Security core failure: locked vault, decryption failure, malformed
    /// field. Locked-vault and wrong-key conditions surface here so the UI
    /// can show a "cannot decrypt" state instead of garbage text.
    #[error(transparent)]
    Vault(#[from] VaultError),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
