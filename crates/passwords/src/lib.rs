//! Encrypted password records for the Memo personal data manager.
//!
//! Persists vault records — plaintext service metadata next to
//! [`EncryptedField`](memo_vault::EncryptedField)-serialized secrets — and
//! is the one consumer of the security core's cipher and key session. The
//! relational store is treated as opaque blob storage: nothing here
//! inspects ciphertext beyond writing and reading the text columns.

pub mod error;
pub mod store;
pub mod types;

pub use {
    error::PasswordStoreError,
    store::PasswordStore,
    types::{NewPassword, PasswordEntry, PasswordSummary},
};

/// Run database migrations for the passwords crate.
///
/// Creates the `passwords` table. Should be called at application startup
/// before the store is used.
pub async fn run_migrations(pool: &sqlx::SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .set_ignore_missing(true)
        .run(pool)
        .await?;
    Ok(())
}
