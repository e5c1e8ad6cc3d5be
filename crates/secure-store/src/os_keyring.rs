//! Desktop backend on the OS keystore.
//!
//! Access control is whatever the platform keystore enforces for the
//! current user session; the per-read challenge and prompt message of the
//! mobile contract are delegated to the OS, which shows its own UI when it
//! decides one is needed. `require_authentication` is therefore accepted
//! but not enforced entry-by-entry here.

use async_trait::async_trait;
use tracing::debug;

use crate::{
    error::SecureStoreError,
    store::{GetOptions, SecureStore, SetOptions},
};

/// Secure store backed by the OS keystore via the `keyring` crate.
pub struct KeyringSecureStore {
    service: String,
}

impl KeyringSecureStore {
    /// Create a store scoped to `service` (the keystore's service/app name).
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }
}

#[async_trait]
impl SecureStore for KeyringSecureStore {
    async fn get(
        &self,
        name: &str,
        _opts: &GetOptions,
    ) -> Result<Option<String>, SecureStoreError> {
        let service = self.service.clone();
        let name = name.to_string();

        // The keyring API is blocking; keep it off the async workers.
        tokio::task::spawn_blocking(move || {
            let entry = keyring::Entry::new(&service, &name)
                .map_err(|e| SecureStoreError::Backend(e.to_string()))?;
            match entry.get_password() {
                Ok(value) => Ok(Some(value)),
                Err(keyring::Error::NoEntry) => Ok(None),
                Err(e) => Err(SecureStoreError::Backend(e.to_string())),
            }
        })
        .await
        .map_err(|e| SecureStoreError::Backend(e.to_string()))?
    }

    async fn set(
        &self,
        name: &str,
        value: &str,
        opts: &SetOptions,
    ) -> Result<(), SecureStoreError> {
        if opts.require_authentication {
            debug!(name, "per-read authentication is delegated to the OS keystore");
        }

        let service = self.service.clone();
        let name = name.to_string();
        let value = value.to_string();

        tokio::task::spawn_blocking(move || {
            let entry = keyring::Entry::new(&service, &name)
                .map_err(|e| SecureStoreError::Backend(e.to_string()))?;
            entry
                .set_password(&value)
                .map_err(|e| SecureStoreError::Backend(e.to_string()))
        })
        .await
        .map_err(|e| SecureStoreError::Backend(e.to_string()))?
    }
}
