//! Master key lifecycle: creation, unlock, lock, security flags.

use std::sync::Arc;

use {
    memo_secure_store::{GetOptions, SecureStore, SecureStoreError, SetOptions},
    tracing::{debug, error, info, warn},
};

use crate::{
    error::VaultError, key::MasterKey, serial::SerialQueue, session::KeySession,
};

/// Secure-store entry names and prompt text.
///
/// Defaults match the original installation, so entries written by earlier
/// releases keep resolving.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Entry holding the hex master key (authentication-gated).
    pub master_key_entry: String,
    /// Entry holding the onboarding flag (plain).
    pub onboarded_entry: String,
    /// Entry holding the security-enabled flag (plain).
    pub security_enabled_entry: String,
    /// Entry marking the legacy flag migration as done (plain).
    pub flag_migration_entry: String,
    /// Message shown by the platform authentication prompt.
    pub auth_prompt: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            master_key_entry: "memo_mk_enc".to_string(),
            onboarded_entry: "memo_is_onboarded".to_string(),
            security_enabled_entry: "memo_security_enabled".to_string(),
            flag_migration_entry: "memo_flag_migration_done".to_string(),
            auth_prompt: "Unlock Memo".to_string(),
        }
    }
}

/// Owns the master key lifecycle and the security flags.
///
/// State machine over the persisted flags:
/// `Uninitialized → Onboarded → {SecurityDisabled ⇄ SecurityEnabled}`,
/// where the user may toggle security at any time after onboarding.
/// Disabling never deletes the master key — data encrypted with it must
/// stay decryptable on re-enable, so the key is reused, not regenerated.
///
/// Every secure-store access goes through the [`SerialQueue`]; the pure
/// in-memory queries ([`master_key`](Self::master_key),
/// [`is_locked`](Self::is_locked), [`lock`](Self::lock)) do not.
pub struct SecurityManager {
    store: Arc<dyn SecureStore>,
    config: SecurityConfig,
    queue: SerialQueue,
    session: Arc<KeySession>,
}

impl SecurityManager {
    /// Create a manager over `store`. Must be called from within a tokio
    /// runtime (the serializer worker is spawned here).
    #[must_use]
    pub fn new(store: Arc<dyn SecureStore>, config: SecurityConfig) -> Self {
        Self {
            store,
            config,
            queue: SerialQueue::new(),
            session: Arc::new(KeySession::new()),
        }
    }

    /// Manager with the default entry names and prompt.
    #[must_use]
    pub fn with_defaults(store: Arc<dyn SecureStore>) -> Self {
        Self::new(store, SecurityConfig::default())
    }

    /// Shared handle to the key session, for injection into dependents.
    #[must_use]
    pub fn session(&self) -> Arc<KeySession> {
        Arc::clone(&self.session)
    }

    /// Whether the user has enabled the security feature.
    ///
    /// Plain flag read — never prompts. Installations that predate the flag
    /// are handled by [`migrate_legacy_flag`](Self::migrate_legacy_flag).
    pub async fn is_security_enabled(&self) -> Result<bool, VaultError> {
        let store = Arc::clone(&self.store);
        let entry = self.config.security_enabled_entry.clone();

        let flag = self
            .queue
            .run(async move { store.get(&entry, &GetOptions::default()).await })
            .await??;
        Ok(flag.as_deref() == Some("true"))
    }

    /// One-time migration for installations that predate the enabled flag.
    ///
    /// When neither the flag nor the migration marker exists, probes for a
    /// master key — the one read here that may fire a device authentication
    /// prompt — and persists `security_enabled = true` if a key is found.
    /// The marker is written either way, so the gated probe happens at most
    /// once per installation. Returns whether a legacy key was found.
    ///
    /// Run this at first-run detection, not from hot-path getters.
    pub async fn migrate_legacy_flag(&self) -> Result<bool, VaultError> {
        let store = Arc::clone(&self.store);
        let cfg = self.config.clone();

        self.queue
            .run(async move {
                let plain = GetOptions::default();
                if store.get(&cfg.security_enabled_entry, &plain).await?.is_some() {
                    return Ok(false);
                }
                if store.get(&cfg.flag_migration_entry, &plain).await?.is_some() {
                    return Ok(false);
                }

                let prompt = GetOptions::with_prompt(cfg.auth_prompt.clone());
                let has_key = store.get(&cfg.master_key_entry, &prompt).await?.is_some();
                if has_key {
                    store
                        .set(&cfg.security_enabled_entry, "true", &SetOptions::default())
                        .await?;
                    info!("legacy master key detected, security flag persisted");
                }
                store
                    .set(&cfg.flag_migration_entry, "true", &SetOptions::default())
                    .await?;
                Ok(has_key)
            })
            .await?
    }

    /// Whether the onboarding flow has completed. Plain flag, never prompts.
    pub async fn is_onboarded(&self) -> Result<bool, VaultError> {
        let store = Arc::clone(&self.store);
        let entry = self.config.onboarded_entry.clone();

        let flag = self
            .queue
            .run(async move { store.get(&entry, &GetOptions::default()).await })
            .await??;
        Ok(flag.as_deref() == Some("true"))
    }

    /// Record that onboarding completed. Write-once semantics: calling this
    /// again is a no-op beyond rewriting the same value.
    pub async fn set_onboarded(&self) -> Result<(), VaultError> {
        let store = Arc::clone(&self.store);
        let entry = self.config.onboarded_entry.clone();

        self.queue
            .run(async move { store.set(&entry, "true", &SetOptions::default()).await })
            .await??;
        Ok(())
    }

    /// Return the stored master key, generating and persisting one if absent.
    ///
    /// The read is authentication-gated when a key exists. Concurrent calls
    /// are safe: the serializer runs them one at a time, so only the first
    /// can generate.
    pub async fn ensure_master_key_exists(&self) -> Result<MasterKey, VaultError> {
        let store = Arc::clone(&self.store);
        let cfg = self.config.clone();

        self.queue
            .run(async move { ensure_master_key(store.as_ref(), &cfg).await })
            .await?
    }

    /// Enable the security feature and make sure a master key exists.
    ///
    /// A key left over from a previous enable/disable cycle is reused. The
    /// ensure step runs inside the same queue slot as the flag write — it
    /// must not go through [`ensure_master_key_exists`](Self::ensure_master_key_exists),
    /// which would re-enter the serializer and deadlock.
    pub async fn initialize_security(&self) -> Result<MasterKey, VaultError> {
        let store = Arc::clone(&self.store);
        let cfg = self.config.clone();

        self.queue
            .run(async move {
                store
                    .set(&cfg.security_enabled_entry, "true", &SetOptions::default())
                    .await?;
                ensure_master_key(store.as_ref(), &cfg).await
            })
            .await?
    }

    /// Disable the security feature.
    ///
    /// The master key is kept: vault records encrypted with it must remain
    /// decryptable if the user re-enables security.
    pub async fn disable_security(&self) -> Result<(), VaultError> {
        let store = Arc::clone(&self.store);
        let entry = self.config.security_enabled_entry.clone();

        self.queue
            .run(async move { store.set(&entry, "false", &SetOptions::default()).await })
            .await??;
        Ok(())
    }

    /// Unlock the vault, caching the master key in the session.
    ///
    /// With a `preloaded` key (already obtained during setup) the cache is
    /// filled directly, no store round-trip. Otherwise the stored key is
    /// read through the authentication gate. Returns `false` — never an
    /// error — when the key is absent, the user dismissed the challenge, a
    /// challenge was already pending, or the store failed; the caller may
    /// retry. A lock that lands while the read is suspended wins: the stale
    /// result is discarded.
    pub async fn unlock(&self, preloaded: Option<MasterKey>) -> bool {
        if let Some(key) = preloaded {
            self.session.store(key);
            return true;
        }

        let epoch = self.session.epoch();
        let store = Arc::clone(&self.store);
        let cfg = self.config.clone();

        let result = self
            .queue
            .run(async move {
                let prompt = GetOptions::with_prompt(cfg.auth_prompt.clone());
                store.get(&cfg.master_key_entry, &prompt).await
            })
            .await;

        match result {
            Ok(Ok(Some(stored))) => match MasterKey::from_hex(&stored) {
                Ok(key) => {
                    if self.session.store_if_epoch(key, epoch) {
                        true
                    } else {
                        debug!("unlock result discarded: locked while the read was pending");
                        false
                    }
                },
                Err(err) => {
                    error!(%err, "stored master key is malformed");
                    false
                },
            },
            Ok(Ok(None)) => false,
            Ok(Err(SecureStoreError::AuthenticationCanceled)) => {
                debug!("unlock canceled by user");
                false
            },
            Ok(Err(SecureStoreError::AuthenticationInProgress)) => {
                // The serializer should make this impossible; platform races
                // still surface it, so treat it as retryable.
                warn!("authentication already in progress");
                false
            },
            Ok(Err(err)) => {
                error!(%err, "unlock failed");
                false
            },
            Err(err) => {
                error!(%err, "unlock failed");
                false
            },
        }
    }

    /// Clear the in-memory key. No persistent-state change, no prompt.
    ///
    /// Called on app backgrounding while security is enabled.
    pub fn lock(&self) {
        self.session.clear();
        debug!("vault locked");
    }

    /// The cached master key, if unlocked. Pure in-memory read.
    #[must_use]
    pub fn master_key(&self) -> Option<MasterKey> {
        self.session.key()
    }

    /// Whether no master key is cached. Pure in-memory read.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.session.is_locked()
    }
}

/// Auth-gated read of the stored key; generates and persists a fresh one if
/// absent. Runs inside a serializer slot — callers must already hold one.
async fn ensure_master_key(
    store: &dyn SecureStore,
    cfg: &SecurityConfig,
) -> Result<MasterKey, VaultError> {
    let prompt = GetOptions::with_prompt(cfg.auth_prompt.clone());
    if let Some(existing) = store.get(&cfg.master_key_entry, &prompt).await? {
        return MasterKey::from_hex(&existing);
    }

    let key = MasterKey::generate();
    store
        .set(&cfg.master_key_entry, key.as_hex(), &SetOptions::authenticated())
        .await?;
    info!("master key generated");
    Ok(key)
}
