//! In-memory store for tests and development.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;

use crate::{
    error::SecureStoreError,
    store::{Accessibility, GetOptions, SecureStore, SetOptions},
};

/// Outcome of a simulated authentication challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    /// The user passed the challenge.
    Granted,
    /// The user dismissed the challenge.
    Canceled,
    /// Another challenge was already pending on the platform.
    InProgress,
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    require_authentication: bool,
    #[allow(dead_code)]
    accessibility: Accessibility,
}

/// In-memory store backed by `HashMap`. No persistence — for tests only.
///
/// Reads of authentication-gated entries consume a scripted [`AuthDecision`]
/// (default [`Granted`](AuthDecision::Granted)), so tests can simulate a
/// dismissed or concurrent challenge. Challenges are counted, letting tests
/// assert that a gated read actually happened — or didn't.
pub struct MemorySecureStore {
    entries: Mutex<HashMap<String, Entry>>,
    auth_script: Mutex<VecDeque<AuthDecision>>,
    challenges: AtomicUsize,
}

impl MemorySecureStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            auth_script: Mutex::new(VecDeque::new()),
            challenges: AtomicUsize::new(0),
        }
    }

    /// Queue the outcome for the next authentication challenge.
    pub fn script_auth(&self, decision: AuthDecision) {
        let mut script = self.auth_script.lock().unwrap_or_else(|e| e.into_inner());
        script.push_back(decision);
    }

    /// Number of authentication challenges fired so far.
    pub fn auth_challenges(&self) -> usize {
        self.challenges.load(Ordering::SeqCst)
    }

    fn next_decision(&self) -> AuthDecision {
        let mut script = self.auth_script.lock().unwrap_or_else(|e| e.into_inner());
        script.pop_front().unwrap_or(AuthDecision::Granted)
    }
}

impl Default for MemorySecureStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecureStore for MemorySecureStore {
    async fn get(
        &self,
        name: &str,
        _opts: &GetOptions,
    ) -> Result<Option<String>, SecureStoreError> {
        let entry = {
            let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            entries.get(name).cloned()
        };

        let Some(entry) = entry else {
            return Ok(None);
        };

        // A challenge only fires for entries stored as auth-gated; absent
        // entries resolve without prompting.
        if entry.require_authentication {
            self.challenges.fetch_add(1, Ordering::SeqCst);
            match self.next_decision() {
                AuthDecision::Granted => {},
                AuthDecision::Canceled => return Err(SecureStoreError::AuthenticationCanceled),
                AuthDecision::InProgress => return Err(SecureStoreError::AuthenticationInProgress),
            }
        }

        Ok(Some(entry.value))
    }

    async fn set(
        &self,
        name: &str,
        value: &str,
        opts: &SetOptions,
    ) -> Result<(), SecureStoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(name.to_string(), Entry {
            value: value.to_string(),
            require_authentication: opts.require_authentication,
            accessibility: opts.accessibility,
        });
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_absent_returns_none() {
        let store = MemorySecureStore::new();
        let value = store.get("missing", &GetOptions::default()).await.unwrap();
        assert!(value.is_none());
        assert_eq!(store.auth_challenges(), 0);
    }

    #[tokio::test]
    async fn set_get_round_trip() {
        let store = MemorySecureStore::new();
        store
            .set("flag", "true", &SetOptions::default())
            .await
            .unwrap();
        let value = store.get("flag", &GetOptions::default()).await.unwrap();
        assert_eq!(value.as_deref(), Some("true"));
        // Plain entries never prompt.
        assert_eq!(store.auth_challenges(), 0);
    }

    #[tokio::test]
    async fn gated_entry_fires_challenge() {
        let store = MemorySecureStore::new();
        store
            .set("secret", "v", &SetOptions::authenticated())
            .await
            .unwrap();

        let value = store
            .get("secret", &GetOptions::with_prompt("Unlock"))
            .await
            .unwrap();
        assert_eq!(value.as_deref(), Some("v"));
        assert_eq!(store.auth_challenges(), 1);
    }

    #[tokio::test]
    async fn scripted_cancel_surfaces_as_error() {
        let store = MemorySecureStore::new();
        store
            .set("secret", "v", &SetOptions::authenticated())
            .await
            .unwrap();
        store.script_auth(AuthDecision::Canceled);

        let result = store.get("secret", &GetOptions::default()).await;
        assert!(matches!(
            result,
            Err(SecureStoreError::AuthenticationCanceled)
        ));

        // Script is consumed; the next read is granted again.
        let value = store.get("secret", &GetOptions::default()).await.unwrap();
        assert_eq!(value.as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn overwrite_replaces_value_and_options() {
        let store = MemorySecureStore::new();
        store
            .set("k", "v1", &SetOptions::authenticated())
            .await
            .unwrap();
        store.set("k", "v2", &SetOptions::default()).await.unwrap();

        let value = store.get("k", &GetOptions::default()).await.unwrap();
        assert_eq!(value.as_deref(), Some("v2"));
        // No longer gated after the plain overwrite.
        assert_eq!(store.auth_challenges(), 0);
    }
}
