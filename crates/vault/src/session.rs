//! Process-scoped master key session.

use std::sync::{Mutex, MutexGuard};

use crate::key::MasterKey;

/// Holds the unlocked master key in process memory.
///
/// Created empty at process start, populated on unlock, cleared on lock or
/// app backgrounding, gone at process exit. The key held here is never
/// written back to persistent storage.
///
/// The epoch counter resolves the race between a lock and an in-flight
/// unlock: an unlock snapshots the epoch before its (suspending) store read
/// and commits its result only if no lock intervened, so a stale read cannot
/// resurrect the key after the user locked the vault.
#[derive(Default)]
pub struct KeySession {
    inner: Mutex<SessionState>,
}

#[derive(Default)]
struct SessionState {
    key: Option<MasterKey>,
    epoch: u64,
}

impl KeySession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current epoch, snapshotted before a suspending unlock read.
    pub fn epoch(&self) -> u64 {
        self.state().epoch
    }

    /// Cache the key unconditionally (preloaded-key path).
    pub fn store(&self, key: MasterKey) {
        self.state().key = Some(key);
    }

    /// Cache the key only if no lock happened since `epoch` was snapshotted.
    /// Returns whether the key was committed.
    pub fn store_if_epoch(&self, key: MasterKey, epoch: u64) -> bool {
        let mut state = self.state();
        if state.epoch == epoch {
            state.key = Some(key);
            true
        } else {
            false
        }
    }

    /// Clear the cached key and invalidate in-flight unlocks.
    pub fn clear(&self) {
        let mut state = self.state();
        state.key = None;
        state.epoch += 1;
    }

    /// The cached key, if the session is unlocked. Pure in-memory read.
    pub fn key(&self) -> Option<MasterKey> {
        self.state().key.clone()
    }

    /// Whether no key is currently cached. Pure in-memory read.
    pub fn is_locked(&self) -> bool {
        self.state().key.is_none()
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_locked() {
        let session = KeySession::new();
        assert!(session.is_locked());
        assert!(session.key().is_none());
    }

    #[test]
    fn store_then_clear() {
        let session = KeySession::new();
        let key = MasterKey::generate();

        session.store(key.clone());
        assert!(!session.is_locked());
        assert_eq!(session.key(), Some(key));

        session.clear();
        assert!(session.is_locked());
        assert!(session.key().is_none());
    }

    #[test]
    fn clear_bumps_epoch() {
        let session = KeySession::new();
        let before = session.epoch();
        session.clear();
        assert_eq!(session.epoch(), before + 1);
    }

    #[test]
    fn stale_epoch_commit_is_rejected() {
        let session = KeySession::new();
        let epoch = session.epoch();

        // A lock lands while the unlock read is suspended.
        session.clear();

        let committed = session.store_if_epoch(MasterKey::generate(), epoch);
        assert!(!committed);
        assert!(session.is_locked());
    }

    #[test]
    fn current_epoch_commit_succeeds() {
        let session = KeySession::new();
        let epoch = session.epoch();

        let committed = session.store_if_epoch(MasterKey::generate(), epoch);
        assert!(committed);
        assert!(!session.is_locked());
    }
}
