//! Secure key-value store contract.

use async_trait::async_trait;

use crate::error::SecureStoreError;

/// Accessibility class applied to a stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accessibility {
    /// Readable whenever the device is unlocked; may migrate to a new device
    /// via backup restore.
    WhenUnlocked,
    /// Readable when unlocked, pinned to this device. The value never leaves
    /// the device and is unavailable before the first unlock after boot.
    #[default]
    WhenUnlockedThisDeviceOnly,
}

/// Options for a read.
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    /// Message shown by the platform authentication prompt if the entry was
    /// stored with [`SetOptions::require_authentication`]. Platform support
    /// varies; backends may fall back to a system default.
    pub auth_prompt: Option<String>,
}

impl GetOptions {
    /// Options carrying an authentication prompt message.
    #[must_use]
    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            auth_prompt: Some(prompt.into()),
        }
    }
}

/// Options for a write.
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    /// Gate every read of this entry behind a device authentication
    /// challenge.
    pub require_authentication: bool,
    /// Where the entry may be read from.
    pub accessibility: Accessibility,
}

impl SetOptions {
    /// Options for sensitive entries: authentication-gated, device-only.
    #[must_use]
    pub fn authenticated() -> Self {
        Self {
            require_authentication: true,
            accessibility: Accessibility::WhenUnlockedThisDeviceOnly,
        }
    }
}

/// Platform key-value store with optional authentication-gated entries.
///
/// Reading an entry stored with `require_authentication` suspends until the
/// platform challenge resolves. The platform forbids concurrent challenges,
/// so callers are expected to serialize gated operations themselves.
#[async_trait]
pub trait SecureStore: Send + Sync {
    /// Read an entry. Returns `Ok(None)` when the entry is absent.
    async fn get(
        &self,
        name: &str,
        opts: &GetOptions,
    ) -> Result<Option<String>, SecureStoreError>;

    /// Write an entry, replacing any previous value and its options.
    async fn set(
        &self,
        name: &str,
        value: &str,
        opts: &SetOptions,
    ) -> Result<(), SecureStoreError>;
}
