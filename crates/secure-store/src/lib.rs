//! Platform secure key-value store abstraction.
//!
//! Mobile platforms expose a keystore that can gate individual entries
//! behind a device authentication challenge (biometric or passcode) and
//! show a caller-supplied prompt message on each gated read. [`SecureStore`]
//! is that contract; backends are swappable behind the trait.
//!
//! [`MemorySecureStore`] is the reference backend for tests and development,
//! with a scriptable challenge outcome queue. The `os-keyring` feature adds
//! a desktop backend on the OS keystore.

pub mod error;
pub mod memory;
#[cfg(feature = "os-keyring")]
pub mod os_keyring;
pub mod store;

pub use {
    error::SecureStoreError,
    memory::{AuthDecision, MemorySecureStore},
    store::{Accessibility, GetOptions, SecureStore, SetOptions},
};

#[cfg(feature = "os-keyring")]
pub use os_keyring::KeyringSecureStore;
