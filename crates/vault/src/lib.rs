//! Security core for the Memo personal data manager.
//!
//! A single 256-bit master key protects all vault fields on a device. It
//! lives in the platform secure store behind a device authentication
//! challenge; [`SecurityManager`] owns its lifecycle, funnels every store
//! access through the FIFO [`SerialQueue`] (the platform forbids concurrent
//! authentication prompts), and caches the unlocked key in a process-scoped
//! [`KeySession`]. Fields are encrypted with AES-256-CBC behind the
//! trait-based [`Cipher`] seam so the backend can be swapped.

pub mod aes_cbc;
pub mod cipher;
pub mod error;
pub mod key;
pub mod manager;
pub mod serial;
pub mod session;

pub use {
    aes_cbc::AesCbcCipher,
    cipher::{Cipher, EncryptedField},
    error::VaultError,
    key::MasterKey,
    manager::{SecurityConfig, SecurityManager},
    serial::SerialQueue,
    session::KeySession,
};
