//! Cipher seam and the at-rest encoding of encrypted values.

use serde::{Deserialize, Serialize};

use crate::{error::VaultError, key::MasterKey};

/// Serialized IV + ciphertext pair representing one encrypted value at rest.
///
/// Stored as JSON text in the record gateway; both fields are hex. The IV is
/// fresh per encryption call and never reused, so encrypting the same value
/// twice produces different fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedField {
    /// 16-byte initialization vector, hex-encoded.
    pub iv: String,
    /// Ciphertext without the IV prefix, hex-encoded.
    pub content: String,
}

impl EncryptedField {
    /// Serialize to the JSON text stored in the database.
    pub fn to_json(&self) -> Result<String, VaultError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the JSON text stored in the database.
    pub fn from_json(text: &str) -> Result<Self, VaultError> {
        serde_json::from_str(text).map_err(|e| VaultError::MalformedField(e.to_string()))
    }
}

/// Symmetric cipher applied to vault fields.
///
/// Implementations can be swapped without changing the manager or the
/// record gateway.
pub trait Cipher: Send + Sync {
    /// Encrypt UTF-8 plaintext under a fresh random IV.
    fn encrypt(&self, plaintext: &str, key: &MasterKey) -> Result<EncryptedField, VaultError>;

    /// Decrypt a field produced by [`encrypt`](Self::encrypt).
    ///
    /// Fails with [`VaultError::Decryption`] when the key is wrong or the
    /// ciphertext is corrupted.
    fn decrypt(&self, field: &EncryptedField, key: &MasterKey) -> Result<String, VaultError>;
}
