//! Master key representation and generation.

use zeroize::Zeroizing;

use crate::error::VaultError;

/// Master key length in raw bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// The single symmetric secret protecting all vault fields on a device.
///
/// Held as a 64-character lowercase hex string, matching the at-rest form in
/// the secure store. Zeroized on drop; `Debug` is redacted.
#[derive(Clone)]
pub struct MasterKey(Zeroizing<String>);

impl MasterKey {
    /// Generate a fresh 256-bit key from the OS CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        use rand::RngCore;

        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        rand::rng().fill_bytes(bytes.as_mut());
        Self(Zeroizing::new(hex::encode(bytes.as_ref())))
    }

    /// Parse a key from its hex form, validating the shape.
    pub fn from_hex(hex_str: &str) -> Result<Self, VaultError> {
        let bytes = hex::decode(hex_str).map_err(|e| VaultError::MalformedKey(e.to_string()))?;
        if bytes.len() != KEY_LEN {
            return Err(VaultError::MalformedKey(format!(
                "expected {KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self(Zeroizing::new(hex_str.to_ascii_lowercase())))
    }

    /// Hex form, as persisted in the secure store.
    #[must_use]
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Raw key bytes for the cipher.
    pub fn to_bytes(&self) -> Result<Zeroizing<[u8; KEY_LEN]>, VaultError> {
        let decoded = hex::decode(self.0.as_str())
            .map_err(|e| VaultError::MalformedKey(e.to_string()))?;
        if decoded.len() != KEY_LEN {
            return Err(VaultError::MalformedKey(format!(
                "expected {KEY_LEN} bytes, got {}",
                decoded.len()
            )));
        }
        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        bytes.copy_from_slice(&decoded);
        Ok(bytes)
    }
}

impl PartialEq for MasterKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_str() == other.0.as_str()
    }
}

impl Eq for MasterKey {}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_is_64_hex_chars() {
        let key = MasterKey::generate();
        assert_eq!(key.as_hex().len(), 64);
        assert!(key.as_hex().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generate_is_random() {
        assert_ne!(MasterKey::generate(), MasterKey::generate());
    }

    #[test]
    fn from_hex_round_trip() {
        let key = MasterKey::generate();
        let parsed = MasterKey::from_hex(key.as_hex()).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn from_hex_normalizes_case() {
        let key = MasterKey::generate();
        let upper = key.as_hex().to_ascii_uppercase();
        let parsed = MasterKey::from_hex(&upper).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        let result = MasterKey::from_hex("abcd");
        assert!(matches!(result, Err(VaultError::MalformedKey(_))));
    }

    #[test]
    fn from_hex_rejects_non_hex() {
        let result = MasterKey::from_hex(&"zz".repeat(32));
        assert!(matches!(result, Err(VaultError::MalformedKey(_))));
    }

    #[test]
    fn to_bytes_matches_hex() {
        let key = MasterKey::generate();
        let bytes = key.to_bytes().unwrap();
        assert_eq!(hex::encode(bytes.as_ref()), key.as_hex());
    }

    #[test]
    fn debug_is_redacted() {
        let key = MasterKey::generate();
        assert_eq!(format!("{key:?}"), "MasterKey(..)");
    }
}
