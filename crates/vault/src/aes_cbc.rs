//! AES-256-CBC implementation of the [`Cipher`] trait.

use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use rand::RngCore;

use crate::{
    cipher::{Cipher, EncryptedField},
    error::VaultError,
    key::MasterKey,
};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// IV size for AES-CBC (16 bytes).
const IV_LEN: usize = 16;

/// AES-256-CBC with PKCS7 padding and a fresh random IV per call.
///
/// No authentication tag: tampering is not detected, and decryption of
/// corrupted ciphertext fails only via the padding check (or UTF-8
/// validation) or produces garbage. Kept for compatibility with existing
/// vault records; see DESIGN.md.
pub struct AesCbcCipher;

impl Cipher for AesCbcCipher {
    fn encrypt(&self, plaintext: &str, key: &MasterKey) -> Result<EncryptedField, VaultError> {
        let key_bytes = key.to_bytes()?;

        let mut iv = [0u8; IV_LEN];
        rand::rng().fill_bytes(&mut iv);

        let ciphertext = Aes256CbcEnc::new_from_slices(key_bytes.as_ref(), &iv)
            .map_err(|e| VaultError::Cipher(e.to_string()))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        Ok(EncryptedField {
            iv: hex::encode(iv),
            content: hex::encode(ciphertext),
        })
    }

    fn decrypt(&self, field: &EncryptedField, key: &MasterKey) -> Result<String, VaultError> {
        let key_bytes = key.to_bytes()?;

        let iv = hex::decode(&field.iv).map_err(|e| VaultError::MalformedField(e.to_string()))?;
        if iv.len() != IV_LEN {
            return Err(VaultError::MalformedField(format!(
                "iv must be {IV_LEN} bytes, got {}",
                iv.len()
            )));
        }
        let ciphertext =
            hex::decode(&field.content).map_err(|e| VaultError::MalformedField(e.to_string()))?;

        let plaintext = Aes256CbcDec::new_from_slices(key_bytes.as_ref(), &iv)
            .map_err(|e| VaultError::Cipher(e.to_string()))?
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| VaultError::Decryption("padding check failed".to_string()))?;

        String::from_utf8(plaintext).map_err(|e| VaultError::Decryption(e.to_string()))
    }
}
