//! Sqlite-backed password record store.

use std::sync::Arc;

use {sqlx::SqlitePool, tracing::debug};

use memo_vault::{AesCbcCipher, Cipher, EncryptedField, KeySession, MasterKey, VaultError};

use crate::{
    error::PasswordStoreError,
    types::{NewPassword, PasswordEntry, PasswordSummary},
};

/// Password record gateway.
///
/// Generic over [`Cipher`] but defaults to [`AesCbcCipher`]. Secrets are
/// encrypted with the session's master key before insertion; the encrypted
/// text columns are opaque to this store.
pub struct PasswordStore<C: Cipher = AesCbcCipher> {
    pool: SqlitePool,
    cipher: C,
    session: Arc<KeySession>,
}

impl PasswordStore<AesCbcCipher> {
    /// Store with the default AES-CBC cipher.
    pub fn new(pool: SqlitePool, session: Arc<KeySession>) -> Self {
        Self::with_cipher(pool, AesCbcCipher, session)
    }
}

impl<C: Cipher> PasswordStore<C> {
    /// Store with a custom cipher.
    pub fn with_cipher(pool: SqlitePool, cipher: C, session: Arc<KeySession>) -> Self {
        Self {
            pool,
            cipher,
            session,
        }
    }

    /// Create a password entry. Requires an unlocked vault.
    ///
    /// Returns the generated record id.
    pub async fn create(&self, params: &NewPassword) -> Result<String, PasswordStoreError> {
        let key = self.require_key()?;
        let id = uuid::Uuid::new_v4().to_string();

        let password_enc = self.cipher.encrypt(&params.password, &key)?.to_json()?;
        let notes_enc = match params.notes.as_deref() {
            Some(notes) => Some(self.cipher.encrypt(notes, &key)?.to_json()?),
            None => None,
        };

        sqlx::query(
            "INSERT INTO passwords (id, service_name, username, password_enc, url, notes_enc, category_id)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&params.service_name)
        .bind(&params.username)
        .bind(&password_enc)
        .bind(&params.url)
        .bind(&notes_enc)
        .bind(params.category_id)
        .execute(&self.pool)
        .await?;

        debug!(id = %id, "password entry created");
        Ok(id)
    }

    /// List all entries without touching the encrypted columns.
    ///
    /// Works while the vault is locked — list views show metadata only.
    pub async fn list(&self) -> Result<Vec<PasswordSummary>, PasswordStoreError> {
        let rows: Vec<(String, String, String, Option<String>, Option<i64>)> = sqlx::query_as(
            "SELECT id, service_name, username, url, category_id
                 FROM passwords ORDER BY service_name, username",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, service_name, username, url, category_id)| PasswordSummary {
                    id,
                    service_name,
                    username,
                    url,
                    category_id,
                },
            )
            .collect())
    }

    /// Fetch and decrypt one entry. Requires an unlocked vault.
    ///
    /// Decryption failure (wrong key, corrupted ciphertext) propagates — the
    /// caller must surface a "cannot decrypt" state, not garbage.
    pub async fn get(&self, id: &str) -> Result<Option<PasswordEntry>, PasswordStoreError> {
        let key = self.require_key()?;

        let row: Option<(
            String,
            String,
            String,
            String,
            Option<String>,
            Option<String>,
            Option<i64>,
        )> = sqlx::query_as(
            "SELECT id, service_name, username, password_enc, url, notes_enc, category_id
                 FROM passwords WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some((id, service_name, username, password_enc, url, notes_enc, category_id)) = row
        else {
            return Ok(None);
        };

        let password = self.decrypt_column(&password_enc, &key)?;
        let notes = match notes_enc.as_deref() {
            Some(text) => Some(self.decrypt_column(text, &key)?),
            None => None,
        };

        Ok(Some(PasswordEntry {
            id,
            service_name,
            username,
            password,
            url,
            notes,
            category_id,
        }))
    }

    /// Delete an entry. Independent of key state — no decryption involved.
    pub async fn delete(&self, id: &str) -> Result<(), PasswordStoreError> {
        sqlx::query("DELETE FROM passwords WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        debug!(id, "password entry deleted");
        Ok(())
    }

    fn require_key(&self) -> Result<MasterKey, VaultError> {
        self.session.key().ok_or(VaultError::Locked)
    }

    fn decrypt_column(&self, text: &str, key: &MasterKey) -> Result<String, VaultError> {
        let field = EncryptedField::from_json(text)?;
        self.cipher.decrypt(&field, key)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> (Arc<KeySession>, PasswordStore) {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        crate::run_migrations(&pool).await.unwrap();

        let session = Arc::new(KeySession::new());
        let store = PasswordStore::new(pool, Arc::clone(&session));
        (session, store)
    }

    fn params() -> NewPassword {
        NewPassword {
            service_name: "example.com".to_string(),
            username: "alice".to_string(),
            password: "hunter2".to_string(),
            url: Some("https://example.com/login".to_string()),
            notes: Some("recovery codes in the drawer".to_string()),
            category_id: Some(3),
        }
    }

    #[tokio::test]
    async fn create_and_get_round_trip() {
        let (session, store) = store().await;
        session.store(MasterKey::generate());

        let id = store.create(&params()).await.unwrap();
        let entry = store.get(&id).await.unwrap().unwrap();

        assert_eq!(entry.service_name, "example.com");
        assert_eq!(entry.username, "alice");
        assert_eq!(entry.password, "hunter2");
        assert_eq!(entry.notes.as_deref(), Some("recovery codes in the drawer"));
        assert_eq!(entry.category_id, Some(3));
    }

    #[tokio::test]
    async fn secrets_are_not_stored_in_plaintext() {
        let (session, store) = store().await;
        session.store(MasterKey::generate());

        let id = store.create(&params()).await.unwrap();

        let (password_enc, notes_enc): (String, String) =
            sqlx::query_as("SELECT password_enc, notes_enc FROM passwords WHERE id = ?")
                .bind(&id)
                .fetch_one(&store.pool)
                .await
                .unwrap();
        assert!(!password_enc.contains("hunter2"));
        assert!(!notes_enc.contains("recovery"));

        // Stored as the serialized field structure.
        let field = EncryptedField::from_json(&password_enc).unwrap();
        assert_eq!(field.iv.len(), 32);
    }

    #[tokio::test]
    async fn create_while_locked_fails() {
        let (_session, store) = store().await;

        let result = store.create(&params()).await;
        assert!(matches!(
            result,
            Err(PasswordStoreError::Vault(VaultError::Locked))
        ));
    }

    #[tokio::test]
    async fn get_while_locked_fails() {
        let (session, store) = store().await;
        session.store(MasterKey::generate());
        let id = store.create(&params()).await.unwrap();

        session.clear();
        let result = store.get(&id).await;
        assert!(matches!(
            result,
            Err(PasswordStoreError::Vault(VaultError::Locked))
        ));
    }

    #[tokio::test]
    async fn list_works_while_locked() {
        let (session, store) = store().await;
        session.store(MasterKey::generate());
        store.create(&params()).await.unwrap();
        session.clear();

        let summaries = store.list().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].service_name, "example.com");
        assert_eq!(summaries[0].username, "alice");
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let (session, store) = store().await;
        session.store(MasterKey::generate());

        let entry = store.get("no-such-id").await.unwrap();
        assert!(entry.is_none());
    }

    #[tokio::test]
    async fn wrong_key_surfaces_decryption_error() {
        let (session, store) = store().await;
        session.store(MasterKey::generate());
        let id = store.create(&params()).await.unwrap();

        // Session re-keyed (e.g. corrupted store restore): reads must fail
        // visibly instead of returning garbage.
        session.clear();
        session.store(MasterKey::generate());

        let result = store.get(&id).await;
        assert!(matches!(
            result,
            Err(PasswordStoreError::Vault(VaultError::Decryption(_)))
        ));
    }

    #[tokio::test]
    async fn delete_works_while_locked() {
        let (session, store) = store().await;
        session.store(MasterKey::generate());
        let id = store.create(&params()).await.unwrap();
        session.clear();

        store.delete(&id).await.unwrap();
        let summaries = store.list().await.unwrap();
        assert!(summaries.is_empty());
    }

    #[tokio::test]
    async fn entry_without_notes_round_trips() {
        let (session, store) = store().await;
        session.store(MasterKey::generate());

        let mut p = params();
        p.notes = None;
        let id = store.create(&p).await.unwrap();

        let entry = store.get(&id).await.unwrap().unwrap();
        assert!(entry.notes.is_none());
    }
}
