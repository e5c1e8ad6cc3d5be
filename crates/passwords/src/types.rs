//! Password record types.

use serde::{Deserialize, Serialize};

/// Parameters for creating a password entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPassword {
    pub service_name: String,
    pub username: String,
    /// Plaintext secret; encrypted before it touches the database.
    pub password: String,
    pub url: Option<String>,
    /// Optional plaintext notes; encrypted when present.
    pub notes: Option<String>,
    pub category_id: Option<i64>,
}

/// Row without decrypted secrets, for list views. Safe to build while the
/// vault is locked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordSummary {
    pub id: String,
    pub service_name: String,
    pub username: String,
    pub url: Option<String>,
    pub category_id: Option<i64>,
}

/// Fully decrypted entry, for the detail view. Requires an unlocked vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordEntry {
    pub id: String,
    pub service_name: String,
    pub username: String,
    pub password: String,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub category_id: Option<i64>,
}
