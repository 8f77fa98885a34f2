//! Database models for user credentials.
//!
//! A credential is a plain name/password pair gating mutation of exactly one
//! birthday record. Passwords are compared by equality, never hashed; that is
//! the product's documented (weak) scheme, kept as-is.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::{BirthdayId, CredentialId};

/// Database request for creating a new credential
#[derive(Debug, Clone)]
pub struct CredentialCreateDBRequest {
    pub user_name: String,
    pub user_password: String,
}

/// Database response for a credential
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CredentialDBResponse {
    pub user_id: CredentialId,
    pub user_name: String,
    pub user_password: String,
    pub birthday_id: BirthdayId,
}
