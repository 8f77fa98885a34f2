//! Database layer for data persistence and access.
//!
//! The layer has two levels:
//!
//! - [`handlers`]: repositories over a `PgConnection`, one per table, owning
//!   query construction and parameter binding
//! - [`Store`]: the capability handlers actually receive. It is an object-safe
//!   trait so request handlers can be exercised against an in-memory
//!   implementation without a live database; [`PgStore`] is the production
//!   implementation, composing the repositories and wrapping every
//!   multi-statement sequence in a transaction.
//!
//! Migrations live in `migrations/` and are exposed via [`crate::migrator`].

pub mod errors;
pub mod handlers;
pub mod models;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use self::{
    errors::Result,
    handlers::{Birthdays, Credentials},
    models::{
        birthdays::{BirthdayCreateDBRequest, BirthdayDBResponse},
        credentials::{CredentialCreateDBRequest, CredentialDBResponse},
    },
};

pub type BirthdayId = i32;
pub type CredentialId = i32;

/// Store-access capability handed to the request handlers.
///
/// One implementation talks to PostgreSQL ([`PgStore`]); tests substitute an
/// in-memory one with identical branch semantics.
#[async_trait]
pub trait Store: Send + Sync {
    /// All birthday records, natural order.
    async fn list_birthdays(&self) -> Result<Vec<BirthdayDBResponse>>;

    /// One birthday record by identity.
    async fn get_birthday(&self, id: BirthdayId) -> Result<Option<BirthdayDBResponse>>;

    /// Replace a record's astronomy title, returning the updated row.
    async fn update_nasa_name(&self, id: BirthdayId, nasa_name: &str) -> Result<Option<BirthdayDBResponse>>;

    /// Exact name+password credential lookup.
    async fn find_credential(&self, user_name: &str, user_password: &str) -> Result<Option<CredentialDBResponse>>;

    /// The save procedure: insert the birthday record, and insert a credential
    /// referencing it only when the name+password pair is not already on file.
    /// A pair that is already on file keeps its original `birthday_id`; the new
    /// record ends up unreferenced. That asymmetry is intentional product
    /// behavior, not a bug to fix here.
    async fn save_birthday(&self, birthday: &BirthdayCreateDBRequest, credential: &CredentialCreateDBRequest) -> Result<()>;

    /// Delete a credential and the birthday record it references, credential
    /// first.
    async fn delete_birthday_and_credential(&self, credential: &CredentialDBResponse) -> Result<()>;
}

/// PostgreSQL-backed [`Store`].
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_birthdays(&self) -> Result<Vec<BirthdayDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Birthdays::new(&mut conn).list().await
    }

    async fn get_birthday(&self, id: BirthdayId) -> Result<Option<BirthdayDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Birthdays::new(&mut conn).get_by_id(id).await
    }

    async fn update_nasa_name(&self, id: BirthdayId, nasa_name: &str) -> Result<Option<BirthdayDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Birthdays::new(&mut conn).update_nasa_name(id, nasa_name).await
    }

    async fn find_credential(&self, user_name: &str, user_password: &str) -> Result<Option<CredentialDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Credentials::new(&mut conn).find_by_login(user_name, user_password).await
    }

    #[instrument(skip_all, fields(birth_year = %birthday.birth_year), err)]
    async fn save_birthday(&self, birthday: &BirthdayCreateDBRequest, credential: &CredentialCreateDBRequest) -> Result<()> {
        // One transaction spans the lookup and both inserts, so the MAX(id)
        // credential link cannot race a concurrent save.
        let mut tx = self.pool.begin().await?;

        let existing = Credentials::new(&mut tx)
            .find_by_login(&credential.user_name, &credential.user_password)
            .await?;

        Birthdays::new(&mut tx).create(birthday).await?;

        if existing.is_none() {
            Credentials::new(&mut tx).create_for_latest_birthday(credential).await?;
        }

        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip_all, fields(birthday_id = credential.birthday_id), err)]
    async fn delete_birthday_and_credential(&self, credential: &CredentialDBResponse) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        // Credential first, then the record it references.
        Credentials::new(&mut tx).delete(credential.user_id).await?;
        Birthdays::new(&mut tx).delete(credential.birthday_id).await?;

        tx.commit().await?;

        Ok(())
    }
}
