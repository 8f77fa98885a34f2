//! Database repository for user credentials.

use sqlx::PgConnection;
use tracing::instrument;

use crate::db::{
    CredentialId,
    errors::Result,
    models::credentials::{CredentialCreateDBRequest, CredentialDBResponse},
};

pub struct Credentials<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Credentials<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Exact name+password match. Returns the first matching row, mirroring
    /// the lookup every mutation flow performs.
    #[instrument(skip_all, err)]
    pub async fn find_by_login(&mut self, user_name: &str, user_password: &str) -> Result<Option<CredentialDBResponse>> {
        let credential = sqlx::query_as::<_, CredentialDBResponse>(
            "SELECT * FROM users WHERE user_name = $1 AND user_password = $2",
        )
        .bind(user_name)
        .bind(user_password)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(credential)
    }

    /// Insert a credential referencing the most recently inserted birthday
    /// record. Identity assignment is monotonic, so MAX(id) is the row the
    /// caller just created; callers must hold a transaction spanning both
    /// inserts.
    #[instrument(skip_all, err)]
    pub async fn create_for_latest_birthday(&mut self, request: &CredentialCreateDBRequest) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (user_name, user_password, birthday_id)
             VALUES ($1, $2, (SELECT MAX(id) FROM birthday))",
        )
        .bind(&request.user_name)
        .bind(&request.user_password)
        .execute(&mut *self.db)
        .await?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&mut self, user_id: CredentialId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
