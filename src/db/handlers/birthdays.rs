//! Database repository for birthday records.

use sqlx::PgConnection;
use tracing::instrument;

use crate::db::{
    BirthdayId,
    errors::Result,
    models::birthdays::{BirthdayCreateDBRequest, BirthdayDBResponse},
};

pub struct Birthdays<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Birthdays<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// All records, in the store's natural return order (no filter, no pagination).
    #[instrument(skip(self), err)]
    pub async fn list(&mut self) -> Result<Vec<BirthdayDBResponse>> {
        let birthdays = sqlx::query_as::<_, BirthdayDBResponse>("SELECT * FROM birthday")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(birthdays)
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, id: BirthdayId) -> Result<Option<BirthdayDBResponse>> {
        let birthday = sqlx::query_as::<_, BirthdayDBResponse>("SELECT * FROM birthday WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(birthday)
    }

    #[instrument(skip(self, request), fields(birth_year = %request.birth_year), err)]
    pub async fn create(&mut self, request: &BirthdayCreateDBRequest) -> Result<BirthdayDBResponse> {
        let birthday = sqlx::query_as::<_, BirthdayDBResponse>(
            "INSERT INTO birthday (birth_day, birth_month, birth_year, nasa_name, nasa_url, fact_year, fact_text)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(&request.birth_day)
        .bind(&request.birth_month)
        .bind(&request.birth_year)
        .bind(&request.nasa_name)
        .bind(&request.nasa_url)
        .bind(request.fact_year)
        .bind(&request.fact_text)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(birthday)
    }

    /// Replace the astronomy title only, returning the updated row.
    #[instrument(skip(self, nasa_name), err)]
    pub async fn update_nasa_name(&mut self, id: BirthdayId, nasa_name: &str) -> Result<Option<BirthdayDBResponse>> {
        let birthday = sqlx::query_as::<_, BirthdayDBResponse>(
            "UPDATE birthday SET nasa_name = $1 WHERE id = $2 RETURNING *",
        )
        .bind(nasa_name)
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(birthday)
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&mut self, id: BirthdayId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM birthday WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
