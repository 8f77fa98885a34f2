//! Database models for birthday records.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::BirthdayId;

/// Database request for creating a new birthday record.
///
/// Calendar components are stored exactly as the user submitted them; the
/// astronomy and trivia fields come from the provider payloads.
#[derive(Debug, Clone, Serialize)]
pub struct BirthdayCreateDBRequest {
    pub birth_day: String,
    pub birth_month: String,
    pub birth_year: String,
    pub nasa_name: String,
    pub nasa_url: String,
    pub fact_year: i32,
    pub fact_text: String,
}

/// Database response for a birthday record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BirthdayDBResponse {
    pub id: BirthdayId,
    pub birth_day: String,
    pub birth_month: String,
    pub birth_year: String,
    pub nasa_name: String,
    pub nasa_url: String,
    pub fact_year: i32,
    pub fact_text: String,
}
