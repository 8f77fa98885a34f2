//! Database record models matching table schemas.
//!
//! Each struct corresponds to a row of one of the two tables (`birthday`,
//! `users`) or to the data needed to insert one. Database models derive
//! `sqlx::FromRow` for query results and stay distinct from the API form
//! models so storage and request shapes can evolve independently.

pub mod birthdays;
pub mod credentials;
