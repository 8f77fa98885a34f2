//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection or transaction, builds the queries
//! for one table, and returns models from [`crate::db::models`]. Multi-table
//! sequences (saving, deleting) are composed from these repositories inside a
//! transaction by [`crate::db::PgStore`].

pub mod birthdays;
pub mod credentials;

pub use birthdays::Birthdays;
pub use credentials::Credentials;
