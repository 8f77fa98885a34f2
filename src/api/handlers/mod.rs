//! HTTP request handlers.
//!
//! Handlers return [`crate::errors::Error`], which converts to the right
//! response shape: HTML pages on success, the inline credential alert for
//! failed logins, and plain status responses for everything else.

pub mod birthdays;
