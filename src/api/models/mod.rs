//! Request models for the HTML form endpoints.

pub mod birthdays;
