//! HTTP layer: route handlers and the form models they deserialize.
//!
//! All pages are server-rendered HTML; there is no JSON surface. Routes are
//! wired up in [`crate::build_router`].

pub mod handlers;
pub mod models;
