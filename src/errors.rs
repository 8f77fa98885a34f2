use crate::db::errors::DbError;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error as ThisError;

/// Body sent when a username/password pair matches no stored credential.
///
/// The pages are plain server-rendered HTML, so the rejection is delivered the
/// same way: an inline script that alerts and bounces back to the index.
const INVALID_LOGIN_ALERT: &str = r#"<script>alert("Invalid USER or PASSWORD entered."); window.location="/"</script>"#;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Username/password pair matched no stored credential
    #[error("Invalid user or password")]
    InvalidCredentials,

    /// Credential is valid but does not own the addressed birthday record
    #[error("Credential does not own birthday record {id}")]
    Forbidden { id: i32 },

    /// Invalid request data
    #[error("{message}")]
    BadRequest { message: String },

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// An outbound provider call failed (network, non-2xx, or bad payload)
    #[error("Provider request failed")]
    Provider(#[source] anyhow::Error),

    /// Template rendering error
    #[error(transparent)]
    Template(#[from] minijinja::Error),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // The credential-mismatch path renders an alert page, not an error status
            Error::InvalidCredentials => StatusCode::OK,
            Error::Forbidden { .. } => StatusCode::FORBIDDEN,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            // Undifferentiated server error, regardless of which collaborator failed
            Error::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidCredentials => "Invalid user or password".to_string(),
            Error::Forbidden { .. } => "You do not have access to this birthday record".to_string(),
            Error::BadRequest { message } => message.clone(),
            Error::NotFound { resource, id } => format!("{resource} with ID {id} not found"),
            Error::Database(DbError::NotFound) => "Resource not found".to_string(),
            Error::Internal { .. }
            | Error::Database(DbError::Other(_))
            | Error::Provider(_)
            | Error::Template(_)
            | Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_))
            | Error::Internal { .. }
            | Error::Provider(_)
            | Error::Template(_)
            | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::InvalidCredentials | Error::Forbidden { .. } => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::BadRequest { .. } | Error::NotFound { .. } | Error::Database(DbError::NotFound) => {
                tracing::debug!("Client error: {}", self);
            }
        }

        match self {
            Error::InvalidCredentials => Html(INVALID_LOGIN_ALERT).into_response(),
            other => (other.status_code(), other.user_message()).into_response(),
        }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
