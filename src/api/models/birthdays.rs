//! Form models for the birthday pages.

use serde::Deserialize;

/// Fields submitted to the create-with-detail flow.
///
/// Calendar components arrive as numeric strings and are stored verbatim;
/// `planets` is an opaque pass-through value echoed on the details page.
#[derive(Debug, Clone, Deserialize)]
pub struct BirthdayDetailsRequest {
    pub day: String,
    pub month: String,
    pub year: String,
    pub user_name: String,
    pub user_password: String,
    #[serde(default)]
    pub planets: String,
}

/// Fields submitted when renaming a record's astronomy title.
#[derive(Debug, Clone, Deserialize)]
pub struct BirthdayUpdateRequest {
    pub user_name: String,
    pub user_password: String,
    pub nasa_name: String,
}

/// Fields submitted when deleting a record.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialRequest {
    pub user_name: String,
    pub user_password: String,
}
