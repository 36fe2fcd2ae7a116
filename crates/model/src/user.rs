use alloc::string::String;
use serde::{Deserialize, Serialize};

/// Login or registration form.
#[derive(Clone, Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
}

/// What a successful registration or login hands back to the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Session {
    pub id: String,
    /// Bearer token to be sent in the `Authorization` header.
    pub token: String,
}
