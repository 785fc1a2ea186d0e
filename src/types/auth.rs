//! Request and response bodies of the `/api/auth` routes, shared by the
//! server handlers and the HTTP client.

use crate::error::StreamlineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MSG_FIELDS_REQUIRED: &str = "Email and password are required";
pub const MSG_INVALID_BODY: &str = "Invalid request body";
pub const MSG_INVALID_EMAIL: &str = "Invalid email address";
pub const MSG_USER_CREATED: &str = "User created successfully";

/// Raw `{email, password}` body. Both fields are optional so that absence is
/// reported as a validation error rather than a deserialization failure.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CredentialsBody {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Credentials that passed validation. `email` is normalized.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl CredentialsBody {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    /// Parse a JSON request body. Anything that is not an object with the
    /// expected field types is a validation error.
    pub fn from_json(body: &[u8]) -> Result<Self, StreamlineError> {
        serde_json::from_slice(body).map_err(|_| StreamlineError::validation(MSG_INVALID_BODY))
    }

    pub fn validate(self) -> Result<Credentials, StreamlineError> {
        let email = self.email.filter(|e| !e.trim().is_empty());
        let password = self.password.filter(|p| !p.is_empty());
        let (Some(email), Some(password)) = (email, password) else {
            return Err(StreamlineError::validation(MSG_FIELDS_REQUIRED));
        };
        let email = normalize_email(&email);
        if !is_valid_email(&email) {
            return Err(StreamlineError::validation(MSG_INVALID_EMAIL));
        }
        Ok(Credentials { email, password })
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// One `@`, non-empty local part and domain, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninResponse {
    pub ok: bool,
    pub user: SessionUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub user: SessionUser,
    pub expires: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}
