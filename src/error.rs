use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum StreamlineError {
    #[error("{0}")]
    Validation(String),

    #[error("User already exists")]
    UserExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Too many sign-in attempts")]
    RateLimited,

    #[error("Database unavailable: {0}")]
    DatabaseUnavailable(#[source] SqlxError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl StreamlineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::UserExists => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::DatabaseUnavailable(_)
            | Self::DatabaseError(_)
            | Self::PasswordHash(_)
            | Self::Json(_)
            | Self::Config(_)
            | Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StreamlineError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match &self {
            Self::Validation(_)
            | Self::UserExists
            | Self::InvalidCredentials
            | Self::Unauthorized
            | Self::RateLimited => self.to_string(),
            Self::DatabaseUnavailable(_) => {
                error!(error = %self, "database connection failed");
                "Database connection failed".to_string()
            }
            _ => {
                error!(error = %self, "request failed");
                "Internal server error".to_string()
            }
        };
        (status, Json(ApiErrorResponse { error: message })).into_response()
    }
}

/// Error body returned by every route.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

/// Failures seen by the HTTP client. Server messages are kept verbatim.
#[derive(Debug, ThisError)]
pub enum ClientError {
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Reqwest(e) => e.status().map(|s| s.as_u16()),
            Self::UrlParse(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: StreamlineError) -> (StatusCode, String) {
        let resp = err.into_response();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let parsed: ApiErrorResponse = serde_json::from_slice(&body).unwrap();
        (status, parsed.error)
    }

    #[tokio::test]
    async fn client_errors_keep_their_message() {
        assert_eq!(
            render(StreamlineError::UserExists).await,
            (StatusCode::BAD_REQUEST, "User already exists".to_string())
        );
        assert_eq!(
            render(StreamlineError::validation("Email and password are required")).await,
            (
                StatusCode::BAD_REQUEST,
                "Email and password are required".to_string()
            )
        );
        assert_eq!(
            render(StreamlineError::InvalidCredentials).await,
            (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
        );
    }

    #[tokio::test]
    async fn server_errors_are_masked() {
        let (status, msg) = render(StreamlineError::DatabaseError(SqlxError::RowNotFound)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(msg, "Internal server error");

        let (status, msg) =
            render(StreamlineError::DatabaseUnavailable(SqlxError::PoolClosed)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(msg, "Database connection failed");
    }
}
