use crate::error::{ApiErrorResponse, ClientError};
use crate::types::auth::{
    CredentialsBody, OkResponse, RegisterResponse, SessionUser, SessionView, SigninResponse,
};
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Typed client for the StreamLine HTTP API. Keeps the session cookie
/// between calls, like a browser would.
#[derive(Clone)]
pub struct StreamlineClient {
    http: reqwest::Client,
    base: Url,
}

impl StreamlineClient {
    pub fn new(base: Url) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent("streamline-client/0.1".to_string())
            .cookie_store(true)
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self { http, base })
    }

    /// POST /api/auth/register
    pub async fn register(
        &self,
        email: &str,
        password: &str,
    ) -> Result<RegisterResponse, ClientError> {
        let resp = self
            .http
            .post(self.base.join("/api/auth/register")?)
            .json(&CredentialsBody::new(email, password))
            .send()
            .await?;
        Self::parse(resp, "Registration failed").await
    }

    /// POST /api/auth/callback/credentials
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser, ClientError> {
        let resp = self
            .http
            .post(self.base.join("/api/auth/callback/credentials")?)
            .json(&CredentialsBody::new(email, password))
            .send()
            .await?;
        let body: SigninResponse = Self::parse(resp, "Sign in failed").await?;
        Ok(body.user)
    }

    /// GET /api/auth/session
    pub async fn session(&self) -> Result<Option<SessionView>, ClientError> {
        let resp = self
            .http
            .get(self.base.join("/api/auth/session")?)
            .send()
            .await?;
        Self::parse(resp, "Session lookup failed").await
    }

    /// POST /api/auth/signout
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.base.join("/api/auth/signout")?)
            .send()
            .await?;
        let _: OkResponse = Self::parse(resp, "Sign out failed").await?;
        Ok(())
    }

    async fn parse<T: DeserializeOwned>(resp: Response, fallback: &str) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<T>().await?);
        }
        let body = resp.bytes().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            message: error_message(&body).unwrap_or_else(|| fallback.to_string()),
        })
    }
}

/// Pull `error`, then `message`, out of an error body.
fn error_message(body: &[u8]) -> Option<String> {
    if let Ok(ApiErrorResponse { error }) = serde_json::from_slice(body) {
        return Some(error);
    }
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}
