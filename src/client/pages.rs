//! Form state machines behind the login, register and home pages.
//!
//! Each page goes `Idle -> Submitting -> Success | Error` and reports where the
//! UI should navigate next. Rendering is left to the caller.

use crate::client::api::StreamlineClient;
use crate::client::gallery::{Gallery, GalleryError, MediaItem};
use crate::error::ClientError;
use crate::types::auth::SessionUser;
use std::time::Duration;
use tracing::{debug, warn};

pub const MSG_PASSWORDS_MISMATCH: &str = "Passwords do not match";
pub const MSG_REGISTRATION_FAILED: &str = "Registration failed";
pub const MSG_SIGNING_IN: &str = "Account created successfully! Signing you in...";
pub const MSG_REDIRECTING_TO_LOGIN: &str = "Account created successfully! Redirecting to login...";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials";

pub const LOGIN_REDIRECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Idle,
    Submitting,
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Home,
    Login { after: Duration },
}

fn message_of(err: &ClientError, fallback: &str) -> String {
    match err {
        ClientError::Api { message, .. } => message.clone(),
        _ => fallback.to_string(),
    }
}

#[derive(Debug, Default)]
pub struct LoginPage {
    pub email: String,
    pub password: String,
    pub state: FormState,
}

impl LoginPage {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            state: FormState::Idle,
        }
    }

    pub async fn submit(&mut self, client: &StreamlineClient) -> Navigation {
        self.state = FormState::Submitting;
        match client.sign_in(&self.email, &self.password).await {
            Ok(user) => {
                debug!(user_id = %user.id, "login succeeded");
                self.state = FormState::Success(format!("Signed in as {}", user.email));
                Navigation::Home
            }
            Err(e) => {
                self.state = FormState::Error(message_of(&e, MSG_INVALID_CREDENTIALS));
                Navigation::Stay
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct RegisterPage {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub state: FormState,
}

impl RegisterPage {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
            state: FormState::Idle,
        }
    }

    /// Register, then try to sign in with the same credentials.
    pub async fn submit(&mut self, client: &StreamlineClient) -> Navigation {
        if self.password != self.confirm_password {
            self.state = FormState::Error(MSG_PASSWORDS_MISMATCH.to_string());
            return Navigation::Stay;
        }

        self.state = FormState::Submitting;
        if let Err(e) = client.register(&self.email, &self.password).await {
            self.state = FormState::Error(message_of(&e, MSG_REGISTRATION_FAILED));
            return Navigation::Stay;
        }

        self.state = FormState::Success(MSG_SIGNING_IN.to_string());
        match client.sign_in(&self.email, &self.password).await {
            Ok(_) => Navigation::Home,
            Err(e) => {
                warn!(error = %e, "auto sign-in after registration failed");
                self.state = FormState::Success(MSG_REDIRECTING_TO_LOGIN.to_string());
                Navigation::Login {
                    after: LOGIN_REDIRECT_DELAY,
                }
            }
        }
    }
}

/// Home page: who is signed in, plus the local gallery.
#[derive(Debug, Default)]
pub struct HomePage {
    pub user: Option<SessionUser>,
    pub gallery: Gallery,
}

impl HomePage {
    pub async fn load(client: &StreamlineClient) -> Result<Self, ClientError> {
        let user = client.session().await?.map(|s| s.user);
        Ok(Self {
            user,
            gallery: Gallery::new(),
        })
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn upload(
        &mut self,
        url: impl Into<String>,
        content_type: &str,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<usize, GalleryError> {
        let item = MediaItem::new(url, content_type, title, description)?;
        Ok(self.gallery.add(item))
    }

    pub async fn sign_out(&mut self, client: &StreamlineClient) -> Result<(), ClientError> {
        client.sign_out().await?;
        self.user = None;
        Ok(())
    }
}
