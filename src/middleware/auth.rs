use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StreamlineError;
use crate::types::auth::{SessionUser, SessionView};

pub const SESSION_COOKIE: &str = "streamline.session";

/// Payload sealed inside the private session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub uid: i64,
    pub email: String,
    /// Unix seconds.
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(
        uid: i64,
        email: impl Into<String>,
        ttl: ChronoDuration,
    ) -> Result<Self, StreamlineError> {
        let exp = Utc::now().checked_add_signed(ttl).ok_or_else(|| {
            StreamlineError::UnexpectedError(format!("session expiry out of range: {ttl}"))
        })?;
        Ok(Self {
            uid,
            email: email.into(),
            exp: exp.timestamp(),
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn user(&self) -> SessionUser {
        SessionUser {
            id: self.uid.to_string(),
            email: self.email.clone(),
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            user: self.user(),
            expires: self.expires_at(),
        }
    }
}

/// Seal `claims` into the jar.
pub fn issue_session(
    jar: PrivateCookieJar,
    claims: &SessionClaims,
    insecure_cookie: bool,
) -> Result<PrivateCookieJar, StreamlineError> {
    let value = serde_json::to_string(claims)?;
    let max_age = (claims.exp - Utc::now().timestamp()).max(0);
    let cookie = Cookie::build(Cookie::new(SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(!insecure_cookie)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age))
        .build();
    Ok(jar.add(cookie))
}

/// Decrypt and decode the session cookie. Tampered, undecodable and expired
/// cookies all read as no session.
pub fn read_session(jar: &PrivateCookieJar) -> Option<SessionClaims> {
    let cookie = jar.get(SESSION_COOKIE)?;
    let claims: SessionClaims = serde_json::from_str(cookie.value()).ok()?;
    (!claims.is_expired_at(Utc::now())).then_some(claims)
}

pub fn has_session_cookie(jar: &PrivateCookieJar) -> bool {
    jar.get(SESSION_COOKIE).is_some()
}

pub fn clear_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(Cookie::new(SESSION_COOKIE, "")).path("/").build())
}

/// Extractor for routes that need a signed-in user.
#[derive(Debug, Clone)]
pub struct RequireSession(pub SessionClaims);

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = StreamlineError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = match PrivateCookieJar::<Key>::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(never) => match never {},
        };
        read_session(&jar)
            .map(Self)
            .ok_or(StreamlineError::Unauthorized)
    }
}
