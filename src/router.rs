use crate::config::AuthConfig;
use crate::db::Database;
use crate::error::StreamlineError;
use crate::handlers::{auth, health};
use crate::service::{AccountService, SigninLimiter};
use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use chrono::{Duration as ChronoDuration, Utc};
use std::{any::Any, sync::Arc};
use tower_http::catch_panic::CatchPanicLayer;
use tracing::warn;

const BODY_LIMIT: usize = 64 * 1024;
/// Ten years.
const MAX_SESSION_TTL_HOURS: u32 = 24 * 365 * 10;

#[derive(Clone)]
pub struct StreamlineState {
    pub db: Arc<Database>,
    pub accounts: AccountService,
    pub limiter: Arc<SigninLimiter>,
    pub session_ttl: ChronoDuration,
    pub insecure_cookie: bool,
    key: Key,
}

impl StreamlineState {
    pub fn new(db: Arc<Database>, auth: &AuthConfig) -> Result<Self, StreamlineError> {
        Ok(Self {
            db,
            accounts: AccountService::new(auth.min_password_length),
            limiter: Arc::new(SigninLimiter::per_minute(auth.signin_attempts_per_minute)),
            session_ttl: session_ttl(auth.session_ttl_hours)?,
            insecure_cookie: auth.insecure_cookie,
            key: session_key(&auth.session_secret)?,
        })
    }
}

impl FromRef<StreamlineState> for Key {
    fn from_ref(state: &StreamlineState) -> Self {
        state.key.clone()
    }
}

fn session_ttl(hours: u32) -> Result<ChronoDuration, StreamlineError> {
    if hours == 0 || hours > MAX_SESSION_TTL_HOURS {
        return Err(StreamlineError::Config(format!(
            "auth.session_ttl_hours must be between 1 and {MAX_SESSION_TTL_HOURS}, got {hours}"
        )));
    }
    let ttl = ChronoDuration::hours(i64::from(hours));
    Utc::now()
        .checked_add_signed(ttl)
        .map(|_| ttl)
        .ok_or_else(|| {
            StreamlineError::Config(format!("auth.session_ttl_hours {hours} overflows"))
        })
}

fn session_key(secret: &str) -> Result<Key, StreamlineError> {
    if secret.is_empty() {
        warn!("auth.session_secret not set; sessions will not survive a restart");
        return Ok(Key::generate());
    }
    if secret.len() < 32 {
        return Err(StreamlineError::Config(
            "auth.session_secret must be at least 32 bytes".to_string(),
        ));
    }
    Ok(Key::derive_from(secret.as_bytes()))
}

/// Turn a handler panic into the generic 500 body.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    StreamlineError::UnexpectedError(format!("handler panicked: {detail}")).into_response()
}

/// Layers shared by every route: the body cap and the panic boundary.
pub fn with_request_boundary<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CatchPanicLayer::custom(panic_response))
}

pub fn streamline_router(state: StreamlineState) -> Router {
    let router = Router::new()
        .route("/api/auth/register", post(auth::register_handler))
        .route(
            "/api/auth/callback/credentials",
            post(auth::credentials_signin_handler),
        )
        .route("/api/auth/session", get(auth::session_handler))
        .route("/api/auth/signout", post(auth::signout_handler))
        .route("/api/me", get(auth::me_handler))
        .route("/health", get(health::health_handler));
    with_request_boundary(router).with_state(state)
}
