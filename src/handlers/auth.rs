use crate::middleware::auth::{
    RequireSession, SessionClaims, clear_session, has_session_cookie, issue_session, read_session,
};
use crate::types::auth::{
    CredentialsBody, MSG_USER_CREATED, OkResponse, RegisterResponse, SessionView, SigninResponse,
    UserView,
};
use crate::{StreamlineError, router::StreamlineState};
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::info;

/// POST /api/auth/register -> 201 `{message, userId}`.
///
/// The body is parsed by hand so that a missing content type or malformed
/// JSON is a 400 like any other validation failure.
pub async fn register_handler(
    State(state): State<StreamlineState>,
    body: Bytes,
) -> Result<impl IntoResponse, StreamlineError> {
    let creds = CredentialsBody::from_json(&body)?.validate()?;
    let id = state.accounts.register(&state.db, creds).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: MSG_USER_CREATED.to_string(),
            user_id: id.to_string(),
        }),
    ))
}

/// POST /api/auth/callback/credentials -> verifies email/password and sets the session cookie.
pub async fn credentials_signin_handler(
    State(state): State<StreamlineState>,
    jar: PrivateCookieJar,
    body: Bytes,
) -> Result<impl IntoResponse, StreamlineError> {
    let creds = CredentialsBody::from_json(&body)?.validate()?;
    if !state.limiter.check(&creds.email) {
        return Err(StreamlineError::RateLimited);
    }

    let user = state.accounts.authenticate(&state.db, creds).await?;
    let claims = SessionClaims::new(user.id, user.email, state.session_ttl)?;
    let jar = issue_session(jar, &claims, state.insecure_cookie)?;

    Ok((
        jar,
        Json(SigninResponse {
            ok: true,
            user: claims.user(),
        }),
    ))
}

/// GET /api/auth/session -> current session, or `null`. Stale cookies are cleared.
pub async fn session_handler(jar: PrivateCookieJar) -> impl IntoResponse {
    match read_session(&jar) {
        Some(claims) => (jar, Json(Some(claims.view()))),
        None if has_session_cookie(&jar) => (clear_session(jar), Json(None::<SessionView>)),
        None => (jar, Json(None)),
    }
}

/// POST /api/auth/signout
pub async fn signout_handler(jar: PrivateCookieJar) -> impl IntoResponse {
    if let Some(claims) = read_session(&jar) {
        info!(user_id = claims.uid, "signed out");
    }
    (clear_session(jar), Json(OkResponse { ok: true }))
}

/// GET /api/me -> the stored record of the signed-in user.
pub async fn me_handler(
    State(state): State<StreamlineState>,
    RequireSession(claims): RequireSession,
) -> Result<Json<UserView>, StreamlineError> {
    let storage = state.db.storage().await?;
    let user = storage
        .find_by_id(claims.uid)
        .await?
        .ok_or(StreamlineError::Unauthorized)?;
    Ok(Json(user.into()))
}
