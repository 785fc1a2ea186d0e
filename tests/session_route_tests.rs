mod common;

use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum_extra::extract::cookie::{Key, PrivateCookieJar};
use chrono::Utc;
use common::TestApp;
use serde_json::Value;
use streamline::config::AuthConfig;
use streamline::middleware::auth::{SessionClaims, issue_session};

const REGISTER: &str = "/api/auth/register";
const SIGNIN: &str = "/api/auth/callback/credentials";
const SESSION: &str = "/api/auth/session";
const SIGNOUT: &str = "/api/auth/signout";
const ME: &str = "/api/me";

async fn registered(tag: &str) -> TestApp {
    let app = TestApp::new(tag);
    let (status, _, _) = app
        .post_json(REGISTER, r#"{"email":"a@b.com","password":"correct horse"}"#)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    app
}

#[tokio::test]
async fn signin_issues_a_session_cookie() {
    let app = registered("signin-ok").await;

    let (status, cookie, json) = app
        .post_json(SIGNIN, r#"{"email":"A@b.com","password":"correct horse"}"#)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["user"]["email"], "a@b.com");
    let cookie = cookie.expect("session cookie set");
    assert!(cookie.starts_with("streamline.session="));
    // sealed, so the email is not readable from the cookie value
    assert!(!cookie.contains("a@b.com"));

    let (status, _, session) = app.get(SESSION, Some(cookie.as_str())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["user"]["email"], "a@b.com");
    assert_eq!(session["user"]["id"], json["user"]["id"]);
    assert!(session["expires"].is_string());

    let (status, _, me) = app.get(ME, Some(cookie.as_str())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "a@b.com");
    assert!(me["createdAt"].is_string());

    app.cleanup().await;
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let app = registered("signin-generic").await;

    let (wrong_status, wrong_cookie, wrong_body) = app
        .post_json(SIGNIN, r#"{"email":"a@b.com","password":"wrong"}"#)
        .await;
    let (unknown_status, unknown_cookie, unknown_body) = app
        .post_json(SIGNIN, r#"{"email":"nobody@b.com","password":"wrong"}"#)
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["error"], "Invalid credentials");
    assert!(wrong_cookie.is_none());
    assert!(unknown_cookie.is_none());

    app.cleanup().await;
}

#[tokio::test]
async fn signin_requires_both_fields() {
    let app = registered("signin-missing").await;
    let (status, _, json) = app.post_json(SIGNIN, r#"{"email":"a@b.com"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Email and password are required");
    app.cleanup().await;
}

#[tokio::test]
async fn anonymous_requests_have_no_session() {
    let app = TestApp::new("session-anon");

    let (status, _, json) = app.get(SESSION, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, Value::Null);

    let (status, _, json) = app.get(ME, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Unauthorized");

    // a forged cookie does not decrypt
    let (status, _, _) = app
        .get(ME, Some(r#"streamline.session={"uid":1,"email":"a@b.com","exp":9999999999}"#))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    app.cleanup().await;
}

#[tokio::test]
async fn expired_session_cookie_is_cleared() {
    let secret = "k".repeat(32);
    let app = TestApp::with_auth(
        "session-expired",
        AuthConfig {
            session_secret: secret.clone(),
            ..common::test_auth_config()
        },
    );

    // seal an already-expired session with the server's key
    let claims = SessionClaims {
        uid: 1,
        email: "a@b.com".into(),
        exp: Utc::now().timestamp() - 60,
    };
    let jar = PrivateCookieJar::new(Key::derive_from(secret.as_bytes()));
    let jar = issue_session(jar, &claims, true).unwrap();
    let resp = jar.into_response();
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("sealed cookie")
        .to_string();

    let (status, cleared, json) = app.get(SESSION, Some(cookie.as_str())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, Value::Null);
    assert_eq!(cleared.as_deref(), Some("streamline.session="));

    let (status, _, _) = app.get(ME, Some(cookie.as_str())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    app.cleanup().await;
}

#[tokio::test]
async fn signout_clears_the_cookie() {
    let app = registered("signout").await;
    let (_, cookie, _) = app
        .post_json(SIGNIN, r#"{"email":"a@b.com","password":"correct horse"}"#)
        .await;
    let cookie = cookie.expect("session cookie set");

    let (status, cleared, json) = app.post_with_cookie(SIGNOUT, &cookie).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(cleared.as_deref(), Some("streamline.session="));

    app.cleanup().await;
}

#[tokio::test]
async fn repeated_signin_failures_are_throttled() {
    let app = TestApp::with_auth(
        "signin-throttle",
        AuthConfig {
            signin_attempts_per_minute: 2,
            ..common::test_auth_config()
        },
    );
    let (status, _, _) = app
        .post_json(REGISTER, r#"{"email":"a@b.com","password":"x"}"#)
        .await;
    assert_eq!(status, StatusCode::CREATED);

    for _ in 0..2 {
        let (status, _, _) = app
            .post_json(SIGNIN, r#"{"email":"a@b.com","password":"bad"}"#)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    let (status, _, json) = app
        .post_json(SIGNIN, r#"{"email":"a@b.com","password":"x"}"#)
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["error"], "Too many sign-in attempts");

    app.cleanup().await;
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new("health");
    let (status, _, json) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(app.db.is_initialized().await);
    app.cleanup().await;
}
