//! Shared test helpers: in-memory database, app factory, request plumbing.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;
use ulid::Ulid;

use reunionhq::auth::password::hash_password;
use reunionhq::queries::users::{insert_user, NewAdminUser};

/// Default password used by seeded users.
pub const TEST_PASSWORD: &str = "Password123";

/// In-memory database with all migrations applied, plus the app router.
///
/// A single connection keeps every query on the same :memory: database.
pub async fn setup_app() -> anyhow::Result<(Router, SqlitePool)> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app = reunionhq::create_app(pool.clone()).await?;

    Ok((app, pool))
}

/// Insert an active principal with [`TEST_PASSWORD`]. Returns its id.
pub async fn seed_user(
    pool: &SqlitePool,
    email: &str,
    name: &str,
    role: &str,
) -> anyhow::Result<String> {
    let user = NewAdminUser {
        id: Ulid::new().to_string(),
        email: email.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        password_hash: hash_password(TEST_PASSWORD)?,
    };
    insert_user(pool, &user).await?;
    Ok(user.id)
}

/// Build a JSON request, optionally with a session cookie.
pub fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Drive one request through the router.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("request should not fail at the transport level")
}

/// Collect the response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Log in and return the `admin_session=<token>` pair for the Cookie header.
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(serde_json::json!({"email": email, "password": password})),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK, "login should succeed");

    session_cookie(&response).expect("login should set the session cookie")
}

/// Extract the `admin_session=<value>` pair from a Set-Cookie header.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    let header = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    let pair = header.split(';').next()?;
    pair.starts_with("admin_session=").then(|| pair.to_string())
}

/// Full Set-Cookie header value, for asserting cookie attributes.
pub fn set_cookie_header(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}
