//! Session lifecycle tests: login, me, logout, lockout.

mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use helpers::{
    body_json, json_request, login, send, session_cookie, set_cookie_header, setup_app, seed_user,
    TEST_PASSWORD,
};
use serde_json::json;

/// Login with correct credentials returns the principal and sets the cookie.
#[tokio::test]
async fn test_login_sets_session_cookie() -> anyhow::Result<()> {
    let (app, pool) = setup_app().await?;
    seed_user(&pool, "ann@example.com", "Ann", "admin").await?;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "ann@example.com", "password": TEST_PASSWORD})),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);

    let header = set_cookie_header(&response).expect("session cookie should be set");
    assert!(header.starts_with("admin_session="));
    assert!(header.contains("HttpOnly"));
    assert!(header.contains("SameSite=Lax"));
    assert!(header.contains("Path=/"));
    assert!(header.contains("Max-Age=86400"));
    // Development environment, plain HTTP
    assert!(!header.contains("Secure"));

    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], "ann@example.com");
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["tabs"].as_array().unwrap().len() > 0);

    Ok(())
}

/// Unknown email and wrong password are indistinguishable.
#[tokio::test]
async fn test_login_failures_share_one_body() -> anyhow::Result<()> {
    let (app, pool) = setup_app().await?;
    seed_user(&pool, "ann@example.com", "Ann", "admin").await?;

    let unknown = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "nobody@example.com", "password": TEST_PASSWORD})),
        ),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let unknown_body = body_json(unknown).await;

    let wrong = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "ann@example.com", "password": "WrongPass123"})),
        ),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let wrong_body = body_json(wrong).await;

    assert_eq!(unknown_body, wrong_body);

    Ok(())
}

/// Deactivated accounts answer with the same generic 401.
#[tokio::test]
async fn test_deactivated_account_login_is_generic_401() -> anyhow::Result<()> {
    let (app, pool) = setup_app().await?;
    let id = seed_user(&pool, "ann@example.com", "Ann", "admin").await?;
    sqlx::query("UPDATE admin_users SET is_active = 0 WHERE id = ?1")
        .bind(&id)
        .execute(&pool)
        .await?;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "ann@example.com", "password": TEST_PASSWORD})),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid email or password");

    Ok(())
}

/// Anonymous /me is 401; with a session it returns the principal.
#[tokio::test]
async fn test_me_requires_session() -> anyhow::Result<()> {
    let (app, pool) = setup_app().await?;
    seed_user(&pool, "ann@example.com", "Ann", "moderator").await?;

    let anonymous = send(&app, json_request("GET", "/api/auth/me", None, None)).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let cookie = login(&app, "ann@example.com", TEST_PASSWORD).await;
    let me = send(&app, json_request("GET", "/api/auth/me", Some(&cookie), None)).await;
    assert_eq!(me.status(), StatusCode::OK);

    let body = body_json(me).await;
    assert_eq!(body["user"]["name"], "Ann");
    assert_eq!(body["user"]["role"], "moderator");

    Ok(())
}

/// A tampered token is just an anonymous visitor, not an error.
#[tokio::test]
async fn test_tampered_cookie_is_unauthenticated() -> anyhow::Result<()> {
    let (app, pool) = setup_app().await?;
    seed_user(&pool, "ann@example.com", "Ann", "admin").await?;

    let cookie = login(&app, "ann@example.com", TEST_PASSWORD).await;
    let tampered = format!("{cookie}tampered");

    let response = send(&app, json_request("GET", "/api/auth/me", Some(&tampered), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Logout clears the cookie and is idempotent.
#[tokio::test]
async fn test_logout_is_idempotent() -> anyhow::Result<()> {
    let (app, pool) = setup_app().await?;
    seed_user(&pool, "ann@example.com", "Ann", "admin").await?;

    let cookie = login(&app, "ann@example.com", TEST_PASSWORD).await;

    let first = send(
        &app,
        json_request("POST", "/api/auth/logout", Some(&cookie), None),
    )
    .await;
    assert_eq!(first.status(), StatusCode::NO_CONTENT);
    let removal = set_cookie_header(&first).expect("logout should emit a removal cookie");
    assert!(removal.starts_with("admin_session="));

    // Second logout with no session at all is still a 204
    let second = send(&app, json_request("POST", "/api/auth/logout", None, None)).await;
    assert_eq!(second.status(), StatusCode::NO_CONTENT);

    Ok(())
}

/// Five wrong passwords lock the account; the right password then answers
/// 423 while the window is open, and works again once it has elapsed.
#[tokio::test]
async fn test_lockout_after_repeated_failures() -> anyhow::Result<()> {
    let (app, pool) = setup_app().await?;
    let id = seed_user(&pool, "ann@example.com", "Ann", "admin").await?;

    for _ in 0..5 {
        let response = send(
            &app,
            json_request(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({"email": "ann@example.com", "password": "WrongPass123"})),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Correct password, but the lock window is open
    let locked = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "ann@example.com", "password": TEST_PASSWORD})),
        ),
    )
    .await;
    assert_eq!(locked.status(), StatusCode::LOCKED);

    // Simulate the window elapsing
    sqlx::query("UPDATE admin_users SET locked_until = ?1 WHERE id = ?2")
        .bind(Utc::now() - Duration::minutes(1))
        .bind(&id)
        .execute(&pool)
        .await?;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "ann@example.com", "password": TEST_PASSWORD})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).is_some());

    // Success reset the counter and the lock
    let (attempts, locked_until): (i64, Option<String>) = sqlx::query_as(
        "SELECT failed_login_attempts, locked_until FROM admin_users WHERE id = ?1",
    )
    .bind(&id)
    .fetch_one(&pool)
    .await?;
    assert_eq!(attempts, 0);
    assert!(locked_until.is_none());

    Ok(())
}

/// Login also stamps last_login.
#[tokio::test]
async fn test_login_stamps_last_login() -> anyhow::Result<()> {
    let (app, pool) = setup_app().await?;
    let id = seed_user(&pool, "ann@example.com", "Ann", "viewer").await?;

    login(&app, "ann@example.com", TEST_PASSWORD).await;

    let (last_login,): (Option<String>,) =
        sqlx::query_as("SELECT last_login FROM admin_users WHERE id = ?1")
            .bind(&id)
            .fetch_one(&pool)
            .await?;
    assert!(last_login.is_some());

    Ok(())
}
