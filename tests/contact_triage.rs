//! Public contact form and admin triage tests.

mod helpers;

use axum::http::StatusCode;
use helpers::{body_json, json_request, login, send, setup_app, seed_user, TEST_PASSWORD};
use serde_json::json;

/// A valid submission is stored with status `new`, no session required.
#[tokio::test]
async fn test_contact_form_is_public() -> anyhow::Result<()> {
    let (app, pool) = setup_app().await?;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/contact",
            None,
            Some(json!({
                "name": "Aunt May",
                "email": "may@example.com",
                "subject": "Parking",
                "message": "Is there parking at the venue for fifty cars?"
            })),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let id = body["id"].as_str().unwrap();

    let (status,): (String,) =
        sqlx::query_as("SELECT status FROM contact_messages WHERE id = ?1")
            .bind(id)
            .fetch_one(&pool)
            .await?;
    assert_eq!(status, "new");

    Ok(())
}

/// Invalid payloads report every violated rule at once.
#[tokio::test]
async fn test_contact_form_reports_all_violations() -> anyhow::Result<()> {
    let (app, _pool) = setup_app().await?;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/contact",
            None,
            Some(json!({
                "name": "",
                "email": "not-an-email",
                "subject": "",
                "message": "short"
            })),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["details"].as_array().unwrap().len(), 4);

    Ok(())
}

/// Moderators triage; only admins delete.
#[tokio::test]
async fn test_message_triage_lifecycle() -> anyhow::Result<()> {
    let (app, pool) = setup_app().await?;
    seed_user(&pool, "mod@example.com", "Mo", "moderator").await?;
    seed_user(&pool, "admin@example.com", "Ada", "admin").await?;

    let submitted = send(
        &app,
        json_request(
            "POST",
            "/api/contact",
            None,
            Some(json!({
                "name": "Uncle Joe",
                "email": "joe@example.com",
                "subject": "Dietary",
                "message": "Will there be vegetarian options at dinner?"
            })),
        ),
    )
    .await;
    let message_id = body_json(submitted).await["id"].as_str().unwrap().to_string();

    let mod_cookie = login(&app, "mod@example.com", TEST_PASSWORD).await;

    // Inbox shows the new message with counts
    let inbox = send(
        &app,
        json_request("GET", "/api/admin/messages?status=new", Some(&mod_cookie), None),
    )
    .await;
    assert_eq!(inbox.status(), StatusCode::OK);
    let body = body_json(inbox).await;
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["counts"]["new"], 1);

    // new -> read -> resolved
    for status in ["read", "resolved"] {
        let response = send(
            &app,
            json_request(
                "PATCH",
                &format!("/api/admin/messages/{message_id}"),
                Some(&mod_cookie),
                Some(json!({"status": status})),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], status);
    }

    // Unknown triage state is a validation error
    let bogus = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/admin/messages/{message_id}"),
            Some(&mod_cookie),
            Some(json!({"status": "archived"})),
        ),
    )
    .await;
    assert_eq!(bogus.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Deletion sits in the admin tier
    let forbidden = send(
        &app,
        json_request(
            "DELETE",
            &format!("/api/admin/messages/{message_id}"),
            Some(&mod_cookie),
            None,
        ),
    )
    .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let admin_cookie = login(&app, "admin@example.com", TEST_PASSWORD).await;
    let deleted = send(
        &app,
        json_request(
            "DELETE",
            &format!("/api/admin/messages/{message_id}"),
            Some(&admin_cookie),
            None,
        ),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = send(
        &app,
        json_request(
            "GET",
            &format!("/api/admin/messages/{message_id}"),
            Some(&admin_cookie),
            None,
        ),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    Ok(())
}
