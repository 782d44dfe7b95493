//! Integration tests for notification fan-out and the inbox endpoints.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

/// Create a forum owned by `token`'s user and return its id.
async fn seed_forum(app: &TestApp, token: &str, title: &str) -> String {
    let response = app
        .request(
            "POST",
            "/api/forums",
            Some(json!({ "title": title, "description": "Notify me" })),
            Some(token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.data()["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_forum_like_notifies_owner() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let (owner_id, owner_token) = app.user_with_token("owner").await;
    let voter_name = TestApp::unique("voter");
    let voter_id = app.create_user(&voter_name).await;
    let voter_token = app.token_for(voter_id, &voter_name);

    let title = TestApp::unique("liked_forum");
    let forum_id = seed_forum(&app, &owner_token, &title).await;

    let response = app
        .request(
            "POST",
            &format!("/api/forums/{}/like", forum_id),
            None,
            Some(&voter_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    assert_eq!(app.wait_for_notifications(owner_id, 1).await, 1);

    let response = app
        .request("GET", "/api/notifications", None, Some(&owner_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let items = response.data().as_array().unwrap();
    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item["kind"], "forum_like");
    assert_eq!(item["source_kind"], "forum");
    assert_eq!(item["sender_username"], voter_name);
    assert_eq!(item["forum_title"], title);
    assert_eq!(item["is_read"], false);

    // Withdrawing the vote neither retracts nor duplicates.
    let response = app
        .request(
            "POST",
            &format!("/api/forums/{}/like", forum_id),
            None,
            Some(&voter_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    assert_eq!(app.wait_for_notifications(owner_id, 1).await, 1);
}

#[tokio::test]
async fn test_own_actions_never_notify() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let (owner_id, owner_token) = app.user_with_token("loner").await;
    let forum_id = seed_forum(&app, &owner_token, &TestApp::unique("own_forum")).await;

    // Vote on and respond to your own forum.
    let response = app
        .request(
            "POST",
            &format!("/api/forums/{}/like", forum_id),
            None,
            Some(&owner_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "POST",
            "/api/responses",
            Some(json!({ "forum_id": forum_id, "comment": "Answering myself" })),
            Some(&owner_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1",
    )
    .bind(owner_id)
    .fetch_one(&app.db_pool)
    .await
    .expect("Failed to count notifications");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_response_notifies_forum_owner_with_context() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let (owner_id, owner_token) = app.user_with_token("asker").await;
    let (_responder_id, responder_token) = app.user_with_token("helper").await;

    let title = TestApp::unique("question");
    let forum_id = seed_forum(&app, &owner_token, &title).await;

    let comment = "Here is a helpful answer";
    let response = app
        .request(
            "POST",
            "/api/responses",
            Some(json!({ "forum_id": forum_id, "comment": comment })),
            Some(&responder_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    assert_eq!(app.wait_for_notifications(owner_id, 1).await, 1);

    let response = app
        .request("GET", "/api/notifications", None, Some(&owner_token))
        .await;
    let items = response.data().as_array().unwrap();
    let item = &items[0];
    assert_eq!(item["kind"], "forum_response");
    assert_eq!(item["source_kind"], "response");
    // Response-sourced rows resolve through to the parent forum.
    assert_eq!(item["forum_title"], title);
    assert_eq!(item["forum_id"], forum_id);
    assert_eq!(item["response_comment"], comment);
}

#[tokio::test]
async fn test_response_vote_notifies_its_author() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let (_owner_id, owner_token) = app.user_with_token("poster").await;
    let (author_id, author_token) = app.user_with_token("answerer").await;

    let forum_id = seed_forum(&app, &owner_token, &TestApp::unique("debated")).await;
    let response = app
        .request(
            "POST",
            "/api/responses",
            Some(json!({ "forum_id": forum_id, "comment": "Contested take" })),
            Some(&author_token),
        )
        .await;
    let response_id = response.data()["id"].as_str().unwrap().to_string();

    // The forum owner already got a forum_response notification; the
    // dislike below goes to the response author instead.
    let response = app
        .request(
            "POST",
            &format!("/api/responses/{}/dislike", response_id),
            None,
            Some(&owner_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    assert_eq!(app.wait_for_notifications(author_id, 1).await, 1);

    let response = app
        .request("GET", "/api/notifications", None, Some(&author_token))
        .await;
    let items = response.data().as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["kind"], "response_dislike");
    assert_eq!(items[0]["source_id"], response_id);
}

#[tokio::test]
async fn test_mark_read_is_scoped_to_recipient() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let (owner_id, owner_token) = app.user_with_token("reader").await;
    let (_voter_id, voter_token) = app.user_with_token("pinger").await;
    let forum_id = seed_forum(&app, &owner_token, &TestApp::unique("pinged")).await;

    let response = app
        .request(
            "POST",
            &format!("/api/forums/{}/dislike", forum_id),
            None,
            Some(&voter_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.wait_for_notifications(owner_id, 1).await, 1);

    let response = app
        .request("GET", "/api/notifications", None, Some(&owner_token))
        .await;
    let notification_id = response.data()[0]["id"].as_str().unwrap().to_string();

    // Someone else's inbox cannot touch it.
    let response = app
        .request(
            "PATCH",
            &format!("/api/notifications/{}/read", notification_id),
            None,
            Some(&voter_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request(
            "PATCH",
            &format!("/api/notifications/{}/read", notification_id),
            None,
            Some(&owner_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["is_read"], true);

    let response = app
        .request("GET", "/api/notifications", None, Some(&owner_token))
        .await;
    assert_eq!(response.data()[0]["is_read"], true);
}

#[tokio::test]
async fn test_delete_is_scoped_to_recipient() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let (owner_id, owner_token) = app.user_with_token("tidier").await;
    let (_voter_id, voter_token) = app.user_with_token("noisemaker").await;
    let forum_id = seed_forum(&app, &owner_token, &TestApp::unique("noisy")).await;

    let response = app
        .request(
            "POST",
            &format!("/api/forums/{}/like", forum_id),
            None,
            Some(&voter_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.wait_for_notifications(owner_id, 1).await, 1);

    let response = app
        .request("GET", "/api/notifications", None, Some(&owner_token))
        .await;
    let notification_id = response.data()[0]["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "DELETE",
            &format!("/api/notifications/{}", notification_id),
            None,
            Some(&voter_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request(
            "DELETE",
            &format!("/api/notifications/{}", notification_id),
            None,
            Some(&owner_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", "/api/notifications", None, Some(&owner_token))
        .await;
    assert!(response.data().as_array().unwrap().is_empty());
}
