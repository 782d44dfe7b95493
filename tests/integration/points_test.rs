//! Integration tests for the reputation engine and leaderboard.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

/// Seed a forum plus one response, both authored by `token`'s user.
/// Returns (forum_id, response_id).
async fn seed_authored(app: &TestApp, token: &str) -> (String, String) {
    let response = app
        .request(
            "POST",
            "/api/forums",
            Some(json!({
                "title": TestApp::unique("scored"),
                "description": "Reputation fodder",
            })),
            Some(token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let forum_id = response.data()["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            "/api/responses",
            Some(json!({ "forum_id": forum_id, "comment": "My answer" })),
            Some(token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let response_id = response.data()["id"].as_str().unwrap().to_string();

    (forum_id, response_id)
}

#[tokio::test]
async fn test_response_votes_move_points() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let (author_id, author_token) = app.user_with_token("author").await;
    let (_voter_id, voter_token) = app.user_with_token("fan").await;
    let (_forum_id, response_id) = seed_authored(&app, &author_token).await;

    // One like, one response: (1 - 0) * 0.5 + 1 * 2 = 2.5, rounded up.
    let response = app
        .request(
            "POST",
            &format!("/api/responses/{}/like", response_id),
            None,
            Some(&voter_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.points_of(author_id).await, (3, false));

    // Switch to dislike: dislikes dominate, (0 - 1) * 0.8 + 1 * 1.5 = 0.7.
    let response = app
        .request(
            "POST",
            &format!("/api/responses/{}/dislike", response_id),
            None,
            Some(&voter_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.points_of(author_id).await, (1, false));

    // Withdraw the dislike: back to the response count alone.
    let response = app
        .request(
            "POST",
            &format!("/api/responses/{}/dislike", response_id),
            None,
            Some(&voter_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.points_of(author_id).await, (2, false));
}

#[tokio::test]
async fn test_points_never_go_negative() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let (author_id, author_token) = app.user_with_token("pariah").await;
    let (_forum_id, response_id) = seed_authored(&app, &author_token).await;

    // Three dislikes: (0 - 3) * 0.8 + 1 * 1.5 = -0.9, clamped to zero.
    for prefix in ["critic_a", "critic_b", "critic_c"] {
        let (_id, token) = app.user_with_token(prefix).await;
        let response = app
            .request(
                "POST",
                &format!("/api/responses/{}/dislike", response_id),
                None,
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    assert_eq!(app.points_of(author_id).await, (0, false));
}

#[tokio::test]
async fn test_self_votes_are_excluded_from_points() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let (author_id, author_token) = app.user_with_token("selffan").await;
    let (_forum_id, response_id) = seed_authored(&app, &author_token).await;

    // Liking your own response is allowed but scores nothing beyond
    // the response count term.
    let response = app
        .request(
            "POST",
            &format!("/api/responses/{}/like", response_id),
            None,
            Some(&author_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["likes"], 1);
    assert_eq!(app.points_of(author_id).await, (2, false));

    // And it never notifies the author about themselves.
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1",
    )
    .bind(author_id)
    .fetch_one(&app.db_pool)
    .await
    .expect("Failed to count notifications");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_forum_votes_never_award_points() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let (author_id, author_token) = app.user_with_token("questioner").await;
    let (_voter_id, voter_token) = app.user_with_token("browser").await;
    let (forum_id, _response_id) = seed_authored(&app, &author_token).await;

    let response = app
        .request(
            "POST",
            &format!("/api/forums/{}/like", forum_id),
            None,
            Some(&voter_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // Reputation only moves on response-ledger changes.
    assert_eq!(app.points_of(author_id).await, (0, false));
}

#[tokio::test]
async fn test_badge_awarded_at_threshold() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let (author_id, author_token) = app.user_with_token("prolific").await;
    let (_voter_id, voter_token) = app.user_with_token("admirer").await;
    let (forum_id, first_response_id) = seed_authored(&app, &author_token).await;

    // 49 more responses for a response count of 50.
    for i in 0..49 {
        let response = app
            .request(
                "POST",
                "/api/responses",
                Some(json!({ "forum_id": forum_id, "comment": format!("Answer {}", i) })),
                Some(&author_token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    // (1 - 0) * 0.5 + 50 * 2 = 100.5 → 101, crossing the badge line.
    let response = app
        .request(
            "POST",
            &format!("/api/responses/{}/like", first_response_id),
            None,
            Some(&voter_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.points_of(author_id).await, (101, true));

    // Withdrawing the like lands exactly on the threshold; the badge
    // stays.
    let response = app
        .request(
            "POST",
            &format!("/api/responses/{}/like", first_response_id),
            None,
            Some(&voter_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.points_of(author_id).await, (100, true));
}

#[tokio::test]
async fn test_leaderboard_ranks_badge_holders() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    // This test owns the lb_seed_ namespace; clear residue from
    // previous runs so the ranking asserts stay deterministic.
    sqlx::query("DELETE FROM users WHERE username LIKE 'lb_seed_%'")
        .execute(&app.db_pool)
        .await
        .expect("Failed to clear leaderboard seeds");

    for (username, points, has_badge) in [
        ("lb_seed_top", 2_000_000_000_i32, true),
        ("lb_seed_mid", 1_900_000_000_i32, true),
        ("lb_seed_unbadged", 1_999_999_999_i32, false),
    ] {
        sqlx::query(
            "INSERT INTO users (first_name, last_name, username, email, points, has_badge) \
             VALUES ('Seed', 'User', $1, $2, $3, $4)",
        )
        .bind(username)
        .bind(format!("{}@test.com", username))
        .bind(points)
        .bind(has_badge)
        .execute(&app.db_pool)
        .await
        .expect("Failed to seed leaderboard user");
    }

    let (_viewer_id, viewer_token) = app.user_with_token("lb_viewer").await;
    let response = app
        .request("GET", "/api/leaderboard", None, Some(&viewer_token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let entries = response.data().as_array().unwrap();
    assert_eq!(entries[0]["username"], "lb_seed_top");
    assert_eq!(entries[0]["points"], 2_000_000_000_i64);
    assert_eq!(entries[1]["username"], "lb_seed_mid");

    // Points alone are not enough without the badge.
    assert!(
        entries
            .iter()
            .all(|e| e["username"] != "lb_seed_unbadged" && e["has_badge"] == true)
    );
}
