//! Integration tests for the WebSocket push channel.
//!
//! Upgrades need a real TCP connection, so these tests serve the router
//! on an ephemeral port and connect with a WebSocket client instead of
//! driving the router with `oneshot`.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream::SplitStream;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use agora_database::PgChangeFeed;
use agora_realtime::ChangeFeedPublisher;

use crate::helpers::TestApp;

type WsRead = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// The test fixture allows exactly this origin.
const ALLOWED_ORIGIN: &str = "http://localhost:5173";

fn upgrade_request(
    addr: std::net::SocketAddr,
    origin: Option<&'static str>,
) -> tungstenite::handshake::client::Request {
    let mut request = format!("ws://{}/ws", addr)
        .into_client_request()
        .expect("Failed to build upgrade request");
    if let Some(origin) = origin {
        request
            .headers_mut()
            .insert("Origin", HeaderValue::from_static(origin));
    }
    request
}

/// Read frames until one arrives for the given document id. Parallel
/// tests share the database, so frames for other documents are skipped.
async fn next_frame_for(read: &mut WsRead, id: &str) -> Value {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let message = read
                .next()
                .await
                .expect("Feed closed before the expected frame")
                .expect("Feed errored before the expected frame");
            if let Message::Text(text) = message {
                let value: Value =
                    serde_json::from_str(text.as_str()).expect("Frame is not JSON");
                if value["data"]["id"] == id {
                    return value;
                }
            }
        }
    })
    .await
    .expect("Timed out waiting for a feed frame")
}

#[tokio::test]
async fn test_plain_get_is_not_an_upgrade() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    // No upgrade headers at all.
    let response = app.request("GET", "/ws", None, None).await;
    assert!(response.status.is_client_error());
}

#[tokio::test]
async fn test_upgrade_admits_allowed_origin() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let addr = app.serve().await;

    let (stream, response) = connect_async(upgrade_request(addr, Some(ALLOWED_ORIGIN)))
        .await
        .expect("Allowed origin was refused");
    assert_eq!(response.status().as_u16(), 101);
    drop(stream);
}

#[tokio::test]
async fn test_upgrade_refuses_unlisted_origin() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let addr = app.serve().await;

    let result = connect_async(upgrade_request(addr, Some("http://evil.example"))).await;
    let Err(tungstenite::Error::Http(response)) = result else {
        panic!("Expected an HTTP refusal before the upgrade");
    };
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn test_upgrade_refuses_missing_origin() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let addr = app.serve().await;

    // Non-browser clients send no Origin; a configured allowlist turns
    // them away too.
    let result = connect_async(upgrade_request(addr, None)).await;
    let Err(tungstenite::Error::Http(response)) = result else {
        panic!("Expected an HTTP refusal before the upgrade");
    };
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn test_mutations_reach_connected_listeners() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let (_owner_id, owner_token) = app.user_with_token("broadcaster").await;
    let responder_name = TestApp::unique("echo");
    let responder_id = app.create_user(&responder_name).await;
    let responder_token = app.token_for(responder_id, &responder_name);

    // Wire the feed and publisher the way the server does at startup.
    let (event_tx, event_rx) = mpsc::channel(app.config.realtime.feed_buffer_size);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let feed_handle = PgChangeFeed::new(
        app.db_pool.clone(),
        app.config.realtime.feed_channel.clone(),
    )
    .spawn(event_tx, shutdown_rx.clone());
    let publisher_handle =
        ChangeFeedPublisher::new(Arc::clone(&app.registry)).spawn(event_rx, shutdown_rx);

    let addr = app.serve().await;
    let (stream, _) = connect_async(upgrade_request(addr, Some(ALLOWED_ORIGIN)))
        .await
        .expect("Upgrade refused");
    let (_write, mut read) = stream.split();

    // The 101 races the server-side registration; wait for it to land.
    for _ in 0..40 {
        if app.registry.listener_count() >= 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    assert!(app.registry.listener_count() >= 1);
    // Give the feed a moment to LISTEN before the first mutation.
    tokio::time::sleep(Duration::from_millis(500)).await;

    // A forum insert arrives with the full document.
    let title = TestApp::unique("stream_forum");
    let response = app
        .request(
            "POST",
            "/api/forums",
            Some(json!({ "title": title, "description": "Watch this space" })),
            Some(&owner_token),
        )
        .await;
    let forum_id = response.data()["id"].as_str().unwrap().to_string();

    let frame = next_frame_for(&mut read, &forum_id).await;
    assert_eq!(frame["type"], "forumUpdate");
    assert_eq!(frame["data"]["op"], "insert");
    assert_eq!(frame["data"]["collection"], "forums");
    assert_eq!(frame["data"]["document"]["title"], title);
    assert!(frame["data"].get("data").is_none());

    // A response insert additionally carries the author-enriched copy.
    let comment = "Streamed straight to you";
    let response = app
        .request(
            "POST",
            "/api/responses",
            Some(json!({ "forum_id": forum_id, "comment": comment })),
            Some(&responder_token),
        )
        .await;
    let response_id = response.data()["id"].as_str().unwrap().to_string();

    let frame = next_frame_for(&mut read, &response_id).await;
    assert_eq!(frame["type"], "responseUpdate");
    assert_eq!(frame["data"]["op"], "insert");
    assert_eq!(frame["data"]["document"]["comment"], comment);
    assert_eq!(frame["data"]["data"]["author_username"], responder_name);

    // A vote shows up as an update with the fresh counters.
    let response = app
        .request(
            "POST",
            &format!("/api/forums/{}/like", forum_id),
            None,
            Some(&responder_token),
        )
        .await;
    assert!(response.status.is_success());

    let frame = next_frame_for(&mut read, &forum_id).await;
    assert_eq!(frame["type"], "forumUpdate");
    assert_eq!(frame["data"]["op"], "update");
    assert_eq!(frame["data"]["document"]["likes"], 1);

    // A hard delete arrives without a document.
    sqlx::query("DELETE FROM responses WHERE id = $1")
        .bind(uuid::Uuid::parse_str(&response_id).unwrap())
        .execute(&app.db_pool)
        .await
        .expect("Failed to delete response");

    let frame = next_frame_for(&mut read, &response_id).await;
    assert_eq!(frame["type"], "responseUpdate");
    assert_eq!(frame["data"]["op"], "delete");
    assert!(frame["data"].get("document").is_none());

    shutdown_tx.send(true).expect("Failed to signal shutdown");
    feed_handle.await.expect("Feed task panicked");
    publisher_handle.await.expect("Publisher task panicked");
}

#[tokio::test]
async fn test_slow_listener_does_not_block_others() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    // Saturate one listener's buffer while draining the other.
    let (_stuck_id, stuck_rx) = app.registry.register();
    let (_live_id, mut live_rx) = app.registry.register();

    let capacity = app.config.realtime.listener_buffer_size;
    for i in 0..capacity {
        app.registry.broadcast(&format!("frame-{}", i));
    }
    for i in 0..capacity {
        let frame = live_rx.try_recv().expect("Healthy listener missed a frame");
        assert_eq!(frame, format!("frame-{}", i));
    }

    // The stuck listener's buffer is full; the next frame is dropped
    // for it alone and it stays registered.
    assert_eq!(app.registry.broadcast("overflow"), 1);
    assert_eq!(live_rx.try_recv().unwrap(), "overflow");
    assert_eq!(app.registry.listener_count(), 2);

    drop(stuck_rx);
}
