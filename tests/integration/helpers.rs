//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use chrono::Utc;
use http::{Request, StatusCode};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use agora_api::auth::Claims;
use agora_core::config::AppConfig;
use agora_realtime::ListenerRegistry;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: PgPool,
    /// Application config
    pub config: AppConfig,
    /// Listener registry shared with the router's WebSocket handler
    pub registry: Arc<ListenerRegistry>,
}

impl TestApp {
    /// Build the application against the test database, or `None` when
    /// `AGORA_TEST_DATABASE_URL` is not set.
    pub async fn spawn() -> Option<Self> {
        let url = match std::env::var("AGORA_TEST_DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("AGORA_TEST_DATABASE_URL not set, skipping integration test");
                return None;
            }
        };

        let mut config = AppConfig::from_file("tests/fixtures/test_config.toml")
            .expect("Failed to load test config");
        config.database.url = url;

        let db = agora_database::DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");

        agora_database::migration::run_migrations(db.pool())
            .await
            .expect("Failed to run migrations");

        let db_pool = db.pool().clone();
        let (state, registry) = agora_api::app::build_state(config.clone(), db);
        let router = agora_api::router::build_router(state);

        Some(Self {
            router,
            db_pool,
            config,
            registry,
        })
    }

    /// Unique username for one test run, so tests never collide on
    /// seeded data.
    pub fn unique(prefix: &str) -> String {
        format!("{}_{}", prefix, Uuid::new_v4().simple())
    }

    /// Insert a user directly and return their ID
    pub async fn create_user(&self, username: &str) -> Uuid {
        let id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO users (id, first_name, last_name, username, email) \
             VALUES ($1, 'Test', 'User', $2, $3)",
        )
        .bind(id)
        .bind(username)
        .bind(format!("{}@test.com", username))
        .execute(&self.db_pool)
        .await
        .expect("Failed to create test user");

        id
    }

    /// Mint a bearer token the way the identity provider would
    pub fn token_for(&self, user_id: Uuid, username: &str) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            iat: now,
            exp: now + 3600,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.auth.jwt_secret.as_bytes()),
        )
        .expect("Failed to mint token")
    }

    /// Create a user and a valid token for them
    pub async fn user_with_token(&self, prefix: &str) -> (Uuid, String) {
        let username = Self::unique(prefix);
        let id = self.create_user(&username).await;
        let token = self.token_for(id, &username);
        (id, token)
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Serve the router on an ephemeral local port, for tests that need
    /// a real connection (WebSocket upgrades cannot run over `oneshot`).
    pub async fn serve(&self) -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let router = self.router.clone();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        addr
    }

    /// Wait until a recipient has at least `expected` notifications.
    /// Notification inserts are fire-and-forget, so give them a moment
    /// to land before asserting.
    pub async fn wait_for_notifications(&self, recipient: Uuid, expected: i64) -> i64 {
        let mut count = 0;
        for _ in 0..40 {
            count = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1",
            )
            .bind(recipient)
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to count notifications");

            if count >= expected {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        count
    }

    /// Read a user's current points and badge flag directly.
    pub async fn points_of(&self, user_id: Uuid) -> (i32, bool) {
        sqlx::query_as::<_, (i32, bool)>("SELECT points, has_badge FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to read user points")
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` payload of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}
