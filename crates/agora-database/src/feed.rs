//! Change feed sourced from Postgres `LISTEN`/`NOTIFY`.
//!
//! Row-level triggers on the forums and responses tables call
//! `pg_notify` with a compact JSON payload after each committed
//! mutation. This module tails that channel and forwards every
//! mutation as a [`ChangeEvent`] into an in-process queue, leaving
//! fan-out to connected listeners entirely to the realtime layer.

use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgListener;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use agora_core::error::{AppError, ErrorKind};
use agora_core::events::{ChangeEvent, ChangeOp, Collection};
use agora_core::result::AppResult;

/// Payload emitted by the `notify_change()` trigger function.
#[derive(Debug, Deserialize)]
struct FeedPayload {
    collection: Collection,
    op: ChangeOp,
    id: Uuid,
    /// Full row as JSON. The trigger sends `null` for deletes and for
    /// rows too large to fit a NOTIFY payload.
    document: Option<Value>,
}

/// Tails committed document mutations and forwards them downstream.
pub struct PgChangeFeed {
    pool: PgPool,
    channel: String,
}

impl PgChangeFeed {
    /// Create a feed tailing the given notification channel.
    pub fn new(pool: PgPool, channel: impl Into<String>) -> Self {
        Self {
            pool,
            channel: channel.into(),
        }
    }

    /// Spawn the feed loop — runs until shutdown or until the event
    /// channel's receiver is dropped.
    pub fn spawn(
        self,
        events: mpsc::Sender<ChangeEvent>,
        shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(self.run(events, shutdown))
    }

    async fn run(self, events: mpsc::Sender<ChangeEvent>, mut shutdown: watch::Receiver<bool>) {
        let mut listener = match PgListener::connect_with(&self.pool).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!("Change feed failed to connect: {}", e);
                return;
            }
        };
        if let Err(e) = listener.listen(&self.channel).await {
            tracing::error!(
                "Change feed failed to listen on '{}': {}",
                self.channel,
                e
            );
            return;
        }
        tracing::info!("Change feed listening on '{}'", self.channel);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("Change feed received shutdown signal");
                        break;
                    }
                }
                notification = listener.recv() => {
                    match notification {
                        Ok(notification) => {
                            if !self.forward(notification.payload(), &events).await {
                                break;
                            }
                        }
                        Err(e) => {
                            // recv re-establishes the connection on the
                            // next call; mutations in the gap are lost.
                            tracing::warn!("Change feed connection error: {}", e);
                        }
                    }
                }
            }
        }

        tracing::info!("Change feed stopped");
    }

    /// Decode one trigger payload and push it downstream. Returns
    /// `false` once the receiving side is gone.
    async fn forward(&self, raw: &str, events: &mpsc::Sender<ChangeEvent>) -> bool {
        let payload: FeedPayload = match serde_json::from_str(raw) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Discarding malformed change payload: {}", e);
                return true;
            }
        };

        let mut event = ChangeEvent::new(payload.collection, payload.op, payload.id);

        event.document = match payload.document {
            Some(document) => Some(document),
            // The trigger elides oversized rows; re-read them by id.
            None if payload.op != ChangeOp::Delete => {
                match self.load_document(payload.collection, payload.id).await {
                    Ok(document) => document,
                    Err(e) => {
                        tracing::warn!(
                            "Failed to hydrate changed document {}: {}",
                            payload.id,
                            e
                        );
                        None
                    }
                }
            }
            None => None,
        };

        if payload.collection == Collection::Responses && payload.op == ChangeOp::Insert {
            match self.load_response_with_author(payload.id).await {
                Ok(Some(document)) => event.data = Some(document),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Failed to enrich response {}: {}", payload.id, e);
                }
            }
        }

        if events.send(event).await.is_err() {
            tracing::info!("Change feed queue closed, stopping");
            return false;
        }
        true
    }

    /// Re-read a changed row as JSON. `None` when the row is already
    /// gone again.
    async fn load_document(&self, collection: Collection, id: Uuid) -> AppResult<Option<Value>> {
        let sql = match collection {
            Collection::Forums => "SELECT row_to_json(t) FROM (SELECT * FROM forums WHERE id = $1) t",
            Collection::Responses => {
                "SELECT row_to_json(t) FROM (SELECT * FROM responses WHERE id = $1) t"
            }
        };

        sqlx::query_scalar::<_, Value>(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load changed document", e)
            })
    }

    /// Load a freshly inserted response joined with its author's
    /// display fields, matching the shape list endpoints serve.
    async fn load_response_with_author(&self, id: Uuid) -> AppResult<Option<Value>> {
        sqlx::query_scalar::<_, Value>(
            "SELECT row_to_json(t) FROM ( \
                 SELECT r.*, u.username AS author_username, \
                        u.first_name AS author_first_name, u.last_name AS author_last_name \
                 FROM responses r JOIN users u ON u.id = r.created_by \
                 WHERE r.id = $1 \
             ) t",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load response author", e)
        })
    }
}
