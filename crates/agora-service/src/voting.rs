//! Vote toggling across forums and responses.
//!
//! A vote is a toggle: casting the same vote twice withdraws it, and
//! casting the opposite vote moves the voter across. The ledger math
//! itself lives in [`VoteLedger`]; this service wires the toggle to its
//! side effects (owner notification on a fresh cast, author reputation
//! recompute for response votes).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agora_core::error::AppError;
use agora_core::result::AppResult;
use agora_database::repositories::{ForumRepository, ResponseRepository};
use agora_entity::notification::{NotificationKind, SourceKind};
use agora_entity::vote::{VoteKind, VoteLedger};

use crate::context::RequestContext;
use crate::notify::NotificationService;
use crate::points::PointsService;

/// A caller's remembered vote state on one document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedVotes {
    /// Whether the caller currently likes the document.
    pub is_liked: bool,
    /// Whether the caller currently dislikes the document.
    pub is_disliked: bool,
}

impl SavedVotes {
    /// Read the caller's membership in a ledger's voter sets.
    pub fn from_ledger(ledger: &VoteLedger, voter: &Uuid) -> Self {
        Self {
            is_liked: ledger.is_liked_by(voter),
            is_disliked: ledger.is_disliked_by(voter),
        }
    }
}

/// Applies like/dislike toggles and their side effects.
#[derive(Debug, Clone)]
pub struct VotingService {
    /// Forum repository.
    forum_repo: Arc<ForumRepository>,
    /// Response repository.
    response_repo: Arc<ResponseRepository>,
    /// Notification fan-out.
    notifications: NotificationService,
    /// Reputation recompute.
    points: PointsService,
}

impl VotingService {
    /// Creates a new voting service.
    pub fn new(
        forum_repo: Arc<ForumRepository>,
        response_repo: Arc<ResponseRepository>,
        notifications: NotificationService,
        points: PointsService,
    ) -> Self {
        Self {
            forum_repo,
            response_repo,
            notifications,
            points,
        }
    }

    /// Toggle the caller's vote on a forum.
    ///
    /// A fresh cast notifies the forum owner; withdrawing a vote stays
    /// silent. Forum votes never affect reputation.
    pub async fn toggle_forum_vote(
        &self,
        ctx: &RequestContext,
        forum_id: Uuid,
        kind: VoteKind,
    ) -> AppResult<VoteLedger> {
        let mutation = self
            .forum_repo
            .toggle_vote(forum_id, ctx.user_id, kind)
            .await?
            .ok_or_else(|| AppError::not_found("Forum not found"))?;

        if mutation.cast {
            self.notifications.send_detached(
                mutation.owner_id,
                ctx.user_id,
                NotificationKind::for_vote(SourceKind::Forum, kind),
                forum_id,
                SourceKind::Forum,
            );
        }

        Ok(mutation.ledger)
    }

    /// Toggle the caller's vote on a response.
    ///
    /// Every ledger change recomputes the author's reputation, since
    /// withdrawn votes must also be reflected; only a fresh cast
    /// notifies the author.
    pub async fn toggle_response_vote(
        &self,
        ctx: &RequestContext,
        response_id: Uuid,
        kind: VoteKind,
    ) -> AppResult<VoteLedger> {
        let mutation = self
            .response_repo
            .toggle_vote(response_id, ctx.user_id, kind)
            .await?
            .ok_or_else(|| AppError::not_found("Response not found"))?;

        self.points.recompute(mutation.owner_id).await?;

        if mutation.cast {
            self.notifications.send_detached(
                mutation.owner_id,
                ctx.user_id,
                NotificationKind::for_vote(SourceKind::Response, kind),
                response_id,
                SourceKind::Response,
            );
        }

        Ok(mutation.ledger)
    }

    /// The caller's remembered vote state on a forum.
    pub async fn forum_saved_votes(
        &self,
        ctx: &RequestContext,
        forum_id: Uuid,
    ) -> AppResult<SavedVotes> {
        let forum = self
            .forum_repo
            .find_by_id(forum_id)
            .await?
            .filter(|f| !f.is_archived)
            .ok_or_else(|| AppError::not_found("Forum not found"))?;

        Ok(SavedVotes::from_ledger(&forum.ledger, &ctx.user_id))
    }

    /// The caller's remembered vote state on a response.
    pub async fn response_saved_votes(
        &self,
        ctx: &RequestContext,
        response_id: Uuid,
    ) -> AppResult<SavedVotes> {
        let response = self
            .response_repo
            .find_by_id(response_id)
            .await?
            .filter(|r| !r.is_archived)
            .ok_or_else(|| AppError::not_found("Response not found"))?;

        Ok(SavedVotes::from_ledger(&response.ledger, &ctx.user_id))
    }
}
