//! The vote ledger: liked/disliked identity sets and their counters.
//!
//! Every forum and response carries one ledger. The ledger is the atomic
//! unit a vote toggle mutates; counters are always re-derived from the
//! sets so they cannot drift apart.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::kind::VoteKind;

/// An ordered set of user identities.
///
/// Membership checks go through the hash set in O(1); insertion order is
/// preserved so the set persists as a stable `uuid[]` column. Duplicates
/// are structurally impossible.
#[derive(Debug, Clone, Default)]
pub struct IdentitySet {
    order: Vec<Uuid>,
    members: HashSet<Uuid>,
}

impl IdentitySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a stored array, dropping duplicates while
    /// keeping first-occurrence order.
    pub fn from_vec(ids: Vec<Uuid>) -> Self {
        let mut set = Self::default();
        for id in ids {
            set.insert(id);
        }
        set
    }

    /// Insert an identity. Returns `false` if it was already present.
    pub fn insert(&mut self, id: Uuid) -> bool {
        if self.members.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    /// Remove an identity. Returns `false` if it was not present.
    pub fn remove(&mut self, id: &Uuid) -> bool {
        if self.members.remove(id) {
            self.order.retain(|member| member != id);
            true
        } else {
            false
        }
    }

    /// Whether the identity is in the set.
    pub fn contains(&self, id: &Uuid) -> bool {
        self.members.contains(id)
    }

    /// Number of identities in the set.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The identities in insertion order.
    pub fn as_slice(&self) -> &[Uuid] {
        &self.order
    }
}

impl PartialEq for IdentitySet {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for IdentitySet {}

impl From<Vec<Uuid>> for IdentitySet {
    fn from(ids: Vec<Uuid>) -> Self {
        Self::from_vec(ids)
    }
}

impl From<IdentitySet> for Vec<Uuid> {
    fn from(set: IdentitySet) -> Self {
        set.order
    }
}

impl Serialize for IdentitySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.order.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for IdentitySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Uuid>::deserialize(deserializer).map(Self::from_vec)
    }
}

impl sqlx::Type<sqlx::Postgres> for IdentitySet {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Vec<Uuid> as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for IdentitySet {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Vec<Uuid> as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.order, buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for IdentitySet {
    fn decode(
        value: <sqlx::Postgres as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        <Vec<Uuid> as sqlx::Decode<'r, sqlx::Postgres>>::decode(value).map(Self::from_vec)
    }
}

/// The like/dislike state attached to a forum or response.
///
/// Invariants after every operation: `likes == |liked_by|`,
/// `dislikes == |disliked_by|`, and no user appears in both sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VoteLedger {
    /// Like counter, always `|liked_by|`.
    pub likes: i32,
    /// Dislike counter, always `|disliked_by|`.
    pub dislikes: i32,
    /// Users currently liking the document.
    pub liked_by: IdentitySet,
    /// Users currently disliking the document.
    pub disliked_by: IdentitySet,
}

/// Result of applying a vote toggle to a stored document.
#[derive(Debug, Clone)]
pub struct VoteMutation {
    /// Ledger state after the toggle.
    pub ledger: VoteLedger,
    /// Whether a fresh vote was cast (`false` = un-vote).
    pub cast: bool,
    /// The document owner.
    pub owner_id: Uuid,
}

impl VoteLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one like/dislike toggle for `voter`.
    ///
    /// Returns `true` when a fresh vote was cast and `false` when an
    /// existing vote was removed (un-vote). A fresh vote also clears the
    /// voter from the opposite set, so a user holds at most one of
    /// {liked, disliked} at any time.
    pub fn toggle(&mut self, kind: VoteKind, voter: Uuid) -> bool {
        let (matching, opposite) = match kind {
            VoteKind::Like => (&mut self.liked_by, &mut self.disliked_by),
            VoteKind::Dislike => (&mut self.disliked_by, &mut self.liked_by),
        };

        let cast = if matching.remove(&voter) {
            false
        } else {
            matching.insert(voter);
            opposite.remove(&voter);
            true
        };

        self.likes = self.liked_by.len() as i32;
        self.dislikes = self.disliked_by.len() as i32;
        cast
    }

    /// Whether `user` currently likes the document.
    pub fn is_liked_by(&self, user: &Uuid) -> bool {
        self.liked_by.contains(user)
    }

    /// Whether `user` currently dislikes the document.
    pub fn is_disliked_by(&self, user: &Uuid) -> bool {
        self.disliked_by.contains(user)
    }
}
