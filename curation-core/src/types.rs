//! Core entity types
//!
//! All types are plain data: the store hands out owned clones, never
//! references into its maps. Serde derives exist for the HTTP layer that
//! sits above this crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque AI analysis result.
///
/// Produced by an external scorer, stored and returned verbatim. The core
/// never interprets its structure.
pub type AiAnalysis = serde_json::Value;

/// A registered user.
///
/// Immutable once created. The admin flag can only be set through the
/// bootstrap path; public creation always produces a non-admin user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique id, assigned sequentially by the store.
    pub id: u64,

    /// Unique username. Lookups are case-sensitive exact matches.
    pub username: String,

    /// Opaque credential. Never validated for strength here.
    pub password: String,

    /// Wallet identifier, used as an alternate lookup key.
    pub near_wallet: String,

    /// Public key / address string.
    pub near_address: String,

    /// Creation timestamp, stamped by the store.
    pub created_at: DateTime<Utc>,

    /// True only for the bootstrap admin.
    pub is_admin: bool,
}

/// Payload for creating a user.
///
/// Callers cannot set the admin flag at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    /// Desired username.
    pub username: String,
    /// Opaque credential.
    pub password: String,
    /// Wallet identifier.
    pub near_wallet: String,
    /// Public key / address string.
    pub near_address: String,
}

/// A submitted content item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Unique id, assigned sequentially by the store.
    pub id: u64,

    /// Owning user. Foreign reference, not validated by the store.
    pub user_id: u64,

    /// Submission text.
    pub text: String,

    /// Optional link.
    pub link: Option<String>,

    /// Optional image URL.
    pub image_url: Option<String>,

    /// Ordered category tags. Non-empty at submission is a caller contract.
    pub categories: Vec<String>,

    /// Creation timestamp, stamped by the store.
    pub created_at: DateTime<Utc>,

    /// Opaque analysis result, absent until the external scorer reports.
    pub ai_analysis: Option<AiAnalysis>,

    /// Approved by an admin. Never set together with `rejected`.
    pub approved: bool,

    /// Rejected by an admin. Never set together with `approved`.
    pub rejected: bool,

    /// A soulbound token has been issued for this content.
    pub token_issued: bool,

    /// External credential id, present iff `token_issued`.
    pub token_id: Option<String>,
}

impl Content {
    /// Derive the moderation state from the flag combination.
    pub fn status(&self) -> ContentStatus {
        if self.token_issued {
            ContentStatus::Tokenized
        } else if self.approved {
            ContentStatus::Approved
        } else if self.rejected {
            ContentStatus::Rejected
        } else {
            ContentStatus::Pending
        }
    }
}

/// Position of a content item in the moderation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentStatus {
    /// Submitted, awaiting review.
    Pending,
    /// Approved by an admin, no token yet.
    Approved,
    /// Rejected by an admin. Not terminal: a re-review may approve.
    Rejected,
    /// Approved and a soulbound token has been issued.
    Tokenized,
}

/// Payload for submitting content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContent {
    /// Owning user.
    pub user_id: u64,
    /// Submission text.
    pub text: String,
    /// Optional link.
    pub link: Option<String>,
    /// Optional image URL.
    pub image_url: Option<String>,
    /// Ordered category tags.
    pub categories: Vec<String>,
}

/// A non-transferable credential linking a user to approved content.
///
/// Append-only: created once, never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoulboundToken {
    /// Unique id, assigned sequentially by the store.
    pub id: u64,

    /// Credential holder.
    pub user_id: u64,

    /// Content that earned the credential, if any.
    pub content_id: Option<u64>,

    /// Externally visible credential identifier, caller-supplied and unique.
    pub token_id: String,

    /// Creation timestamp, stamped by the store.
    pub created_at: DateTime<Utc>,
}

/// Payload for issuing a soulbound token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSoulboundToken {
    /// Credential holder.
    pub user_id: u64,
    /// Content that earned the credential, if any. Must be approved.
    pub content_id: Option<u64>,
    /// Externally visible credential identifier.
    pub token_id: String,
}

/// One row of the token leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Credential holder.
    pub user_id: u64,
    /// Resolved username, or `"Unknown"` for a dangling reference.
    pub username: String,
    /// Resolved wallet identifier, or `"Unknown"` for a dangling reference.
    pub near_wallet: String,
    /// Number of tokens held.
    pub token_count: u64,
}
