//! In-memory entity store
//!
//! Owns the three entity maps (users, contents, soulbound tokens) and the
//! sequential id counters behind a single `RwLock`. Every operation takes
//! the lock exactly once, so each mutation is atomic relative to all others
//! and the cross-entity side effect of token issuance happens in one
//! critical section.
//!
//! Getters return owned clones; nothing hands out references into the maps.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::types::{
    AiAnalysis, Content, LeaderboardEntry, NewContent, NewSoulboundToken, NewUser, SoulboundToken,
    User,
};

/// Default page size for content listing.
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// Default number of leaderboard rows.
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

/// In-memory entity store.
///
/// Constructor-injected everywhere it is used; there is no ambient global
/// instance, so each test gets a fresh store.
pub struct Storage {
    inner: RwLock<Inner>,
}

struct Inner {
    users: HashMap<u64, User>,
    contents: HashMap<u64, Content>,
    tokens: HashMap<u64, SoulboundToken>,
    next_user_id: u64,
    next_content_id: u64,
    next_token_id: u64,
}

impl Inner {
    /// Mark content as tokenized. Shared by the public content operation and
    /// token creation so both run under the caller's write lock.
    fn attach_token(&mut self, content_id: u64, token_id: &str) -> Result<Content> {
        let content = self
            .contents
            .get_mut(&content_id)
            .ok_or(Error::ContentNotFound(content_id))?;

        if !content.approved {
            return Err(Error::InvalidState(format!(
                "content {} is not approved, cannot attach token",
                content_id
            )));
        }

        content.token_issued = true;
        content.token_id = Some(token_id.to_string());
        Ok(content.clone())
    }
}

impl Storage {
    /// Create an empty store. Id counters start at 1.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                users: HashMap::new(),
                contents: HashMap::new(),
                tokens: HashMap::new(),
                next_user_id: 1,
                next_content_id: 1,
                next_token_id: 1,
            }),
        }
    }

    // User operations

    /// Create a user. The admin flag is always false on this path.
    ///
    /// Fails with [`Error::Conflict`] if the username or wallet identifier
    /// is already taken.
    pub fn create_user(&self, new_user: NewUser) -> Result<User> {
        self.insert_user(new_user, false)
    }

    /// Create the bootstrap admin record.
    ///
    /// The record is admin from the moment it becomes observable; there is
    /// no create-then-flip window.
    pub fn create_admin_user(&self, new_user: NewUser) -> Result<User> {
        self.insert_user(new_user, true)
    }

    fn insert_user(&self, new_user: NewUser, is_admin: bool) -> Result<User> {
        let mut inner = self.inner.write();

        if inner.users.values().any(|u| u.username == new_user.username) {
            return Err(Error::Conflict(format!(
                "username already taken: {}",
                new_user.username
            )));
        }
        if inner
            .users
            .values()
            .any(|u| u.near_wallet == new_user.near_wallet)
        {
            return Err(Error::Conflict(format!(
                "wallet already registered: {}",
                new_user.near_wallet
            )));
        }

        let id = inner.next_user_id;
        inner.next_user_id += 1;

        let user = User {
            id,
            username: new_user.username,
            password: new_user.password,
            near_wallet: new_user.near_wallet,
            near_address: new_user.near_address,
            created_at: Utc::now(),
            is_admin,
        };
        inner.users.insert(id, user.clone());

        tracing::debug!(user_id = id, username = %user.username, "User created");

        Ok(user)
    }

    /// Get a user by id.
    pub fn get_user(&self, id: u64) -> Option<User> {
        self.inner.read().users.get(&id).cloned()
    }

    /// Get a user by username. Case-sensitive exact match; no normalization.
    pub fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.inner
            .read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    /// Get a user by wallet identifier. Exact match on the opaque string.
    pub fn get_user_by_wallet(&self, wallet: &str) -> Option<User> {
        self.inner
            .read()
            .users
            .values()
            .find(|u| u.near_wallet == wallet)
            .cloned()
    }

    // Content operations

    /// Submit content. Always lands in the pending state.
    pub fn create_content(&self, new_content: NewContent) -> Content {
        let mut inner = self.inner.write();

        let id = inner.next_content_id;
        inner.next_content_id += 1;

        let content = Content {
            id,
            user_id: new_content.user_id,
            text: new_content.text,
            link: new_content.link,
            image_url: new_content.image_url,
            categories: new_content.categories,
            created_at: Utc::now(),
            ai_analysis: None,
            approved: false,
            rejected: false,
            token_issued: false,
            token_id: None,
        };
        inner.contents.insert(id, content.clone());

        tracing::debug!(content_id = id, user_id = content.user_id, "Content submitted");

        content
    }

    /// Get content by id.
    pub fn get_content(&self, id: u64) -> Option<Content> {
        self.inner.read().contents.get(&id).cloned()
    }

    /// Get all content owned by a user. Unordered.
    pub fn get_contents_by_user(&self, user_id: u64) -> Vec<Content> {
        self.inner
            .read()
            .contents
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect()
    }

    /// List content, most recent first, paginated by `offset`/`limit`.
    ///
    /// Equal timestamps are broken by id descending so the window is
    /// deterministic.
    pub fn get_all_contents(&self, limit: usize, offset: usize) -> Vec<Content> {
        let inner = self.inner.read();

        let mut contents: Vec<Content> = inner.contents.values().cloned().collect();
        contents.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        contents.into_iter().skip(offset).take(limit).collect()
    }

    /// Attach or overwrite the AI analysis result. Legal from any state;
    /// moderation flags are untouched.
    pub fn update_content_analysis(&self, id: u64, analysis: AiAnalysis) -> Result<Content> {
        let mut inner = self.inner.write();

        let content = inner
            .contents
            .get_mut(&id)
            .ok_or(Error::ContentNotFound(id))?;
        content.ai_analysis = Some(analysis);

        tracing::debug!(content_id = id, "Analysis recorded");

        Ok(content.clone())
    }

    /// Approve content. Overrides a prior rejection: moderation is a
    /// reversible toggle, not a one-way transition.
    pub fn approve_content(&self, id: u64) -> Result<Content> {
        let mut inner = self.inner.write();

        let content = inner
            .contents
            .get_mut(&id)
            .ok_or(Error::ContentNotFound(id))?;
        content.approved = true;
        content.rejected = false;

        tracing::info!(content_id = id, "Content approved");

        Ok(content.clone())
    }

    /// Reject content. Overrides a prior approval.
    pub fn reject_content(&self, id: u64) -> Result<Content> {
        let mut inner = self.inner.write();

        let content = inner
            .contents
            .get_mut(&id)
            .ok_or(Error::ContentNotFound(id))?;
        content.approved = false;
        content.rejected = true;

        tracing::info!(content_id = id, "Content rejected");

        Ok(content.clone())
    }

    /// Mark content as tokenized with the given external credential id.
    ///
    /// Requires the content to be approved; fails with
    /// [`Error::InvalidState`] otherwise.
    pub fn update_content_token_id(&self, id: u64, token_id: &str) -> Result<Content> {
        let mut inner = self.inner.write();
        let content = inner.attach_token(id, token_id)?;

        tracing::info!(content_id = id, token_id = %token_id, "Content marked tokenized");

        Ok(content)
    }

    // Soulbound token operations

    /// Issue a soulbound token.
    ///
    /// If the payload links content, the content must exist and be approved,
    /// and its `token_issued`/`token_id` fields are updated in the same
    /// critical section as the token insert: no reader can observe one
    /// without the other. Fails with [`Error::Conflict`] if the external
    /// credential id has already been issued.
    pub fn create_soulbound_token(&self, new_token: NewSoulboundToken) -> Result<SoulboundToken> {
        let mut inner = self.inner.write();

        if inner
            .tokens
            .values()
            .any(|t| t.token_id == new_token.token_id)
        {
            return Err(Error::Conflict(format!(
                "token id already issued: {}",
                new_token.token_id
            )));
        }

        // Validate and update the linked content before inserting the token
        // so a failure leaves no partial state behind.
        if let Some(content_id) = new_token.content_id {
            inner.attach_token(content_id, &new_token.token_id)?;
        }

        let id = inner.next_token_id;
        inner.next_token_id += 1;

        let token = SoulboundToken {
            id,
            user_id: new_token.user_id,
            content_id: new_token.content_id,
            token_id: new_token.token_id,
            created_at: Utc::now(),
        };
        inner.tokens.insert(id, token.clone());

        tracing::info!(
            token_id = id,
            user_id = token.user_id,
            content_id = ?token.content_id,
            "Soulbound token issued"
        );

        Ok(token)
    }

    /// Get a soulbound token by id.
    pub fn get_soulbound_token(&self, id: u64) -> Option<SoulboundToken> {
        self.inner.read().tokens.get(&id).cloned()
    }

    /// Get all soulbound tokens held by a user. Unordered.
    pub fn get_soulbound_tokens_by_user(&self, user_id: u64) -> Vec<SoulboundToken> {
        self.inner
            .read()
            .tokens
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }

    // Leaderboard

    /// Rank users by token count, descending, truncated to `limit`.
    ///
    /// Pure recomputation over the current snapshot: counts tokens per user,
    /// resolves usernames and wallets (`"Unknown"` for dangling references),
    /// and breaks ties by ascending user id. Users with zero tokens are
    /// excluded.
    pub fn get_leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let inner = self.inner.read();

        let mut counts: HashMap<u64, u64> = HashMap::new();
        for token in inner.tokens.values() {
            *counts.entry(token.user_id).or_insert(0) += 1;
        }

        let mut entries: Vec<LeaderboardEntry> = counts
            .into_iter()
            .map(|(user_id, token_count)| {
                let user = inner.users.get(&user_id);
                LeaderboardEntry {
                    user_id,
                    username: user
                        .map_or_else(|| "Unknown".to_string(), |u| u.username.clone()),
                    near_wallet: user
                        .map_or_else(|| "Unknown".to_string(), |u| u.near_wallet.clone()),
                    token_count,
                }
            })
            .collect();

        entries.sort_by(|a, b| {
            b.token_count
                .cmp(&a.token_count)
                .then(a.user_id.cmp(&b.user_id))
        });
        entries.truncate(limit);

        entries
    }

    // Statistics

    /// Current entity counts.
    pub fn stats(&self) -> StorageStats {
        let inner = self.inner.read();
        StorageStats {
            total_users: inner.users.len() as u64,
            total_contents: inner.contents.len() as u64,
            total_tokens: inner.tokens.len() as u64,
        }
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("Storage")
            .field("users", &stats.total_users)
            .field("contents", &stats.total_contents)
            .field("tokens", &stats.total_tokens)
            .finish()
    }
}

/// Storage statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of user records.
    pub total_users: u64,
    /// Number of content records.
    pub total_contents: u64,
    /// Number of soulbound token records.
    pub total_tokens: u64,
}
