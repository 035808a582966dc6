//! High-level storage facade
//!
//! [`Registry`] composes configuration, storage, the single-writer actor,
//! and metrics into the one type the surrounding HTTP layer talks to.
//! Mutations go through the actor; reads hit storage directly and observe
//! consistent snapshots.
//!
//! # Example
//!
//! ```no_run
//! use curation_core::{Config, NewContent, Registry};
//!
//! #[tokio::main]
//! async fn main() -> curation_core::Result<()> {
//!     let registry = Registry::open(Config::default()).await?;
//!
//!     let content = registry
//!         .create_content(NewContent {
//!             user_id: 1,
//!             text: "my submission".to_string(),
//!             link: None,
//!             image_url: None,
//!             categories: vec!["art".to_string()],
//!         })
//!         .await?;
//!     registry.approve_content(content.id).await?;
//!
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use crate::actor::{spawn_registry_actor, RegistryHandle};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::metrics::Metrics;
use crate::storage::{Storage, StorageStats};
use crate::types::{
    AiAnalysis, Content, LeaderboardEntry, NewContent, NewSoulboundToken, NewUser, SoulboundToken,
    User,
};

/// Main registry interface
pub struct Registry {
    /// Actor handle for mutations
    handle: RegistryHandle,

    /// Direct storage access (for reads)
    storage: Arc<Storage>,

    /// Metrics collector
    metrics: Metrics,

    /// Configuration
    config: Config,
}

impl Registry {
    /// Open a registry with configuration.
    ///
    /// Seeds the bootstrap admin before the actor starts: the seed record is
    /// admin from its first observable moment, and no other operation can
    /// run before it exists.
    pub async fn open(config: Config) -> Result<Self> {
        let storage = Arc::new(Storage::new());

        let admin = storage.create_admin_user(config.bootstrap.seed_user())?;
        tracing::info!(user_id = admin.id, username = %admin.username, "Bootstrap admin seeded");

        let handle = spawn_registry_actor(storage.clone(), config.actor.mailbox_capacity);

        let metrics = Metrics::new().map_err(|e| Error::Metrics(e.to_string()))?;
        metrics.users_created.inc();
        metrics.set_entity_counts(&storage.stats());

        Ok(Self {
            handle,
            storage,
            metrics,
            config,
        })
    }

    // User methods

    /// Create a user. Always non-admin.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User> {
        let user = self.handle.create_user(new_user).await?;
        self.metrics.users_created.inc();
        Ok(user)
    }

    /// Get a user by id.
    pub fn get_user(&self, id: u64) -> Option<User> {
        self.storage.get_user(id)
    }

    /// Get a user by username.
    pub fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.storage.get_user_by_username(username)
    }

    /// Get a user by wallet identifier.
    pub fn get_user_by_wallet(&self, wallet: &str) -> Option<User> {
        self.storage.get_user_by_wallet(wallet)
    }

    // Content methods

    /// Submit content. Lands in the pending state.
    pub async fn create_content(&self, new_content: NewContent) -> Result<Content> {
        let content = self.handle.create_content(new_content).await?;
        self.metrics.contents_submitted.inc();
        Ok(content)
    }

    /// Get content by id.
    pub fn get_content(&self, id: u64) -> Option<Content> {
        self.storage.get_content(id)
    }

    /// Get all content owned by a user.
    pub fn get_contents_by_user(&self, user_id: u64) -> Vec<Content> {
        self.storage.get_contents_by_user(user_id)
    }

    /// List content, most recent first. `limit` and `offset` default to the
    /// configured page size and zero.
    pub fn get_all_contents(&self, limit: Option<usize>, offset: Option<usize>) -> Vec<Content> {
        let limit = limit.unwrap_or(self.config.pagination.default_limit);
        let offset = offset.unwrap_or(0);
        self.storage.get_all_contents(limit, offset)
    }

    /// Attach an AI analysis result.
    pub async fn update_content_analysis(&self, id: u64, analysis: AiAnalysis) -> Result<Content> {
        self.handle.update_content_analysis(id, analysis).await
    }

    /// Approve content.
    pub async fn approve_content(&self, id: u64) -> Result<Content> {
        let content = self.handle.approve_content(id).await?;
        self.metrics.contents_approved.inc();
        Ok(content)
    }

    /// Reject content.
    pub async fn reject_content(&self, id: u64) -> Result<Content> {
        let content = self.handle.reject_content(id).await?;
        self.metrics.contents_rejected.inc();
        Ok(content)
    }

    /// Mark content as tokenized with an externally minted credential id.
    pub async fn update_content_token_id(&self, id: u64, token_id: String) -> Result<Content> {
        self.handle.update_content_token_id(id, token_id).await
    }

    // Soulbound token methods

    /// Issue a soulbound token. The linked content, if any, is updated
    /// atomically with the token insert.
    pub async fn create_soulbound_token(
        &self,
        new_token: NewSoulboundToken,
    ) -> Result<SoulboundToken> {
        let token = self.handle.create_soulbound_token(new_token).await?;
        self.metrics.tokens_issued.inc();
        Ok(token)
    }

    /// Get a soulbound token by id.
    pub fn get_soulbound_token(&self, id: u64) -> Option<SoulboundToken> {
        self.storage.get_soulbound_token(id)
    }

    /// Get all soulbound tokens held by a user.
    pub fn get_soulbound_tokens_by_user(&self, user_id: u64) -> Vec<SoulboundToken> {
        self.storage.get_soulbound_tokens_by_user(user_id)
    }

    // Leaderboard

    /// Rank users by token count. `limit` defaults to the configured row count.
    pub fn get_leaderboard(&self, limit: Option<usize>) -> Vec<LeaderboardEntry> {
        let limit = limit.unwrap_or(self.config.pagination.leaderboard_limit);
        self.storage.get_leaderboard(limit)
    }

    // Statistics

    /// Current entity counts. Also refreshes the entity-count gauges.
    pub fn stats(&self) -> StorageStats {
        let stats = self.storage.stats();
        self.metrics.set_entity_counts(&stats);
        stats
    }

    /// Metrics collector (for the scrape endpoint in the layer above).
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Configuration in effect.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shutdown registry
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown().await
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("service_name", &self.config.service_name)
            .field("storage", &self.storage)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn create_test_registry() -> Registry {
        Registry::open(Config::default()).await.unwrap()
    }

    fn test_content(user_id: u64) -> NewContent {
        NewContent {
            user_id,
            text: "registry test submission".to_string(),
            link: None,
            image_url: None,
            categories: vec!["writing".to_string()],
        }
    }

    #[tokio::test]
    async fn test_open_seeds_admin() {
        let registry = create_test_registry().await;

        let admin = registry.get_user_by_username("admin").unwrap();
        assert!(admin.is_admin);
        assert_eq!(admin.near_wallet, "admin.near");

        // Exactly one user exists at open
        assert_eq!(registry.stats().total_users, 1);

        // Wallet lookup resolves the same record
        let by_wallet = registry.get_user_by_wallet("admin.near").unwrap();
        assert_eq!(by_wallet.id, admin.id);

        registry.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_public_creates_are_not_admin() {
        let registry = create_test_registry().await;

        let user = registry
            .create_user(NewUser {
                username: "alice".to_string(),
                password: "pw".to_string(),
                near_wallet: "alice.near".to_string(),
                near_address: "0xaaa".to_string(),
            })
            .await
            .unwrap();
        assert!(!user.is_admin);
        assert_eq!(user.id, 2); // admin took id 1

        registry.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_full_content_lifecycle() {
        let registry = create_test_registry().await;

        let content = registry.create_content(test_content(1)).await.unwrap();
        assert_eq!(content.status(), crate::types::ContentStatus::Pending);

        registry
            .update_content_analysis(content.id, json!({"score": 91}))
            .await
            .unwrap();

        let approved = registry.approve_content(content.id).await.unwrap();
        assert_eq!(approved.status(), crate::types::ContentStatus::Approved);

        let token = registry
            .create_soulbound_token(NewSoulboundToken {
                user_id: 1,
                content_id: Some(content.id),
                token_id: "sbt-lifecycle".to_string(),
            })
            .await
            .unwrap();

        let final_content = registry.get_content(content.id).unwrap();
        assert_eq!(final_content.status(), crate::types::ContentStatus::Tokenized);
        assert_eq!(final_content.token_id.as_deref(), Some("sbt-lifecycle"));
        assert_eq!(
            final_content.ai_analysis,
            Some(json!({"score": 91}))
        );

        let held = registry.get_soulbound_tokens_by_user(1);
        assert_eq!(held, vec![token]);

        registry.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_pagination_defaults_from_config() {
        let mut config = Config::default();
        config.pagination.default_limit = 2;
        let registry = Registry::open(config).await.unwrap();

        for _ in 0..5 {
            registry.create_content(test_content(1)).await.unwrap();
        }

        // Default limit applies when none given
        assert_eq!(registry.get_all_contents(None, None).len(), 2);
        // Explicit limit wins
        assert_eq!(registry.get_all_contents(Some(4), None).len(), 4);
        // Offset walks the window
        let page = registry.get_all_contents(Some(2), Some(1));
        assert_eq!(page.iter().map(|c| c.id).collect::<Vec<_>>(), vec![4, 3]);

        registry.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_leaderboard_through_facade() {
        let registry = create_test_registry().await;

        for n in 0..2 {
            registry
                .create_soulbound_token(NewSoulboundToken {
                    user_id: 1,
                    content_id: None,
                    token_id: format!("sbt-{}", n),
                })
                .await
                .unwrap();
        }

        let board = registry.get_leaderboard(None);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].username, "admin");
        assert_eq!(board[0].token_count, 2);

        registry.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_metrics_track_operations() {
        let registry = create_test_registry().await;

        registry.create_content(test_content(1)).await.unwrap();
        registry.create_content(test_content(1)).await.unwrap();
        registry.approve_content(1).await.unwrap();
        registry.reject_content(2).await.unwrap();

        let metrics = registry.metrics();
        assert_eq!(metrics.users_created.get(), 1); // bootstrap admin
        assert_eq!(metrics.contents_submitted.get(), 2);
        assert_eq!(metrics.contents_approved.get(), 1);
        assert_eq!(metrics.contents_rejected.get(), 1);

        let stats = registry.stats();
        assert_eq!(stats.total_contents, 2);
        assert_eq!(metrics.contents.get(), 2);

        registry.shutdown().await.unwrap();
    }
}
