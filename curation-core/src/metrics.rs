//! Metrics collection for observability
//!
//! Prometheus metrics for the curation core, registered on an instance-local
//! registry so multiple cores (and tests) can coexist in one process.
//!
//! # Metrics
//!
//! - `curation_users_created_total` - Users created
//! - `curation_contents_submitted_total` - Content items submitted
//! - `curation_contents_approved_total` - Approval transitions
//! - `curation_contents_rejected_total` - Rejection transitions
//! - `curation_tokens_issued_total` - Soulbound tokens issued
//! - `curation_users` / `curation_contents` / `curation_tokens` - Current entity counts

use std::sync::Arc;

use prometheus::{IntCounter, IntGauge, Registry};

use crate::storage::StorageStats;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Users created
    pub users_created: IntCounter,

    /// Content items submitted
    pub contents_submitted: IntCounter,

    /// Approval transitions
    pub contents_approved: IntCounter,

    /// Rejection transitions
    pub contents_rejected: IntCounter,

    /// Soulbound tokens issued
    pub tokens_issued: IntCounter,

    /// Current user count
    pub users: IntGauge,

    /// Current content count
    pub contents: IntGauge,

    /// Current token count
    pub tokens: IntGauge,

    registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let users_created =
            IntCounter::new("curation_users_created_total", "Users created")?;
        registry.register(Box::new(users_created.clone()))?;

        let contents_submitted = IntCounter::new(
            "curation_contents_submitted_total",
            "Content items submitted",
        )?;
        registry.register(Box::new(contents_submitted.clone()))?;

        let contents_approved =
            IntCounter::new("curation_contents_approved_total", "Approval transitions")?;
        registry.register(Box::new(contents_approved.clone()))?;

        let contents_rejected =
            IntCounter::new("curation_contents_rejected_total", "Rejection transitions")?;
        registry.register(Box::new(contents_rejected.clone()))?;

        let tokens_issued =
            IntCounter::new("curation_tokens_issued_total", "Soulbound tokens issued")?;
        registry.register(Box::new(tokens_issued.clone()))?;

        let users = IntGauge::new("curation_users", "Current user count")?;
        registry.register(Box::new(users.clone()))?;

        let contents = IntGauge::new("curation_contents", "Current content count")?;
        registry.register(Box::new(contents.clone()))?;

        let tokens = IntGauge::new("curation_tokens", "Current token count")?;
        registry.register(Box::new(tokens.clone()))?;

        Ok(Self {
            users_created,
            contents_submitted,
            contents_approved,
            contents_rejected,
            tokens_issued,
            users,
            contents,
            tokens,
            registry,
        })
    }

    /// Update the entity-count gauges from a storage snapshot
    pub fn set_entity_counts(&self, stats: &StorageStats) {
        self.users.set(stats.total_users as i64);
        self.contents.set(stats.total_contents as i64);
        self.tokens.set(stats.total_tokens as i64);
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("users_created", &self.users_created.get())
            .field("contents_submitted", &self.contents_submitted.get())
            .field("tokens_issued", &self.tokens_issued.get())
            .finish()
    }
}
