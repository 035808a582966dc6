//! Curation Platform Core
//!
//! Storage and lifecycle core for a content-submission and moderation
//! platform: users submit text/link/image content, an admin approves or
//! rejects it, and approved content may be issued a non-transferable
//! credential (a soulbound token). HTTP routing, sessions, and the AI
//! scorer live in the layer above and call in through [`Registry`].
//!
//! # Architecture
//!
//! - **Single Writer**: all mutations are serialized through one actor task
//! - **Snapshot Reads**: getters take a shared lock and return owned clones
//! - **Atomic Issuance**: a token insert and its content-side update commit
//!   in one critical section
//!
//! # Invariants
//!
//! - Ids are unique and strictly increasing within each entity type
//! - `approved` and `rejected` are never both set on a content record
//! - `token_issued` implies `approved` and implies `token_id` is present
//! - Tokens are append-only: never mutated or deleted

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod actor;
pub mod config;
pub mod error;
pub mod metrics;
pub mod registry;
pub mod storage;
pub mod types;

// Re-exports
pub use config::Config;
pub use error::{Error, Result};
pub use registry::Registry;
pub use storage::{Storage, StorageStats};
pub use types::{
    AiAnalysis, Content, ContentStatus, LeaderboardEntry, NewContent, NewSoulboundToken, NewUser,
    SoulboundToken, User,
};
