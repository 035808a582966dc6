//! Single-writer concurrency for the store
//!
//! All mutating operations are funneled through one actor task, so they
//! execute in a total order and no two mutations on the same entity can
//! interleave. Callers hold a cloneable [`RegistryHandle`] and await the
//! oneshot reply for each request.
//!
//! Reads never pass through the mailbox; they take the storage read lock
//! directly and run concurrently with each other.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::error::{Error, Result};
use crate::storage::Storage;
use crate::types::{
    AiAnalysis, Content, NewContent, NewSoulboundToken, NewUser, SoulboundToken, User,
};

/// Message sent to the registry actor
pub enum RegistryMessage {
    /// Create a user
    CreateUser {
        /// Creation payload.
        new_user: NewUser,
        /// Reply channel.
        reply: oneshot::Sender<Result<User>>,
    },

    /// Submit content
    CreateContent {
        /// Creation payload.
        new_content: NewContent,
        /// Reply channel.
        reply: oneshot::Sender<Content>,
    },

    /// Attach an AI analysis result
    UpdateContentAnalysis {
        /// Target content id.
        id: u64,
        /// Opaque analysis value.
        analysis: AiAnalysis,
        /// Reply channel.
        reply: oneshot::Sender<Result<Content>>,
    },

    /// Approve content
    ApproveContent {
        /// Target content id.
        id: u64,
        /// Reply channel.
        reply: oneshot::Sender<Result<Content>>,
    },

    /// Reject content
    RejectContent {
        /// Target content id.
        id: u64,
        /// Reply channel.
        reply: oneshot::Sender<Result<Content>>,
    },

    /// Mark content as tokenized
    UpdateContentTokenId {
        /// Target content id.
        id: u64,
        /// External credential id.
        token_id: String,
        /// Reply channel.
        reply: oneshot::Sender<Result<Content>>,
    },

    /// Issue a soulbound token
    CreateSoulboundToken {
        /// Creation payload.
        new_token: NewSoulboundToken,
        /// Reply channel.
        reply: oneshot::Sender<Result<SoulboundToken>>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor that processes registry messages
pub struct RegistryActor {
    /// Storage backend
    storage: Arc<Storage>,

    /// Mailbox for incoming messages
    mailbox: mpsc::Receiver<RegistryMessage>,
}

impl RegistryActor {
    /// Create new actor
    pub fn new(storage: Arc<Storage>, mailbox: mpsc::Receiver<RegistryMessage>) -> Self {
        Self { storage, mailbox }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.mailbox.recv().await {
            match msg {
                RegistryMessage::Shutdown => break,
                msg => self.handle_message(msg),
            }
        }
        tracing::debug!("Registry actor stopped");
    }

    /// Handle a single message
    fn handle_message(&mut self, msg: RegistryMessage) {
        match msg {
            RegistryMessage::CreateUser { new_user, reply } => {
                let _ = reply.send(self.storage.create_user(new_user));
            }

            RegistryMessage::CreateContent { new_content, reply } => {
                let _ = reply.send(self.storage.create_content(new_content));
            }

            RegistryMessage::UpdateContentAnalysis { id, analysis, reply } => {
                let _ = reply.send(self.storage.update_content_analysis(id, analysis));
            }

            RegistryMessage::ApproveContent { id, reply } => {
                let _ = reply.send(self.storage.approve_content(id));
            }

            RegistryMessage::RejectContent { id, reply } => {
                let _ = reply.send(self.storage.reject_content(id));
            }

            RegistryMessage::UpdateContentTokenId { id, token_id, reply } => {
                let _ = reply.send(self.storage.update_content_token_id(id, &token_id));
            }

            RegistryMessage::CreateSoulboundToken { new_token, reply } => {
                let _ = reply.send(self.storage.create_soulbound_token(new_token));
            }

            RegistryMessage::Shutdown => {
                // Handled in main loop
            }
        }
    }
}

/// Handle for sending messages to the actor
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    sender: mpsc::Sender<RegistryMessage>,
}

impl RegistryHandle {
    /// Create new handle
    pub fn new(sender: mpsc::Sender<RegistryMessage>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> RegistryMessage,
    ) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(make(tx))
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Reply channel closed".to_string()))
    }

    /// Create a user
    pub async fn create_user(&self, new_user: NewUser) -> Result<User> {
        self.request(|reply| RegistryMessage::CreateUser { new_user, reply })
            .await?
    }

    /// Submit content
    pub async fn create_content(&self, new_content: NewContent) -> Result<Content> {
        self.request(|reply| RegistryMessage::CreateContent { new_content, reply })
            .await
    }

    /// Attach an AI analysis result
    pub async fn update_content_analysis(&self, id: u64, analysis: AiAnalysis) -> Result<Content> {
        self.request(|reply| RegistryMessage::UpdateContentAnalysis { id, analysis, reply })
            .await?
    }

    /// Approve content
    pub async fn approve_content(&self, id: u64) -> Result<Content> {
        self.request(|reply| RegistryMessage::ApproveContent { id, reply })
            .await?
    }

    /// Reject content
    pub async fn reject_content(&self, id: u64) -> Result<Content> {
        self.request(|reply| RegistryMessage::RejectContent { id, reply })
            .await?
    }

    /// Mark content as tokenized
    pub async fn update_content_token_id(&self, id: u64, token_id: String) -> Result<Content> {
        self.request(|reply| RegistryMessage::UpdateContentTokenId { id, token_id, reply })
            .await?
    }

    /// Issue a soulbound token
    pub async fn create_soulbound_token(
        &self,
        new_token: NewSoulboundToken,
    ) -> Result<SoulboundToken> {
        self.request(|reply| RegistryMessage::CreateSoulboundToken { new_token, reply })
            .await?
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(RegistryMessage::Shutdown)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        Ok(())
    }
}

/// Spawn the registry actor
pub fn spawn_registry_actor(storage: Arc<Storage>, mailbox_capacity: usize) -> RegistryHandle {
    let (tx, rx) = mpsc::channel(mailbox_capacity); // Bounded channel for backpressure
    let actor = RegistryActor::new(storage, rx);

    tokio::spawn(async move {
        actor.run().await;
    });

    RegistryHandle::new(tx)
}
