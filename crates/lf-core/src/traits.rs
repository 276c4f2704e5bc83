//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Comment, Document, Message, NewPost, Post, Registration, User};
use crate::query::PostQuery;

/// Whole-document persistence.
///
/// There are no partial updates: callers load, mutate in memory and save the
/// full document back.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the current document, writing the default seed first if
    /// nothing has been persisted yet.
    async fn load(&self) -> anyhow::Result<Document>;
    /// Overwrites the persisted document.
    async fn save(&self, doc: &Document) -> anyhow::Result<()>;
}

/// Session and credential contract.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The user referenced by the session, if any.
    async fn current_user(&self) -> Result<Option<User>>;

    /// Exact match on username and password; sets the session on success.
    async fn login(&self, username: &str, password: &str) -> Result<User>;

    /// Clears the session unconditionally.
    async fn logout(&self) -> Result<()>;

    /// Creates the account and logs it in.
    async fn register(&self, registration: Registration) -> Result<User>;

    /// Overwrites the password when username and wechat both match.
    async fn reset_password(&self, username: &str, wechat: &str, new_password: &str) -> Result<()>;
}

/// Posts, comments, direct messages and user lookup.
#[async_trait]
pub trait BoardRepo: Send + Sync {
    // Post Operations
    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>>;
    async fn list_posts_by_author(&self, author_id: &str) -> Result<Vec<Post>>;
    async fn get_post(&self, id: &str) -> Result<Option<Post>>;
    async fn create_post(&self, new_post: NewPost) -> Result<Post>;

    // Comment Operations
    async fn add_comment(&self, post_id: &str, content: &str) -> Result<Comment>;
    async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>>;

    // Message Operations
    async fn send_message(&self, peer_id: &str, content: &str) -> Result<Message>;
    async fn list_messages(&self, peer_id: &str) -> Result<Vec<Message>>;

    async fn get_user(&self, id: &str) -> Result<Option<User>>;
}
