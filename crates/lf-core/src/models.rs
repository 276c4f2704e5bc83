//! # Domain Models
//!
//! These structs represent the core entities of the lost-and-found board and
//! the single `Document` that holds all of them. Field names serialize in
//! camelCase so a persisted document keeps the same shape across versions.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

pub type UserId = String;
pub type PostId = String;

/// Id of the administrator written by the default seed.
pub const ADMIN_ID: &str = "u_admin";

/// Generates an opaque id such as `p_3f2b...`.
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}{}", Uuid::new_v4().simple())
}

/// A registered account.
///
/// The password is stored and compared in plaintext. This is a known weak
/// property; the reset flow relies on the `wechat` field as its only
/// identity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password: String,
    /// Contact handle shown to other users on the author's posts
    #[serde(default)]
    pub wechat: String,
    /// Placeholder, never populated
    #[serde(default)]
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

/// The one active login for the whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Persisted as `""` when nobody is logged in.
    #[serde(default, with = "blank_as_none")]
    pub user_id: Option<UserId>,
}

/// Whether a notice reports something found or something lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    /// Item recovered, owner sought
    Found,
    /// Item missing, help requested
    Lost,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Found => "found",
            PostType::Lost => "lost",
        }
    }

    /// Heading used when a notice is displayed.
    pub fn label(&self) -> &'static str {
        match self {
            PostType::Found => "Found item",
            PostType::Lost => "Lost item",
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            v if v.eq_ignore_ascii_case("found") => Ok(PostType::Found),
            v if v.eq_ignore_ascii_case("lost") => Ok(PostType::Lost),
            other => Err(AppError::ValidationError(format!(
                "unknown post type '{other}', expected 'found' or 'lost'"
            ))),
        }
    }
}

/// A lost-or-found notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    #[serde(rename = "type")]
    pub kind: PostType,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub place: String,
    /// Data URL of an attached picture, empty when none
    #[serde(default)]
    pub image: String,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// A reply on a post. The owning post is the key it is grouped under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub user_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A private message between two users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub from_id: UserId,
    pub to_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Canonical identifier of a two-party message thread.
///
/// `ThreadKey::between(a, b) == ThreadKey::between(b, a)` for any ids, so a
/// thread is found under the same key no matter who started it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadKey(String);

impl ThreadKey {
    pub fn between(a: &str, b: &str) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Self(format!("{lo}__{hi}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The entire persisted state. Every mutation rewrites the whole value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub session: Session,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub comments: BTreeMap<PostId, Vec<Comment>>,
    #[serde(default)]
    pub messages: BTreeMap<ThreadKey, Vec<Message>>,
}

impl Document {
    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    /// The logged-in user. A session pointing at a missing user reads as
    /// nobody.
    pub fn session_user(&self) -> Option<&User> {
        self.session.user_id.as_deref().and_then(|id| self.user(id))
    }

    pub fn post(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }
}

/// Input for `BoardRepo::create_post`. `kind` is free text so that a
/// missing or misspelled type surfaces as a validation error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub kind: String,
    pub title: String,
    pub content: String,
    pub place: Option<String>,
    pub image: Option<String>,
}

/// Input for `AuthProvider::register`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub wechat: String,
}

mod blank_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.filter(|s| !s.is_empty()))
    }
}
