//! Post listing filters and ordering.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{Comment, Post, PostType};

/// Restricts a listing to one post type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeFilter {
    #[default]
    All,
    Only(PostType),
}

impl TypeFilter {
    pub fn accepts(&self, kind: PostType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => *wanted == kind,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        s.parse().map(TypeFilter::Only)
    }
}

/// Filter for `BoardRepo::list_posts`. The default lists everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostQuery {
    pub kind: TypeFilter,
    /// Case-insensitive substring over title, content and place.
    /// Blank text matches every post.
    pub text: String,
}

impl PostQuery {
    pub fn new(kind: TypeFilter, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }

    pub fn matches(&self, post: &Post) -> bool {
        if !self.kind.accepts(post.kind) {
            return false;
        }
        let needle = self.text.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&post.title, &post.content, &post.place]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Newest first. Ties keep no particular order.
pub fn newest_first(a: &Post, b: &Post) -> Ordering {
    b.created_at.cmp(&a.created_at)
}

/// Oldest first, the order comments are read in.
pub fn oldest_first(a: &Comment, b: &Comment) -> Ordering {
    a.created_at.cmp(&b.created_at)
}
