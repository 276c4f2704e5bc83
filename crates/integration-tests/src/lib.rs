//! Shared fixtures for the cross-crate behaviour tests.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use lf_auth_simple::SimpleAuthProvider;
use lf_board_local::DocumentBoardRepo;
use lf_core::models::{Document, NewPost, Post, PostType, Registration, ADMIN_ID};
use lf_core::seed::Seed;
use lf_core::traits::DocumentStore;
use lf_storage_local::MemoryStore;

/// Store, auth and board wired together the way the binary does it.
pub struct Harness {
    pub store: Arc<dyn DocumentStore>,
    pub auth: Arc<SimpleAuthProvider>,
    pub board: DocumentBoardRepo,
}

impl Harness {
    pub fn over(store: Arc<dyn DocumentStore>) -> Self {
        let auth = Arc::new(SimpleAuthProvider::new(store.clone()));
        let board = DocumentBoardRepo::new(store.clone(), auth.clone());
        Self { store, auth, board }
    }

    /// Admin account only, no sample posts.
    pub fn empty() -> Self {
        Self::over(Arc::new(MemoryStore::new(Seed { sample_posts: false, ..Seed::default() })))
    }

    /// The full default seed.
    pub fn seeded() -> Self {
        Self::over(Arc::new(MemoryStore::default()))
    }

    pub fn with_document(doc: Document) -> Self {
        Self::over(Arc::new(MemoryStore::with_document(doc)))
    }
}

pub fn registration(username: &str, password: &str, wechat: &str) -> Registration {
    Registration {
        username: username.into(),
        password: password.into(),
        wechat: wechat.into(),
    }
}

pub fn new_post(kind: &str, title: &str, content: &str) -> NewPost {
    NewPost {
        kind: kind.into(),
        title: title.into(),
        content: content.into(),
        ..NewPost::default()
    }
}

/// A post by the admin with a fixed timestamp, for ordering tests.
pub fn post_at(id: &str, kind: PostType, title: &str, created_at: DateTime<Utc>) -> Post {
    Post {
        id: id.into(),
        kind,
        title: title.into(),
        content: format!("{title} details"),
        place: String::new(),
        image: String::new(),
        author_id: ADMIN_ID.into(),
        created_at,
    }
}

/// The default seed plus `posts`, nobody logged in.
pub fn document_with(posts: Vec<Post>) -> Document {
    let mut doc = Seed { sample_posts: false, ..Seed::default() }.build(Utc::now());
    doc.posts = posts;
    doc
}
