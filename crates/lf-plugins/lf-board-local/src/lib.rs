//! # lf-board-local Implementation
//!
//! This module implements `BoardRepo` on top of a `DocumentStore`: posts,
//! comments and direct messages all live in the one persisted document.

use async_trait::async_trait;
use chrono::Utc;
use lf_core::error::{AppError, Result};
use lf_core::models::{new_id, Comment, Message, NewPost, Post, PostType, ThreadKey, User};
use lf_core::query::{newest_first, oldest_first, PostQuery};
use lf_core::traits::{AuthProvider, BoardRepo, DocumentStore};
use std::sync::Arc;
use tracing::{debug, info};

pub struct DocumentBoardRepo {
    store: Arc<dyn DocumentStore>,
    /// Source of the acting user for every write
    auth: Arc<dyn AuthProvider>,
}

impl DocumentBoardRepo {
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { store, auth }
    }

    /// The logged-in user, or `AuthError` with `reason`.
    async fn require_user(&self, reason: &str) -> Result<User> {
        self.auth
            .current_user()
            .await?
            .ok_or_else(|| AppError::AuthError(reason.to_string()))
    }
}

/// Checks the required fields of a new post and resolves its type.
fn validate(new_post: &NewPost) -> Result<PostType> {
    if [&new_post.kind, &new_post.title, &new_post.content]
        .iter()
        .any(|f| f.trim().is_empty())
    {
        return Err(AppError::ValidationError("title, content and type are required".into()));
    }
    new_post.kind.parse()
}

#[async_trait]
impl BoardRepo for DocumentBoardRepo {
    /// Filters by type and text, newest first.
    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>> {
        let doc = self.store.load().await?;
        let mut posts: Vec<Post> = doc.posts.into_iter().filter(|p| query.matches(p)).collect();
        posts.sort_by(newest_first);
        debug!(?query, hits = posts.len(), "listed posts");
        Ok(posts)
    }

    async fn list_posts_by_author(&self, author_id: &str) -> Result<Vec<Post>> {
        let doc = self.store.load().await?;
        let mut posts: Vec<Post> = doc.posts.into_iter().filter(|p| p.author_id == author_id).collect();
        posts.sort_by(newest_first);
        Ok(posts)
    }

    async fn get_post(&self, id: &str) -> Result<Option<Post>> {
        let doc = self.store.load().await?;
        Ok(doc.post(id).cloned())
    }

    /// The session is checked before any field, so an anonymous caller
    /// always gets `AuthError`.
    async fn create_post(&self, new_post: NewPost) -> Result<Post> {
        let me = self.require_user("please log in before posting").await?;
        let kind = validate(&new_post)?;

        let mut doc = self.store.load().await?;
        let post = Post {
            id: new_id("p_"),
            kind,
            title: new_post.title,
            content: new_post.content,
            place: new_post.place.unwrap_or_default(),
            image: new_post.image.unwrap_or_default(),
            author_id: me.id,
            created_at: Utc::now(),
        };
        doc.posts.push(post.clone());
        self.store.save(&doc).await?;

        info!(post_id = %post.id, kind = %post.kind, author_id = %post.author_id, "post created");
        Ok(post)
    }

    /// Appends to the post's comment list. The post itself is not looked up.
    async fn add_comment(&self, post_id: &str, content: &str) -> Result<Comment> {
        let me = self.require_user("please log in before commenting").await?;

        let mut doc = self.store.load().await?;
        let comment = Comment {
            id: new_id("c_"),
            user_id: me.id,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        doc.comments
            .entry(post_id.to_string())
            .or_default()
            .push(comment.clone());
        self.store.save(&doc).await?;

        info!(post_id, comment_id = %comment.id, "comment added");
        Ok(comment)
    }

    /// Oldest first, unlike post listings.
    async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        let mut doc = self.store.load().await?;
        let mut comments = doc.comments.remove(post_id).unwrap_or_default();
        comments.sort_by(oldest_first);
        Ok(comments)
    }

    async fn send_message(&self, peer_id: &str, content: &str) -> Result<Message> {
        let me = self.require_user("not logged in").await?;
        let key = ThreadKey::between(&me.id, peer_id);

        let mut doc = self.store.load().await?;
        let message = Message {
            from_id: me.id,
            to_id: peer_id.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        doc.messages.entry(key.clone()).or_default().push(message.clone());
        self.store.save(&doc).await?;

        info!(thread = %key, "message sent");
        Ok(message)
    }

    /// The whole thread in send order.
    async fn list_messages(&self, peer_id: &str) -> Result<Vec<Message>> {
        let me = self.require_user("not logged in").await?;
        let key = ThreadKey::between(&me.id, peer_id);

        let mut doc = self.store.load().await?;
        Ok(doc.messages.remove(&key).unwrap_or_default())
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        let doc = self.store.load().await?;
        Ok(doc.user(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lf_auth_simple::SimpleAuthProvider;
    use lf_core::models::{Document, Registration, ADMIN_ID};
    use lf_core::query::TypeFilter;
    use lf_core::seed::Seed;
    use lf_core::traits::{MockAuthProvider, MockDocumentStore};
    use lf_storage_local::MemoryStore;

    struct Board {
        auth: Arc<SimpleAuthProvider>,
        repo: DocumentBoardRepo,
    }

    fn board_with(store: MemoryStore) -> Board {
        let store: Arc<dyn DocumentStore> = Arc::new(store);
        let auth = Arc::new(SimpleAuthProvider::new(store.clone()));
        let repo = DocumentBoardRepo::new(store, auth.clone());
        Board { auth, repo }
    }

    fn empty_board() -> Board {
        board_with(MemoryStore::new(Seed { sample_posts: false, ..Seed::default() }))
    }

    fn lost(title: &str, content: &str) -> NewPost {
        NewPost {
            kind: "lost".into(),
            title: title.into(),
            content: content.into(),
            ..NewPost::default()
        }
    }

    #[tokio::test]
    async fn create_post_without_session_is_auth_error() {
        let mut auth = MockAuthProvider::new();
        auth.expect_current_user().returning(|| Ok(None));
        let mut store = MockDocumentStore::new();
        store.expect_load().times(0);
        store.expect_save().times(0);
        let repo = DocumentBoardRepo::new(Arc::new(store), Arc::new(auth));

        // Invalid fields too: the session check wins.
        for new_post in [lost("Phone", "black phone"), NewPost::default()] {
            let err = repo.create_post(new_post).await.unwrap_err();
            assert!(matches!(err, AppError::AuthError(_)));
        }
    }

    #[tokio::test]
    async fn create_post_fills_defaults() {
        let b = empty_board();
        b.auth.login("admin", "admin123").await.unwrap();

        let post = b.repo.create_post(lost("Phone", "black phone")).await.unwrap();

        assert!(post.id.starts_with("p_"));
        assert_eq!(post.kind, PostType::Lost);
        assert_eq!(post.author_id, ADMIN_ID);
        assert_eq!(post.place, "");
        assert_eq!(post.image, "");
        let fetched = b.repo.get_post(&post.id).await.unwrap();
        assert_eq!(fetched, Some(post));
    }

    #[tokio::test]
    async fn create_post_requires_fields_and_known_type() {
        let b = empty_board();
        b.auth.login("admin", "admin123").await.unwrap();

        for bad in [
            NewPost { kind: String::new(), ..lost("Phone", "black phone") },
            lost("", "black phone"),
            lost("Phone", "   "),
            NewPost { kind: "stolen".into(), ..lost("Phone", "black phone") },
        ] {
            let err = b.repo.create_post(bad).await.unwrap_err();
            assert!(matches!(err, AppError::ValidationError(_)));
        }
        assert!(b.repo.list_posts(&PostQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_posts_sorts_newest_first_and_filters() {
        let now = Utc::now();
        let mut doc = Seed { sample_posts: false, ..Seed::default() }.build(now);
        for (i, (kind, title)) in [(PostType::Found, "Keys"), (PostType::Lost, "Wallet"), (PostType::Found, "Card")]
            .into_iter()
            .enumerate()
        {
            doc.posts.push(Post {
                id: format!("p_{i}"),
                kind,
                title: title.into(),
                content: String::new(),
                place: "Library".into(),
                image: String::new(),
                author_id: ADMIN_ID.into(),
                created_at: now - Duration::minutes(10 - i as i64),
            });
        }
        let b = board_with(MemoryStore::with_document(doc));

        let all = b.repo.list_posts(&PostQuery::default()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p_2", "p_1", "p_0"]);

        let found = b
            .repo
            .list_posts(&PostQuery::new(TypeFilter::Only(PostType::Found), ""))
            .await
            .unwrap();
        assert_eq!(found.len(), 2);

        let wallet = b.repo.list_posts(&PostQuery::new(TypeFilter::All, "WALL")).await.unwrap();
        assert_eq!(wallet.len(), 1);
        assert_eq!(wallet[0].id, "p_1");

        let library = b.repo.list_posts(&PostQuery::new(TypeFilter::All, "library")).await.unwrap();
        assert_eq!(library.len(), 3);
    }

    #[tokio::test]
    async fn posts_by_author() {
        let b = empty_board();
        b.auth.login("admin", "admin123").await.unwrap();
        b.repo.create_post(lost("Umbrella", "black")).await.unwrap();
        b.auth
            .register(Registration { username: "bob".into(), password: "pw".into(), wechat: String::new() })
            .await
            .unwrap();
        let bobs = b.repo.create_post(lost("Bike", "red")).await.unwrap();

        let mine = b.repo.list_posts_by_author(&bobs.author_id).await.unwrap();

        assert_eq!(mine, vec![bobs]);
        assert_eq!(b.repo.list_posts_by_author(ADMIN_ID).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_post_and_user_are_none() {
        let b = empty_board();
        assert!(b.repo.get_post("p_nope").await.unwrap().is_none());
        assert!(b.repo.get_user("u_nope").await.unwrap().is_none());
        assert_eq!(b.repo.get_user(ADMIN_ID).await.unwrap().unwrap().username, "admin");
    }

    #[tokio::test]
    async fn comments_require_session() {
        let b = empty_board();
        let err = b.repo.add_comment("p_1", "hello").await.unwrap_err();
        assert!(matches!(err, AppError::AuthError(_)));
    }

    #[tokio::test]
    async fn comments_read_oldest_first() {
        let now = Utc::now();
        let mut doc = Document::default();
        let at = |mins: i64, text: &str| Comment {
            id: new_id("c_"),
            user_id: ADMIN_ID.into(),
            content: text.into(),
            created_at: now - Duration::minutes(mins),
        };
        doc.comments.insert("p_1".into(), vec![at(1, "third"), at(5, "first"), at(3, "second")]);
        let b = board_with(MemoryStore::with_document(doc));

        let texts: Vec<_> = b
            .repo
            .list_comments("p_1")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.content)
            .collect();

        assert_eq!(texts, ["first", "second", "third"]);
        assert!(b.repo.list_comments("p_2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_comment_appends() {
        let b = empty_board();
        b.auth.login("admin", "admin123").await.unwrap();

        b.repo.add_comment("p_1", "is it still there?").await.unwrap();
        b.repo.add_comment("p_1", "").await.unwrap();

        let comments = b.repo.list_comments("p_1").await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].content, "is it still there?");
        assert_eq!(comments[0].user_id, ADMIN_ID);
    }

    #[tokio::test]
    async fn messages_require_session() {
        let b = empty_board();
        assert!(matches!(b.repo.send_message(ADMIN_ID, "hi").await, Err(AppError::AuthError(_))));
        assert!(matches!(b.repo.list_messages(ADMIN_ID).await, Err(AppError::AuthError(_))));
    }

    #[tokio::test]
    async fn message_threads_are_symmetric() {
        let b = empty_board();
        let bob = b
            .auth
            .register(Registration { username: "bob".into(), password: "pw".into(), wechat: String::new() })
            .await
            .unwrap();
        b.repo.send_message(ADMIN_ID, "found your card?").await.unwrap();

        b.auth.login("admin", "admin123").await.unwrap();
        b.repo.send_message(&bob.id, "yes, library desk").await.unwrap();
        let admin_view = b.repo.list_messages(&bob.id).await.unwrap();

        b.auth.login("bob", "pw").await.unwrap();
        let bob_view = b.repo.list_messages(ADMIN_ID).await.unwrap();

        assert_eq!(admin_view, bob_view);
        assert_eq!(bob_view.len(), 2);
        assert_eq!(bob_view[0].from_id, bob.id);
        assert_eq!(bob_view[0].to_id, ADMIN_ID);
        assert_eq!(bob_view[1].content, "yes, library desk");
    }
}
