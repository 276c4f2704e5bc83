//! # lf-auth-simple
//!
//! Document-backed implementation of `AuthProvider`.
//! Handles the single session, login/logout, registration and password reset.
//!
//! Credentials are compared in plaintext, and password reset is gated only on
//! the username and wechat handle matching. Both are deliberately weak and
//! kept as-is so stored documents and user-visible behavior stay compatible.

use async_trait::async_trait;
use chrono::Utc;
use lf_core::error::{AppError, Result};
use lf_core::models::{new_id, Registration, User};
use lf_core::traits::{AuthProvider, DocumentStore};
use std::sync::Arc;
use tracing::{info, warn};

pub struct SimpleAuthProvider {
    store: Arc<dyn DocumentStore>,
}

impl SimpleAuthProvider {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

/// Returns the trimmed value, or a validation error when nothing is left.
fn require<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::ValidationError(format!("{field} is required")));
    }
    Ok(value)
}

/// Passwords are taken verbatim; only emptiness is checked.
fn require_password(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(AppError::ValidationError(format!("{field} is required")));
    }
    Ok(())
}

#[async_trait]
impl AuthProvider for SimpleAuthProvider {
    async fn current_user(&self) -> Result<Option<User>> {
        let doc = self.store.load().await?;
        Ok(doc.session_user().cloned())
    }

    async fn login(&self, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        let mut doc = self.store.load().await?;
        let user = match doc
            .users
            .iter()
            .find(|u| u.username == username && u.password == password)
        {
            Some(u) => u.clone(),
            None => {
                warn!(username, "login rejected");
                return Err(AppError::AuthError("wrong username or password".into()));
            }
        };

        doc.session.user_id = Some(user.id.clone());
        self.store.save(&doc).await?;
        info!(user_id = %user.id, "logged in");
        Ok(user)
    }

    async fn logout(&self) -> Result<()> {
        let mut doc = self.store.load().await?;
        let previous = doc.session.user_id.take();
        self.store.save(&doc).await?;
        info!(user_id = previous.as_deref().unwrap_or("-"), "logged out");
        Ok(())
    }

    async fn register(&self, registration: Registration) -> Result<User> {
        let Registration { username, password, wechat } = registration;
        let username = require("username", &username)?.to_string();
        require_password("password", &password)?;
        let wechat = wechat.trim().to_string();

        let mut doc = self.store.load().await?;
        if doc.user_by_username(&username).is_some() {
            return Err(AppError::ValidationError("username already exists".into()));
        }

        let user = User {
            id: new_id("u_"),
            username,
            password,
            wechat,
            avatar: String::new(),
            created_at: Utc::now(),
        };
        doc.users.push(user.clone());
        doc.session.user_id = Some(user.id.clone());
        self.store.save(&doc).await?;

        info!(user_id = %user.id, username = %user.username, "registered");
        Ok(user)
    }

    async fn reset_password(&self, username: &str, wechat: &str, new_password: &str) -> Result<()> {
        let username = require("username", username)?;
        let wechat = require("wechat", wechat)?;
        require_password("new password", new_password)?;

        let mut doc = self.store.load().await?;
        let Some(user) = doc
            .users
            .iter_mut()
            .find(|u| u.username == username && u.wechat == wechat)
        else {
            warn!(username, "password reset rejected");
            return Err(AppError::AuthError("username and wechat do not match".into()));
        };

        user.password = new_password.to_string();
        let user_id = user.id.clone();
        self.store.save(&doc).await?;
        info!(user_id = %user_id, "password reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lf_core::models::{Document, ADMIN_ID};
    use lf_core::seed::Seed;
    use lf_core::traits::MockDocumentStore;
    use lf_storage_local::MemoryStore;

    fn seeded() -> Document {
        Seed::default().build(Utc::now())
    }

    fn provider() -> (Arc<MemoryStore>, SimpleAuthProvider) {
        let store = Arc::new(MemoryStore::default());
        let auth = SimpleAuthProvider::new(store.clone());
        (store, auth)
    }

    fn alice() -> Registration {
        Registration {
            username: "alice".into(),
            password: "pw1".into(),
            wechat: "wx-alice".into(),
        }
    }

    #[tokio::test]
    async fn nobody_is_logged_in_initially() {
        let (_, auth) = provider();
        assert!(auth.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn login_sets_session() {
        let (store, auth) = provider();

        let user = auth.login("admin", "admin123").await.unwrap();

        assert_eq!(user.id, ADMIN_ID);
        assert_eq!(store.load().await.unwrap().session.user_id.as_deref(), Some(ADMIN_ID));
        assert_eq!(auth.current_user().await.unwrap().unwrap().username, "admin");
    }

    #[tokio::test]
    async fn wrong_password_never_saves() {
        let mut store = MockDocumentStore::new();
        store.expect_load().returning(|| Ok(seeded()));
        store.expect_save().times(0);
        let auth = SimpleAuthProvider::new(Arc::new(store));

        let err = auth.login("admin", "nope").await.unwrap_err();

        assert!(matches!(err, AppError::AuthError(_)));
    }

    #[tokio::test]
    async fn unknown_user_cannot_log_in() {
        let (_, auth) = provider();
        let err = auth.login("ghost", "admin123").await.unwrap_err();
        assert!(matches!(err, AppError::AuthError(_)));
    }

    #[tokio::test]
    async fn logout_clears_session_even_when_empty() {
        let (_, auth) = provider();
        auth.logout().await.unwrap();

        auth.login("admin", "admin123").await.unwrap();
        auth.logout().await.unwrap();

        assert!(auth.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn register_logs_in_new_user() {
        let (store, auth) = provider();

        let user = auth.register(alice()).await.unwrap();

        assert!(user.id.starts_with("u_"));
        assert_eq!(user.wechat, "wx-alice");
        let doc = store.load().await.unwrap();
        assert_eq!(doc.users.len(), 2);
        assert_eq!(doc.session.user_id.as_deref(), Some(user.id.as_str()));
    }

    #[tokio::test]
    async fn register_duplicate_username_fails() {
        let (store, auth) = provider();
        auth.register(alice()).await.unwrap();

        let err = auth.register(alice()).await.unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(store.load().await.unwrap().users.len(), 2);
    }

    #[tokio::test]
    async fn register_requires_username_and_password() {
        let (_, auth) = provider();
        let blank_name = Registration { username: " ".into(), ..alice() };
        let blank_password = Registration { password: String::new(), ..alice() };

        assert!(matches!(auth.register(blank_name).await, Err(AppError::ValidationError(_))));
        assert!(matches!(auth.register(blank_password).await, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn padded_username_collides_with_existing_account() {
        let (store, auth) = provider();
        auth.register(alice()).await.unwrap();

        let padded = Registration { username: " alice ".into(), password: "pw2".into(), ..alice() };
        let err = auth.register(padded).await.unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
        let names: Vec<_> = store.load().await.unwrap().users.into_iter().map(|u| u.username).collect();
        assert_eq!(names, ["admin", "alice"]);
        assert!(auth.login("alice", "pw2").await.is_err());
        assert!(auth.login(" alice ", "pw1").await.is_ok());
    }

    #[tokio::test]
    async fn register_stores_trimmed_username_and_wechat() {
        let (_, auth) = provider();

        let user = auth
            .register(Registration { username: "  bob ".into(), password: " pw ".into(), wechat: " wx-bob ".into() })
            .await
            .unwrap();

        assert_eq!(user.username, "bob");
        assert_eq!(user.wechat, "wx-bob");
        assert_eq!(user.password, " pw ");
        auth.reset_password(" bob", "wx-bob ", "fresh").await.unwrap();
        assert!(auth.login("bob", "fresh").await.is_ok());
    }

    #[tokio::test]
    async fn register_allows_empty_wechat() {
        let (_, auth) = provider();
        let user = auth
            .register(Registration { wechat: String::new(), ..alice() })
            .await
            .unwrap();
        assert!(user.wechat.is_empty());
    }

    #[tokio::test]
    async fn reset_password_with_matching_wechat() {
        let (_, auth) = provider();

        auth.reset_password("admin", "weixin-admin", "fresh").await.unwrap();

        assert!(auth.login("admin", "admin123").await.is_err());
        assert!(auth.login("admin", "fresh").await.is_ok());
    }

    #[tokio::test]
    async fn reset_password_with_wrong_wechat_keeps_password() {
        let (store, auth) = provider();

        let err = auth.reset_password("admin", "someone-else", "fresh").await.unwrap_err();

        assert!(matches!(err, AppError::AuthError(_)));
        let doc = store.load().await.unwrap();
        assert_eq!(doc.user(ADMIN_ID).unwrap().password, "admin123");
    }

    #[tokio::test]
    async fn reset_password_requires_every_field() {
        let (_, auth) = provider();
        let err = auth.reset_password("admin", "", "fresh").await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn storage_failure_surfaces_as_internal() {
        let mut store = MockDocumentStore::new();
        store
            .expect_load()
            .returning(|| Err(anyhow::anyhow!("disk unplugged")));
        let auth = SimpleAuthProvider::new(Arc::new(store));

        let err = auth.current_user().await.unwrap_err();

        assert!(matches!(err, AppError::Internal(ref m) if m.contains("disk unplugged")));
    }
}
