//! Default content written the first time a store is opened.

use chrono::{DateTime, Utc};

use crate::models::{new_id, Document, Post, PostType, Session, User, ADMIN_ID};

/// Name of the persisted document. Doubles as the schema version marker.
pub const STORAGE_KEY: &str = "lf_app_db_v1";

/// What goes into a fresh document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    pub admin_username: String,
    pub admin_password: String,
    pub admin_wechat: String,
    /// Include the two example notices
    pub sample_posts: bool,
}

impl Default for Seed {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            admin_wechat: "weixin-admin".to_string(),
            sample_posts: true,
        }
    }
}

impl Seed {
    /// Builds the initial document: one administrator, optionally two
    /// sample posts, no comments, no messages, nobody logged in.
    pub fn build(&self, now: DateTime<Utc>) -> Document {
        let admin = User {
            id: ADMIN_ID.to_string(),
            username: self.admin_username.clone(),
            password: self.admin_password.clone(),
            wechat: self.admin_wechat.clone(),
            avatar: String::new(),
            created_at: now,
        };

        let posts = if self.sample_posts {
            vec![
                Post {
                    id: new_id("p_"),
                    kind: PostType::Found,
                    title: "Campus card found on the library's second floor".to_string(),
                    content: "Picked up a campus card in the seating area on the library's second floor \
                              this afternoon. The name on the back reads \"Li\".\n\
                              Leave a comment or message me."
                        .to_string(),
                    place: "Library, 2nd floor".to_string(),
                    image: String::new(),
                    author_id: ADMIN_ID.to_string(),
                    created_at: now,
                },
                Post {
                    id: new_id("p_"),
                    kind: PostType::Lost,
                    title: "Help: lost a black umbrella".to_string(),
                    content: "Lost a black folding umbrella on the way from the east gate to the \
                              dorms after evening study. Please get in touch if you found it, thanks!"
                        .to_string(),
                    place: "East gate to dormitories".to_string(),
                    image: String::new(),
                    author_id: ADMIN_ID.to_string(),
                    created_at: now,
                },
            ]
        } else {
            Vec::new()
        };

        Document {
            users: vec![admin],
            session: Session::default(),
            posts,
            ..Document::default()
        }
    }
}
