//! # Lost-Found Binary
//!
//! The entry point that assembles the board from its plugins and runs a
//! single command against the on-disk document.

mod cli;
mod render;

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Command};
use configs::{AppConfig, LogConfig};
use lf_auth_simple::SimpleAuthProvider;
use lf_board_local::DocumentBoardRepo;
use lf_core::error::AppError;
use lf_core::models::{NewPost, Registration};
use lf_core::query::PostQuery;
use lf_core::traits::{AuthProvider, BoardRepo, DocumentStore};
use lf_storage_local::JsonFileStore;
use tracing_subscriber::EnvFilter;

/// The services every command runs against.
pub struct AppState {
    pub auth: Arc<dyn AuthProvider>,
    pub board: Arc<dyn BoardRepo>,
}

impl AppState {
    pub fn assemble(store: Arc<dyn DocumentStore>) -> Self {
        let auth: Arc<dyn AuthProvider> = Arc::new(SimpleAuthProvider::new(store.clone()));
        let board = Arc::new(DocumentBoardRepo::new(store, auth.clone()));
        Self { auth, board }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level {
        config.log.filter = level;
    }
    config.log.json |= cli.json_logs;
    init_tracing(&config.log)?;
    if let Some(path) = &config.env_file {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let store = Arc::new(JsonFileStore::new(&config.data_dir, config.seed.to_seed()));
    tracing::debug!(path = %store.path().display(), "using board document");
    let state = AppState::assemble(store);

    let mut out = std::io::stdout().lock();
    if let Err(err) = run(&state, cli.command, &mut out).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
    Ok(())
}

/// Logs go to stderr; stdout carries command output only.
fn init_tracing(log: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&log.filter)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

/// Maps one command onto service calls and prints the result.
pub async fn run(state: &AppState, command: Command, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Command::Whoami => match state.auth.current_user().await? {
            Some(me) => writeln!(out, "{}", render::profile(&me))?,
            None => writeln!(out, "not logged in")?,
        },
        Command::Login { username, password } => {
            let me = state.auth.login(&username, &password).await?;
            writeln!(out, "logged in as {} ({})", me.username, me.id)?;
        }
        Command::Logout => {
            state.auth.logout().await?;
            writeln!(out, "logged out")?;
        }
        Command::Register { username, password, wechat } => {
            let me = state
                .auth
                .register(Registration { username, password, wechat })
                .await?;
            writeln!(out, "registered and logged in as {} ({})", me.username, me.id)?;
        }
        Command::ResetPassword { username, wechat, new_password } => {
            state.auth.reset_password(&username, &wechat, &new_password).await?;
            writeln!(out, "password reset, log in with the new password")?;
        }
        Command::List { kind, query } => {
            let query = PostQuery::new(kind.parse()?, query);
            let posts = state.board.list_posts(&query).await?;
            if posts.is_empty() {
                writeln!(out, "no posts, try another filter or search term")?;
            }
            for post in &posts {
                let author = state.board.get_user(&post.author_id).await?;
                writeln!(out, "{}", render::post_card(post, author.as_ref()))?;
            }
        }
        Command::Mine => {
            let me = state
                .auth
                .current_user()
                .await?
                .ok_or_else(|| AppError::AuthError("not logged in".into()))?;
            writeln!(out, "{}", render::profile(&me))?;
            let posts = state.board.list_posts_by_author(&me.id).await?;
            if posts.is_empty() {
                writeln!(out, "no posts yet")?;
            }
            for post in &posts {
                writeln!(out, "{}", render::post_card(post, Some(&me)))?;
            }
        }
        Command::Show { post_id } => {
            let post = state
                .board
                .get_post(&post_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Post".into(), post_id.clone()))?;
            let author = state.board.get_user(&post.author_id).await?;
            writeln!(out, "{}", render::post_detail(&post, author.as_ref()))?;

            let comments = state.board.list_comments(&post.id).await?;
            writeln!(out, "-- comments ({}) --", comments.len())?;
            for comment in &comments {
                let who = state.board.get_user(&comment.user_id).await?;
                writeln!(out, "{}", render::comment_line(comment, who.as_ref()))?;
            }
        }
        Command::Post { kind, title, content, place, image } => {
            let post = state
                .board
                .create_post(NewPost { kind, title, content, place, image })
                .await?;
            writeln!(out, "published {}", post.id)?;
        }
        Command::Comment { post_id, text } => {
            state.board.add_comment(&post_id, &text).await?;
            writeln!(out, "comment added")?;
        }
        Command::Send { peer_id, text } => {
            state.board.send_message(&peer_id, &text).await?;
            writeln!(out, "message sent")?;
        }
        Command::Thread { peer_id } => {
            let me = state
                .auth
                .current_user()
                .await?
                .ok_or_else(|| AppError::AuthError("not logged in".into()))?;
            let peer = state.board.get_user(&peer_id).await?;
            writeln!(out, "{}", render::thread_header(&peer_id, peer.as_ref()))?;
            for message in state.board.list_messages(&peer_id).await? {
                writeln!(out, "{}", render::message_line(&message, &me.id))?;
            }
        }
        Command::User { user_id } => {
            let user = state
                .board
                .get_user(&user_id)
                .await?
                .ok_or_else(|| AppError::NotFound("User".into(), user_id.clone()))?;
            writeln!(out, "{}", render::public_profile(&user))?;
        }
    }
    Ok(())
}
