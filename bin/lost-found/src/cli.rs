use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lost-found")]
#[command(author, version, about = "Campus lost-and-found board", long_about = None)]
pub struct Cli {
    /// Directory holding the board document (overrides LF_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "lf_board_local=debug"
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Enable JSON formatted logging
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the logged-in user
    Whoami,
    /// Log in with username and password
    Login { username: String, password: String },
    /// Log out
    Logout,
    /// Create an account and log in
    Register {
        username: String,
        password: String,
        /// Contact handle shown on your posts
        #[arg(long, default_value = "")]
        wechat: String,
    },
    /// Set a new password, proving identity with username and wechat
    ResetPassword {
        username: String,
        wechat: String,
        new_password: String,
    },
    /// List posts, newest first
    List {
        /// all, found or lost
        #[arg(long = "type", default_value = "all")]
        kind: String,
        /// Matched against title, content and place
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Show your profile and your posts
    Mine,
    /// Show a post with its author and comments
    Show { post_id: String },
    /// Publish a found or lost notice
    Post {
        /// found or lost
        #[arg(long = "type")]
        kind: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        place: Option<String>,
        /// Picture as a data URL
        #[arg(long)]
        image: Option<String>,
    },
    /// Comment on a post
    Comment { post_id: String, text: String },
    /// Send a private message
    Send { peer_id: String, text: String },
    /// Show your conversation with another user
    Thread { peer_id: String },
    /// Show a user's public profile
    User { user_id: String },
}
