//! Plain-text views of board entities.

use chrono::{DateTime, Local, Utc};
use lf_core::models::{Comment, Message, Post, User};

fn when(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "not given"
    } else {
        value
    }
}

fn name(user: Option<&User>) -> &str {
    user.map(|u| u.username.as_str()).unwrap_or("unknown")
}

pub fn post_card(post: &Post, author: Option<&User>) -> String {
    let mut card = format!(
        "[{}] {}  ({})\n  {} · {} · place: {}",
        post.kind.label(),
        post.title,
        post.id,
        when(&post.created_at),
        name(author),
        or_unset(&post.place),
    );
    if !post.image.is_empty() {
        card.push_str("\n  has picture");
    }
    card
}

pub fn post_detail(post: &Post, author: Option<&User>) -> String {
    let wechat = author.map(|u| u.wechat.as_str()).unwrap_or_default();
    let mut detail = format!(
        "[{}] {}\nposted {} by {}\n\n{}\n\nplace: {}\nauthor wechat: {}",
        post.kind.label(),
        post.title,
        when(&post.created_at),
        name(author),
        post.content,
        or_unset(&post.place),
        or_unset(wechat),
    );
    if !post.image.is_empty() {
        detail.push_str(&format!("\npicture: {} bytes", post.image.len()));
    }
    detail
}

pub fn comment_line(comment: &Comment, who: Option<&User>) -> String {
    let who = who.map(|u| u.username.as_str()).unwrap_or("someone");
    format!("{}  {}: {}", when(&comment.created_at), who, comment.content)
}

pub fn thread_header(peer_id: &str, peer: Option<&User>) -> String {
    match peer {
        Some(p) => format!("conversation with {} · wechat: {}", p.username, or_unset(&p.wechat)),
        None => format!("conversation with {peer_id}"),
    }
}

pub fn message_line(message: &Message, me: &str) -> String {
    let who = if message.from_id == me { "me" } else { "them" };
    format!("{}  {who}: {}", when(&message.created_at), message.content)
}

pub fn profile(user: &User) -> String {
    format!(
        "{} ({})\nwechat: {}\njoined: {}",
        user.username,
        user.id,
        or_unset(&user.wechat),
        when(&user.created_at),
    )
}

/// Profile without anything private to the account holder.
pub fn public_profile(user: &User) -> String {
    format!("{} ({})\nwechat: {}", user.username, user.id, or_unset(&user.wechat))
}
