//! Текстовая отрисовка оболочки и экранов.

use std::fmt::Write;

use blog_client::router::{BRAND, LOGOUT_LABEL};
use blog_client::views::create_post::SIGN_IN_REQUIRED;
use blog_client::views::post_detail::LOADING;
use blog_client::views::post_list::EMPTY_LIST;
use blog_client::views::{AuthView, CreatePostView, PostDetailView, PostListView};
use blog_client::{NavItem, Session, display_date, nav_items};

pub fn nav_bar(session: &Session) -> String {
    let mut parts = vec![format!("{BRAND} (/)")];
    for item in nav_items(session) {
        parts.push(match item {
            NavItem::Link { label, route } => format!("{label} ({route})"),
            NavItem::Welcome(text) => text,
            NavItem::Logout => format!("{LOGOUT_LABEL} (blog-cli logout)"),
        });
    }
    parts.join(" | ")
}

pub fn post_list(view: &PostListView) -> String {
    if view.is_loading() {
        return LOADING.to_string();
    }
    if view.is_empty() {
        return EMPTY_LIST.to_string();
    }

    let mut out = String::new();
    for post in view.posts() {
        let _ = writeln!(out, "[{}] {} (/post/{})", post.id, post.title, post.id);
        let _ = writeln!(
            out,
            "    автор: {} | {} | комментариев: {}",
            post.author.username,
            display_date(&post.created_at),
            post.comment_count
        );
        if let Some(cover) = &post.cover {
            let _ = writeln!(out, "    обложка: {cover}");
        }
    }
    out.trim_end().to_string()
}

pub fn post_detail(view: &PostDetailView, session: &Session) -> String {
    let Some(post) = view.post() else {
        return LOADING.to_string();
    };

    let mut out = String::new();
    if let Some(cover) = &post.cover {
        let _ = writeln!(out, "обложка: {cover}");
    }
    let _ = writeln!(out, "{}", post.title);
    let _ = writeln!(
        out,
        "автор: {} | {}",
        post.author.username,
        display_date(&post.created_at)
    );
    if let Some(like) = view.like() {
        let _ = writeln!(
            out,
            "лайков: {}{}",
            like.like_count,
            if like.liked { " (вам нравится)" } else { "" }
        );
    }
    out.push('\n');
    for line in post.content.lines() {
        let _ = writeln!(out, "{line}");
    }
    out.push('\n');

    let _ = writeln!(out, "Комментарии ({})", post.comments.len());
    if view.can_comment(session) {
        let _ = writeln!(
            out,
            "  написать: blog-cli comment --id {} --content \"...\"",
            post.id
        );
    }
    for comment in &post.comments {
        let _ = writeln!(
            out,
            "- {} ({}): {}",
            comment.author.username,
            display_date(&comment.created_at),
            comment.content
        );
    }
    if let Some(error) = view.comment_error().or(view.action_error()) {
        let _ = writeln!(out, "Ошибка: {error}");
    }
    out.trim_end().to_string()
}

pub fn create_post(view: &CreatePostView, session: &Session) -> String {
    if view.is_blocked(session) {
        return SIGN_IN_REQUIRED.to_string();
    }

    let mut out = String::from("Новый пост\n");
    out.push_str(
        "  blog-cli create --title \"...\" --content \"...\" [--cover-file путь | --cover url]",
    );
    if let Some(cover) = &view.form.cover {
        let _ = write!(out, "\n  обложка: {cover}");
    }
    if let Some(error) = view.error() {
        let _ = write!(out, "\nОшибка: {error}");
    }
    out
}

pub fn auth(view: &AuthView) -> String {
    let mode = view.mode();
    let (question, action) = mode.toggle_hint();
    let mut out = format!("{}\n", mode.title());
    if let Some(error) = view.error() {
        let _ = writeln!(out, "Ошибка: {error}");
    }
    let _ = writeln!(out, "  blog-cli login --username ... --password ...");
    let _ = write!(
        out,
        "  {question} {action}: blog-cli register --username ... --email ... --password ..."
    );
    out
}
