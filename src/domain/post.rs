use serde::Serialize;

use crate::domain::comment::CommentWithAuthor;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub img_url: String,
    /// Publication date, formatted once at creation time ("April 02, 2024").
    pub published_on: String,
}

/// A post joined with its author's public fields.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PostWithAuthor {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub img_url: String,
    pub published_on: String,
    pub author_name: String,
    pub author_email: String,
}

/// Everything needed to show a single post page: the post, its author,
/// and each comment with its author resolved.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: PostWithAuthor,
    pub comments: Vec<CommentWithAuthor>,
}
