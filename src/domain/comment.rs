use serde::Serialize;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub author_id: i64,
    pub post_id: i64,
    pub body: String,
}

/// A comment joined with its author's public fields, as shown on a post
/// page. The email is only used to derive an avatar URL and is never
/// rendered directly.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CommentWithAuthor {
    pub id: i64,
    pub post_id: i64,
    pub body: String,
    pub author_id: i64,
    pub author_name: String,
    pub author_email: String,
}
