use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::error::ErrorKind;
use tracing::{error, info};

use crate::domain::comment::{Comment, CommentWithAuthor};
use crate::domain::error::DomainError;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(
        &self,
        author_id: i64,
        post_id: i64,
        body: &str,
    ) -> Result<Comment, DomainError>;
    /// Comments on a post, oldest first, each with its author resolved.
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>, DomainError>;
}

#[derive(Clone)]
pub struct SqliteCommentRepository {
    pool: SqlitePool,
}

impl SqliteCommentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for SqliteCommentRepository {
    async fn create(
        &self,
        author_id: i64,
        post_id: i64,
        body: &str,
    ) -> Result<Comment, DomainError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (author_id, post_id, body)
            VALUES ($1, $2, $3)
            RETURNING id, author_id, post_id, body
            "#,
        )
        .bind(author_id)
        .bind(post_id)
        .bind(body)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if matches!(
                e.as_database_error().map(|db| db.kind()),
                Some(ErrorKind::ForeignKeyViolation)
            ) {
                DomainError::NotFound(post_id)
            } else {
                error!("failed to create comment: {}", e);
                DomainError::Internal(format!("database error: {}", e))
            }
        })?;

        info!(comment_id = %comment.id, post_id = %post_id, "comment created");
        Ok(comment)
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>, DomainError> {
        sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT c.id, c.post_id, c.body, c.author_id,
                   u.name AS author_name, u.email AS author_email
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching comments for post {}: {}", post_id, e);
            DomainError::Internal(e.to_string())
        })
    }
}
