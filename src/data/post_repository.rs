use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::error::ErrorKind;
use tracing::{error, info};

use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostWithAuthor};

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(
        &self,
        author_id: i64,
        title: &str,
        subtitle: &str,
        body: &str,
        img_url: &str,
        published_on: &str,
    ) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn find_with_author(&self, id: i64) -> Result<Option<PostWithAuthor>, DomainError>;
    /// All posts, oldest first.
    async fn list(&self) -> Result<Vec<Post>, DomainError>;
    /// Replaces the four editable fields; author and publication date are
    /// untouched. Returns `None` when the id does not resolve.
    async fn update(
        &self,
        id: i64,
        title: &str,
        subtitle: &str,
        body: &str,
        img_url: &str,
    ) -> Result<Option<Post>, DomainError>;
    /// Returns whether a row was deleted. Dependent comments go with it.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct SqlitePostRepository {
    pool: SqlitePool,
}

impl SqlitePostRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_title_conflict(e: sqlx::Error, title: &str) -> DomainError {
    if matches!(
        e.as_database_error().map(|db| db.kind()),
        Some(ErrorKind::UniqueViolation)
    ) {
        DomainError::DuplicateTitle(title.to_string())
    } else {
        error!("post write failed: {}", e);
        DomainError::Internal(format!("database error: {}", e))
    }
}

#[async_trait]
impl PostRepository for SqlitePostRepository {
    async fn create(
        &self,
        author_id: i64,
        title: &str,
        subtitle: &str,
        body: &str,
        img_url: &str,
        published_on: &str,
    ) -> Result<Post, DomainError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (author_id, title, subtitle, body, img_url, published_on)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, author_id, title, subtitle, body, img_url, published_on
            "#,
        )
        .bind(author_id)
        .bind(title)
        .bind(subtitle)
        .bind(body)
        .bind(img_url)
        .bind(published_on)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_title_conflict(e, title))?;

        info!(post_id = %post.id, author_id = %post.author_id, "post created");
        Ok(post)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author_id, title, subtitle, body, img_url, published_on
            FROM posts WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find_by_id {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn find_with_author(&self, id: i64) -> Result<Option<PostWithAuthor>, DomainError> {
        sqlx::query_as::<_, PostWithAuthor>(
            r#"
            SELECT p.id, p.author_id, p.title, p.subtitle, p.body, p.img_url,
                   p.published_on, u.name AS author_name, u.email AS author_email
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find_with_author {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn list(&self) -> Result<Vec<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author_id, title, subtitle, body, img_url, published_on
            FROM posts
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching posts: {}", e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn update(
        &self,
        id: i64,
        title: &str,
        subtitle: &str,
        body: &str,
        img_url: &str,
    ) -> Result<Option<Post>, DomainError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = $1, subtitle = $2, body = $3, img_url = $4
            WHERE id = $5
            RETURNING id, author_id, title, subtitle, body, img_url, published_on
            "#,
        )
        .bind(title)
        .bind(subtitle)
        .bind(body)
        .bind(img_url)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_title_conflict(e, title))?;

        if post.is_some() {
            info!(post_id = %id, "post updated");
        }

        Ok(post)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let removed = deleted.rows_affected() > 0;
        if removed {
            info!(post_id = %id, "post deleted");
        }
        Ok(removed)
    }
}
