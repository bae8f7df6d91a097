use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;

use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostDetail};
use crate::domain::user::User;

const PUBLISH_DATE_FORMAT: &str = "%B %d, %Y";

/// Post and comment CRUD. Callers pass an identity the guards already
/// validated; no re-checking happens here.
#[derive(Clone)]
pub struct ContentService<P: PostRepository + 'static, C: CommentRepository + 'static> {
    posts: Arc<P>,
    comments: Arc<C>,
}

impl<P, C> ContentService<P, C>
where
    P: PostRepository + 'static,
    C: CommentRepository + 'static,
{
    pub fn new(posts: Arc<P>, comments: Arc<C>) -> Self {
        Self { posts, comments }
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        self.posts.list().await
    }

    pub async fn get_post(&self, id: i64) -> Result<PostDetail, DomainError> {
        let post = self
            .posts
            .find_with_author(id)
            .await?
            .ok_or(DomainError::NotFound(id))?;
        let comments = self.comments.list_for_post(id).await?;
        Ok(PostDetail { post, comments })
    }

    #[instrument(skip(self, admin, body))]
    pub async fn create_post(
        &self,
        admin: &User,
        title: &str,
        subtitle: &str,
        body: &str,
        img_url: &str,
    ) -> Result<Post, DomainError> {
        let published_on = Utc::now().format(PUBLISH_DATE_FORMAT).to_string();
        self.posts
            .create(admin.id, title, subtitle, body, img_url, &published_on)
            .await
    }

    #[instrument(skip(self, body))]
    pub async fn update_post(
        &self,
        id: i64,
        title: &str,
        subtitle: &str,
        body: &str,
        img_url: &str,
    ) -> Result<Post, DomainError> {
        match self.posts.update(id, title, subtitle, body, img_url).await {
            Ok(Some(post)) => Ok(post),
            Ok(None) => Err(DomainError::NotFound(id)),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: i64) -> Result<(), DomainError> {
        if self.posts.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::NotFound(id))
        }
    }

    #[instrument(skip(self, user, text))]
    pub async fn add_comment(
        &self,
        user: &User,
        post_id: i64,
        text: &str,
    ) -> Result<Comment, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::NotFound(post_id))?;
        self.comments.create(user.id, post_id, text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::comment_repository::SqliteCommentRepository;
    use crate::data::post_repository::SqlitePostRepository;
    use crate::data::user_repository::{SqliteUserRepository, UserRepository};
    use crate::infrastructure::database::test_pool;

    struct Fixture {
        service: ContentService<SqlitePostRepository, SqliteCommentRepository>,
        pool: sqlx::SqlitePool,
        admin: User,
        member: User,
    }

    async fn fixture() -> Fixture {
        let pool = test_pool().await;
        let users = SqliteUserRepository::new(pool.clone());
        let admin = users.create("a@x.com", "hash-a", "Alice").await.unwrap();
        let member = users.create("b@x.com", "hash-b", "Bob").await.unwrap();

        let service = ContentService::new(
            Arc::new(SqlitePostRepository::new(pool.clone())),
            Arc::new(SqliteCommentRepository::new(pool.clone())),
        );
        Fixture {
            service,
            pool,
            admin,
            member,
        }
    }

    async fn post_count(pool: &sqlx::SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn created_posts_list_in_insertion_order() {
        let f = fixture().await;
        let first = f
            .service
            .create_post(&f.admin, "Hello", "Sub", "Body", "http://img")
            .await
            .unwrap();
        let second = f
            .service
            .create_post(&f.admin, "Second", "Sub", "Body", "http://img")
            .await
            .unwrap();

        assert_eq!(first.author_id, f.admin.id);
        assert!(!first.published_on.is_empty());

        let posts = f.service.list_posts().await.unwrap();
        assert_eq!(
            posts.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
    }

    #[tokio::test]
    async fn duplicate_title_leaves_the_store_unchanged() {
        let f = fixture().await;
        f.service
            .create_post(&f.admin, "Hello", "Sub", "Body", "http://img")
            .await
            .unwrap();

        let err = f
            .service
            .create_post(&f.admin, "Hello", "Other", "Other", "http://other")
            .await;
        assert!(matches!(err, Err(DomainError::DuplicateTitle(_))));
        assert_eq!(post_count(&f.pool).await, 1);
    }

    #[tokio::test]
    async fn editing_preserves_author_and_publication_date() {
        let f = fixture().await;
        let post = f
            .service
            .create_post(&f.admin, "Hello", "Sub", "Body", "http://img")
            .await
            .unwrap();

        let edited = f
            .service
            .update_post(post.id, "Hi", "New sub", "New body", "http://new")
            .await
            .unwrap();

        assert_eq!(edited.title, "Hi");
        assert_eq!(edited.subtitle, "New sub");
        assert_eq!(edited.body, "New body");
        assert_eq!(edited.img_url, "http://new");
        assert_eq!(edited.author_id, post.author_id);
        assert_eq!(edited.published_on, post.published_on);
    }

    #[tokio::test]
    async fn editing_cannot_steal_an_existing_title() {
        let f = fixture().await;
        f.service
            .create_post(&f.admin, "Hello", "Sub", "Body", "http://img")
            .await
            .unwrap();
        let other = f
            .service
            .create_post(&f.admin, "Second", "Sub", "Body", "http://img")
            .await
            .unwrap();

        let err = f
            .service
            .update_post(other.id, "Hello", "Sub", "Body", "http://img")
            .await;
        assert!(matches!(err, Err(DomainError::DuplicateTitle(_))));

        let missing = f
            .service
            .update_post(999, "Whatever", "Sub", "Body", "http://img")
            .await;
        assert!(matches!(missing, Err(DomainError::NotFound(999))));
    }

    #[tokio::test]
    async fn deleting_a_post_takes_its_comments_with_it() {
        let f = fixture().await;
        let post = f
            .service
            .create_post(&f.admin, "Hello", "Sub", "Body", "http://img")
            .await
            .unwrap();
        f.service
            .add_comment(&f.member, post.id, "Nice post!")
            .await
            .unwrap();

        f.service.delete_post(post.id).await.unwrap();

        assert!(matches!(
            f.service.get_post(post.id).await,
            Err(DomainError::NotFound(_))
        ));
        let comments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
            .fetch_one(&f.pool)
            .await
            .unwrap();
        assert_eq!(comments, 0);

        assert!(matches!(
            f.service.delete_post(post.id).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn comments_appear_under_the_post_with_their_author() {
        let f = fixture().await;
        let post = f
            .service
            .create_post(&f.admin, "Hello", "Sub", "Body", "http://img")
            .await
            .unwrap();

        f.service
            .add_comment(&f.member, post.id, "Nice post!")
            .await
            .unwrap();

        let detail = f.service.get_post(post.id).await.unwrap();
        assert_eq!(detail.post.author_name, "Alice");
        assert_eq!(detail.comments.len(), 1);
        assert_eq!(detail.comments[0].body, "Nice post!");
        assert_eq!(detail.comments[0].author_name, "Bob");
        assert_eq!(detail.comments[0].author_id, f.member.id);
    }

    #[tokio::test]
    async fn commenting_on_a_missing_post_fails() {
        let f = fixture().await;
        let err = f.service.add_comment(&f.member, 42, "Hello?").await;
        assert!(matches!(err, Err(DomainError::NotFound(42))));
    }
}
