use std::sync::Arc;

use tracing::instrument;

use crate::data::user_repository::UserRepository;
use crate::domain::{error::DomainError, user::User};
use crate::infrastructure::security::{SessionKeys, hash_password, verify_password};

/// Registers users, verifies credentials, and issues the session tokens
/// request handlers use to recognize the current user.
#[derive(Clone)]
pub struct AuthService<R: UserRepository + 'static> {
    repo: Arc<R>,
    keys: SessionKeys,
}

impl<R> AuthService<R>
where
    R: UserRepository + 'static,
{
    pub fn new(repo: Arc<R>, keys: SessionKeys) -> Self {
        Self { repo, keys }
    }

    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<(User, String), DomainError> {
        let hash = hash_password(password).map_err(|err| DomainError::Internal(err.to_string()))?;
        let user = self.repo.create(&email.to_lowercase(), &hash, name).await?;
        let token = self
            .keys
            .issue(user.id)
            .map_err(|err| DomainError::Internal(err.to_string()))?;
        Ok((user, token))
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), DomainError> {
        let user = self
            .repo
            .find_by_email(&email.to_lowercase())
            .await?
            .ok_or(DomainError::NoSuchEmail)?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|_| DomainError::WrongPassword)?;
        if !valid {
            return Err(DomainError::WrongPassword);
        }

        let token = self
            .keys
            .issue(user.id)
            .map_err(|err| DomainError::Internal(err.to_string()))?;
        Ok((user, token))
    }

    /// Resolves a session token to its user. Anything invalid, expired, or
    /// stale is simply an anonymous request.
    pub async fn current_user(&self, token: &str) -> Option<User> {
        let claims = self.keys.verify(token).ok()?;
        let id: i64 = claims.sub.parse().ok()?;
        self.repo.find_by_id(id).await.ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::user_repository::SqliteUserRepository;
    use crate::domain::user::Role;
    use crate::infrastructure::database::test_pool;

    async fn service() -> (AuthService<SqliteUserRepository>, sqlx::SqlitePool) {
        let pool = test_pool().await;
        let repo = Arc::new(SqliteUserRepository::new(pool.clone()));
        (
            AuthService::new(repo, SessionKeys::new("test-secret".into())),
            pool,
        )
    }

    async fn user_count(pool: &sqlx::SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn registration_stores_hashed_passwords() {
        let (service, _pool) = service().await;
        let (alice, _) = service.register("a@x.com", "pw1", "Alice").await.unwrap();
        let (bob, _) = service.register("b@x.com", "pw2", "Bob").await.unwrap();

        assert_ne!(alice.id, bob.id);
        assert_ne!(alice.password_hash, "pw1");
        assert_ne!(bob.password_hash, "pw2");
    }

    #[tokio::test]
    async fn first_account_is_admin_rest_are_members() {
        let (service, _pool) = service().await;
        let (alice, _) = service.register("a@x.com", "pw1", "Alice").await.unwrap();
        let (bob, _) = service.register("b@x.com", "pw2", "Bob").await.unwrap();

        assert_eq!(alice.role, Role::Admin);
        assert!(alice.is_admin());
        assert_eq!(bob.role, Role::Member);
        assert!(!bob.is_admin());
    }

    #[tokio::test]
    async fn duplicate_email_never_creates_a_second_row() {
        let (service, pool) = service().await;
        service.register("a@x.com", "pw1", "Alice").await.unwrap();

        let err = service.register("a@x.com", "pw2", "Imposter").await;
        assert!(matches!(err, Err(DomainError::DuplicateEmail(_))));
        assert_eq!(user_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn email_comparison_ignores_case() {
        let (service, pool) = service().await;
        service.register("A@X.com", "pw1", "Alice").await.unwrap();

        let err = service.register("a@x.com", "pw2", "Imposter").await;
        assert!(matches!(err, Err(DomainError::DuplicateEmail(_))));
        assert_eq!(user_count(&pool).await, 1);

        assert!(service.login("A@X.COM", "pw1").await.is_ok());
    }

    #[tokio::test]
    async fn login_distinguishes_missing_email_from_bad_password() {
        let (service, _pool) = service().await;
        service.register("a@x.com", "pw1", "Alice").await.unwrap();

        let (user, token) = service.login("a@x.com", "pw1").await.unwrap();
        assert_eq!(user.email, "a@x.com");
        let resolved = service.current_user(&token).await.unwrap();
        assert_eq!(resolved.id, user.id);

        assert!(matches!(
            service.login("a@x.com", "wrong").await,
            Err(DomainError::WrongPassword)
        ));
        assert!(matches!(
            service.login("nobody@x.com", "pw1").await,
            Err(DomainError::NoSuchEmail)
        ));
    }

    #[tokio::test]
    async fn every_login_mints_a_distinct_session() {
        let (service, _pool) = service().await;
        service.register("a@x.com", "pw1", "Alice").await.unwrap();

        let (_, first) = service.login("a@x.com", "pw1").await.unwrap();
        let (_, second) = service.login("a@x.com", "pw1").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn garbage_tokens_resolve_to_anonymous() {
        let (service, _pool) = service().await;
        service.register("a@x.com", "pw1", "Alice").await.unwrap();

        assert!(service.current_user("garbage").await.is_none());

        let foreign = SessionKeys::new("other-secret".into()).issue(1).unwrap();
        assert!(service.current_user(&foreign).await.is_none());
    }
}
