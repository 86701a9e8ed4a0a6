use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use derive_new::new;
use kernel::model::{
    auth::{event::CreateToken, AccessToken, AuthClaims, IssuedToken},
    user::User,
};
use kernel::repository::auth::AuthRepository;
use shared::error::{AppError, AppResult};

use crate::{
    database::{
        model::{
            auth::{RevokedTokenKey, RevokedTokenOwner},
            user::{UserCredentialRow, UserRow},
        },
        ConnectionPool,
    },
    password::{verify_missing_user, verify_password},
    redis::RedisClient,
    token::TokenIssuer,
};

#[derive(new)]
pub struct AuthRepositoryImpl {
    db: ConnectionPool,
    kv: Arc<RedisClient>,
    tokens: TokenIssuer,
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn verify_user(&self, user_name: &str, password: &str) -> AppResult<User> {
        let credential = sqlx::query_as::<_, UserCredentialRow>(
            "SELECT user_id, password_hash FROM users WHERE user_name = $1",
        )
        .bind(user_name)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        // Unknown names and wrong passwords are reported the same way.
        let Some(credential) = credential else {
            verify_missing_user(password).await?;
            return Err(AppError::InvalidCredentials);
        };
        if !verify_password(password, &credential.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        let row = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT user_id, user_name, email, role,
                first_name, last_name, phone_number, address, created_at
                FROM users WHERE user_id = $1
            "#,
        )
        .bind(credential.user_id)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        User::try_from(row)
    }

    async fn create_token(&self, event: CreateToken) -> AppResult<IssuedToken> {
        self.tokens.issue(event.user_id, event.role, Utc::now())
    }

    async fn fetch_claims_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<AuthClaims>> {
        let claims = match self.tokens.verify(access_token, Utc::now()) {
            Ok(claims) => claims,
            Err(reason) => {
                tracing::debug!(%reason, "rejected access token");
                return Ok(None);
            }
        };

        let key = RevokedTokenKey::from(claims.token_id);
        if self.kv.get(&key).await?.is_some() {
            return Ok(None);
        }
        Ok(Some(claims))
    }

    async fn delete_token(&self, claims: &AuthClaims) -> AppResult<()> {
        let remaining = (claims.expires_at - Utc::now()).num_seconds().max(1) as u64;
        let key = RevokedTokenKey::from(claims.token_id);
        self.kv
            .set_ex(&key, &RevokedTokenOwner(claims.user_id), remaining)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::user::UserRepositoryImpl;
    use kernel::model::user::{event::CreateUser, UserProfile};
    use kernel::repository::user::UserRepository;
    use shared::config::{AuthConfig, RedisConfig};

    fn repository(pool: sqlx::PgPool) -> AuthRepositoryImpl {
        // The Redis client connects lazily; these tests never reach it.
        let kv = RedisClient::new(&RedisConfig {
            host: "localhost".into(),
            port: 6379,
        })
        .unwrap();
        let tokens = TokenIssuer::new(&AuthConfig {
            ttl: 7200,
            secret: "test-secret".into(),
        });
        AuthRepositoryImpl::new(ConnectionPool::new(pool), Arc::new(kv), tokens)
    }

    #[sqlx::test]
    async fn login_failures_do_not_reveal_which_part_was_wrong(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        UserRepositoryImpl::new(ConnectionPool::new(pool.clone()))
            .create(CreateUser::new(
                "erin".into(),
                "erin@x.com".into(),
                "correct-horse".into(),
                UserProfile::default(),
            ))
            .await?;
        let repo = repository(pool);

        let user = repo.verify_user("erin", "correct-horse").await?;
        assert_eq!(user.user_name, "erin");

        let wrong_password = repo.verify_user("erin", "battery").await;
        let unknown_user = repo.verify_user("nobody", "correct-horse").await;
        assert!(matches!(wrong_password, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown_user, Err(AppError::InvalidCredentials)));
        // The unknown name still paid for a bcrypt verification.
        assert!(crate::password::MISSING_USER_HASH.get().is_some());
        Ok(())
    }

    #[sqlx::test]
    async fn issued_token_carries_user_and_role(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = repository(pool);
        let user_id = kernel::model::id::UserId::new();

        let issued = repo
            .create_token(CreateToken::new(user_id, kernel::model::role::Role::User))
            .await?;

        assert_eq!(issued.user_id, user_id);
        assert!(issued.expires_at > Utc::now());
        Ok(())
    }

    #[sqlx::test]
    async fn garbage_token_yields_no_claims(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = repository(pool);
        let claims = repo
            .fetch_claims_from_token(&AccessToken("not.a.jwt".into()))
            .await?;
        assert!(claims.is_none());
        Ok(())
    }
}
