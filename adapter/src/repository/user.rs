use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::UserId,
    permission::Permission,
    user::{
        event::{CreateUser, UpdateUserPassword, UpdateUserProfile, UpdateUserRole},
        User,
    },
};
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};

use crate::{
    database::{
        map_unique_violation,
        model::user::{UserCredentialRow, UserRow},
        ConnectionPool,
    },
    password::{hash_password, verify_password},
};

const USER_COLUMNS: &str = r#"
    user_id, user_name, email, role,
    first_name, last_name, phone_number, address, created_at
"#;

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_current_user(&self, current_user_id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(current_user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(User::try_from)
        .transpose()
    }

    async fn find_by_user_name(&self, user_name: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_name = $1"
        ))
        .bind(user_name)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(User::try_from)
        .transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(User::try_from)
        .collect()
    }

    async fn create(&self, event: CreateUser) -> AppResult<User> {
        let password_hash = hash_password(&event.password).await?;
        let mut tx = self.db.begin().await?;

        // Report which of the two unique fields is taken; the unique indexes
        // still catch a concurrent registration that slips past this check.
        {
            let taken: Option<(String, String)> = sqlx::query_as(
                r#"
                    SELECT user_name, email FROM users
                    WHERE user_name = $1 OR email = $2
                    LIMIT 1
                "#,
            )
            .bind(&event.user_name)
            .bind(&event.email)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if let Some((user_name, _)) = taken {
                return Err(if user_name == event.user_name {
                    AppError::Conflict(format!("user name {} is already taken", event.user_name))
                } else {
                    AppError::Conflict(format!("email {} is already registered", event.email))
                });
            }
        }

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
                INSERT INTO users
                (user_name, email, password_hash, first_name, last_name, phone_number, address)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&event.user_name)
        .bind(&event.email)
        .bind(password_hash)
        .bind(&event.profile.first_name)
        .bind(&event.profile.last_name)
        .bind(&event.profile.phone_number)
        .bind(&event.profile.address)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "user name or email is already taken"))?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        User::try_from(row)
    }

    async fn update_profile(&self, event: UpdateUserProfile) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                UPDATE users
                SET email = $1, first_name = $2, last_name = $3, phone_number = $4, address = $5
                WHERE user_id = $6
            "#,
        )
        .bind(&event.email)
        .bind(&event.profile.first_name)
        .bind(&event.profile.last_name)
        .bind(&event.profile.phone_number)
        .bind(&event.profile.address)
        .bind(event.user_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(|e| map_unique_violation(e, "email is already registered"))?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified user not found".into()));
        }
        Ok(())
    }

    async fn update_password(&self, event: UpdateUserPassword) -> AppResult<()> {
        let row = sqlx::query_as::<_, UserCredentialRow>(
            "SELECT user_id, password_hash FROM users WHERE user_id = $1",
        )
        .bind(event.user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound("specified user not found".into()))?;

        if !verify_password(&event.current_password, &row.password_hash).await? {
            return Err(AppError::InvalidCurrentPassword);
        }
        let new_hash = hash_password(&event.new_password).await?;

        // Hashing happens outside any transaction; the swap only lands if the
        // hash that was verified is still the stored one.
        let res = sqlx::query(
            "UPDATE users SET password_hash = $1 WHERE user_id = $2 AND password_hash = $3",
        )
        .bind(new_hash)
        .bind(row.user_id)
        .bind(&row.password_hash)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::InvalidCurrentPassword);
        }
        Ok(())
    }

    async fn update_role(&self, event: UpdateUserRole) -> AppResult<()> {
        event.requested_by.authorize(Permission::ManageUsers)?;

        let res = sqlx::query("UPDATE users SET role = $1 WHERE user_id = $2")
            .bind(event.role.as_ref())
            .bind(event.user_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified user not found".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::{permission::Caller, role::Role, user::UserProfile};
    use std::str::FromStr;

    fn admin() -> Caller {
        Caller::new(
            UserId::from_str("9582f9de-0fd1-4892-b20c-70139a7eb95b").unwrap(),
            Role::Admin,
        )
    }

    #[sqlx::test]
    async fn registers_a_user(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool));

        let profile = UserProfile {
            first_name: Some("Alice".into()),
            ..Default::default()
        };
        let user = repo
            .create(CreateUser::new(
                "alice".into(),
                "alice@x.com".into(),
                "secret1".into(),
                profile,
            ))
            .await?;

        assert_eq!(user.user_name, "alice");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.profile.first_name.as_deref(), Some("Alice"));

        let found = repo.find_current_user(user.user_id).await?;
        assert_eq!(found, Some(user));
        Ok(())
    }

    #[sqlx::test]
    async fn rejects_duplicate_user_name_and_email(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool));

        repo.create(CreateUser::new(
            "alice".into(),
            "alice@x.com".into(),
            "secret1".into(),
            UserProfile::default(),
        ))
        .await?;

        let same_name = repo
            .create(CreateUser::new(
                "alice".into(),
                "other@x.com".into(),
                "secret2".into(),
                UserProfile::default(),
            ))
            .await;
        assert!(matches!(same_name, Err(AppError::Conflict(_))));

        let same_email = repo
            .create(CreateUser::new(
                "carol".into(),
                "alice@x.com".into(),
                "secret3".into(),
                UserProfile::default(),
            ))
            .await;
        assert!(matches!(same_email, Err(AppError::Conflict(_))));

        assert_eq!(repo.find_all().await?.len(), 1);
        Ok(())
    }

    #[sqlx::test]
    async fn changes_password_only_with_the_current_one(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool));
        let user = repo
            .create(CreateUser::new(
                "dave".into(),
                "dave@x.com".into(),
                "old-pass".into(),
                UserProfile::default(),
            ))
            .await?;

        let wrong = repo
            .update_password(UpdateUserPassword::new(
                user.user_id,
                "not-it".into(),
                "new-pass".into(),
            ))
            .await;
        assert!(matches!(wrong, Err(AppError::InvalidCurrentPassword)));

        repo.update_password(UpdateUserPassword::new(
            user.user_id,
            "old-pass".into(),
            "new-pass".into(),
        ))
        .await?;
        Ok(())
    }

    #[sqlx::test(fixtures("common"))]
    async fn only_admins_change_roles(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool));
        let bob = repo.find_by_user_name("bob").await?.unwrap();
        let alice = repo.find_by_user_name("alice").await?.unwrap();

        let by_user = repo
            .update_role(UpdateUserRole::new(
                bob.user_id,
                Role::Admin,
                Caller::new(alice.user_id, Role::User),
            ))
            .await;
        assert!(matches!(by_user, Err(AppError::ForbiddenOperation)));

        repo.update_role(UpdateUserRole::new(bob.user_id, Role::Admin, admin()))
            .await?;
        let bob = repo.find_current_user(bob.user_id).await?.unwrap();
        assert_eq!(bob.role, Role::Admin);
        Ok(())
    }
}
