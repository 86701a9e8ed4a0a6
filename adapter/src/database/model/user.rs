use kernel::model::{
    id::UserId,
    role::Role,
    user::{User, UserProfile},
};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};
use std::str::FromStr;

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub role: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(value: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
            user_id,
            user_name,
            email,
            role,
            first_name,
            last_name,
            phone_number,
            address,
            created_at,
        } = value;
        Ok(User {
            user_id,
            user_name,
            email,
            role: Role::from_str(&role)
                .map_err(|e| AppError::ConversionEntityError(format!("role {role}: {e}")))?,
            profile: UserProfile {
                first_name,
                last_name,
                phone_number,
                address,
            },
            created_at,
        })
    }
}

// Used only for credential checks; never leaves the adapter.
#[derive(sqlx::FromRow)]
pub struct UserCredentialRow {
    pub user_id: UserId,
    pub password_hash: String,
}
