use crate::model::{id::UserId, role::Role};
use chrono::{DateTime, Utc};
pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub role: Role,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationUser {
    pub user_id: UserId,
    pub user_name: String,
}
