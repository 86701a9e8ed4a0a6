use crate::model::{
    id::UserId,
    permission::Caller,
    role::Role,
    user::UserProfile,
};
use derive_new::new;

#[derive(new)]
pub struct CreateUser {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub profile: UserProfile,
}

#[derive(new)]
pub struct UpdateUserProfile {
    pub user_id: UserId,
    pub email: String,
    pub profile: UserProfile,
}

#[derive(new)]
pub struct UpdateUserPassword {
    pub user_id: UserId,
    pub current_password: String,
    pub new_password: String,
}

#[derive(new)]
pub struct UpdateUserRole {
    pub user_id: UserId,
    pub role: Role,
    pub requested_by: Caller,
}
