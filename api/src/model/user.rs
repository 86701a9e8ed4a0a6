use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::UserId,
    permission::Caller,
    role::Role,
    user::{
        event::{UpdateUserPassword, UpdateUserProfile, UpdateUserRole},
        RegistrationUser, User, UserProfile,
    },
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleName {
    Admin,
    User,
}

impl From<Role> for RoleName {
    fn from(value: Role) -> Self {
        match value {
            Role::Admin => Self::Admin,
            Role::User => Self::User,
        }
    }
}

impl From<RoleName> for Role {
    fn from(value: RoleName) -> Self {
        match value {
            RoleName::Admin => Self::Admin,
            RoleName::User => Self::User,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersResponse {
    pub items: Vec<UserResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub role: RoleName,
    pub is_admin: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let User {
            user_id,
            user_name,
            email,
            role,
            profile:
                UserProfile {
                    first_name,
                    last_name,
                    phone_number,
                    address,
                },
            created_at,
        } = value;
        Self {
            user_id,
            user_name,
            email,
            role: RoleName::from(role),
            is_admin: role.is_admin(),
            first_name,
            last_name,
            phone_number,
            address,
            created_at,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserProfileRequest {
    #[garde(email)]
    email: String,
    #[garde(length(max = 100))]
    first_name: Option<String>,
    #[garde(length(max = 100))]
    last_name: Option<String>,
    #[garde(length(max = 32))]
    phone_number: Option<String>,
    #[garde(length(max = 255))]
    address: Option<String>,
}

#[derive(new)]
pub struct UpdateUserProfileRequestWithUserId(UserId, UpdateUserProfileRequest);
impl From<UpdateUserProfileRequestWithUserId> for UpdateUserProfile {
    fn from(value: UpdateUserProfileRequestWithUserId) -> Self {
        let UpdateUserProfileRequestWithUserId(
            user_id,
            UpdateUserProfileRequest {
                email,
                first_name,
                last_name,
                phone_number,
                address,
            },
        ) = value;
        UpdateUserProfile {
            user_id,
            email,
            profile: UserProfile {
                first_name,
                last_name,
                phone_number,
                address,
            },
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPasswordRequest {
    #[garde(length(min = 1))]
    current_password: String,
    #[garde(length(min = 6, max = 128))]
    new_password: String,
}

#[derive(new)]
pub struct UpdateUserPasswordRequestWithUserId(UserId, UpdateUserPasswordRequest);
impl From<UpdateUserPasswordRequestWithUserId> for UpdateUserPassword {
    fn from(value: UpdateUserPasswordRequestWithUserId) -> Self {
        let UpdateUserPasswordRequestWithUserId(
            user_id,
            UpdateUserPasswordRequest {
                current_password,
                new_password,
            },
        ) = value;
        UpdateUserPassword {
            user_id,
            current_password,
            new_password,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRoleRequest {
    role: RoleName,
}

#[derive(new)]
pub struct UpdateUserRoleRequestWithIds(UserId, Caller, UpdateUserRoleRequest);
impl From<UpdateUserRoleRequestWithIds> for UpdateUserRole {
    fn from(value: UpdateUserRoleRequestWithIds) -> Self {
        let UpdateUserRoleRequestWithIds(user_id, requested_by, UpdateUserRoleRequest { role }) =
            value;
        UpdateUserRole {
            user_id,
            role: Role::from(role),
            requested_by,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationUserResponse {
    pub user_id: UserId,
    pub user_name: String,
}

impl From<RegistrationUser> for RegistrationUserResponse {
    fn from(value: RegistrationUser) -> Self {
        let RegistrationUser { user_id, user_name } = value;
        Self { user_id, user_name }
    }
}
