use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    auth::IssuedToken,
    id::UserId,
    user::{event::CreateUser, UserProfile},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[garde(length(min = 3, max = 50))]
    pub user_name: String,
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 6, max = 128))]
    pub password: String,
    #[garde(length(max = 100))]
    pub first_name: Option<String>,
    #[garde(length(max = 100))]
    pub last_name: Option<String>,
    #[garde(length(max = 32))]
    pub phone_number: Option<String>,
    #[garde(length(max = 255))]
    pub address: Option<String>,
}

impl From<RegisterRequest> for CreateUser {
    fn from(value: RegisterRequest) -> Self {
        let RegisterRequest {
            user_name,
            email,
            password,
            first_name,
            last_name,
            phone_number,
            address,
        } = value;
        CreateUser::new(
            user_name,
            email,
            password,
            UserProfile {
                first_name,
                last_name,
                phone_number,
                address,
            },
        )
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[garde(length(min = 1))]
    pub user_name: String,
    #[garde(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub user_id: UserId,
    pub is_admin: bool,
}

impl From<IssuedToken> for AccessTokenResponse {
    fn from(value: IssuedToken) -> Self {
        let IssuedToken {
            access_token,
            user_id,
            role,
            expires_at,
        } = value;
        Self {
            access_token: access_token.0,
            token_type: "Bearer",
            expires_at,
            user_id,
            is_admin: role.is_admin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn register(user_name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            user_name: user_name.into(),
            email: email.into(),
            password: password.into(),
            first_name: None,
            last_name: None,
            phone_number: None,
            address: None,
        }
    }

    #[rstest]
    #[case("alice", "alice@x.com", "secret1", true)]
    #[case("al", "alice@x.com", "secret1", false)]
    #[case("alice", "not-an-email", "secret1", false)]
    #[case("alice", "alice@x.com", "short", false)]
    fn validates_registration(
        #[case] user_name: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] valid: bool,
    ) {
        assert_eq!(register(user_name, email, password).validate().is_ok(), valid);
    }

    #[test]
    fn login_body_uses_camel_case() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"userName":"alice","password":"secret1"}"#).unwrap();
        assert_eq!(req.user_name, "alice");
    }
}
