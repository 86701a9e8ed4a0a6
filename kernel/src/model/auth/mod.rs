use crate::model::{
    id::{TokenId, UserId},
    permission::Caller,
    role::Role,
};
use chrono::{DateTime, Utc};

pub mod event;

/// A bearer token as presented in the `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(pub String);

/// Identity decoded from a verified, unexpired and unrevoked access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthClaims {
    pub token_id: TokenId,
    pub user_id: UserId,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl AuthClaims {
    pub fn caller(&self) -> Caller {
        Caller::new(self.user_id, self.role)
    }
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: AccessToken,
    pub user_id: UserId,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}
