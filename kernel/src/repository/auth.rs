use crate::model::{
    auth::{event::CreateToken, AccessToken, AuthClaims, IssuedToken},
    user::User,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Checks a user name and password; unknown names and wrong passwords fail identically.
    async fn verify_user(&self, user_name: &str, password: &str) -> AppResult<User>;
    async fn create_token(&self, event: CreateToken) -> AppResult<IssuedToken>;
    /// Returns `None` for malformed, expired, badly signed or revoked tokens.
    async fn fetch_claims_from_token(&self, access_token: &AccessToken)
        -> AppResult<Option<AuthClaims>>;
    async fn delete_token(&self, claims: &AuthClaims) -> AppResult<()>;
}
