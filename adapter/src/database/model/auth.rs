use crate::redis::model::{RedisKey, RedisValue};
use kernel::model::id::{TokenId, UserId};
use shared::error::AppError;
use std::str::FromStr;

/// Key present in Redis while a revoked token would otherwise still be valid.
pub struct RevokedTokenKey(TokenId);

impl From<TokenId> for RevokedTokenKey {
    fn from(value: TokenId) -> Self {
        Self(value)
    }
}

impl RedisKey for RevokedTokenKey {
    type Value = RevokedTokenOwner;

    fn inner(&self) -> String {
        format!("revoked-token:{}", self.0)
    }
}

pub struct RevokedTokenOwner(pub UserId);

impl RedisValue for RevokedTokenOwner {
    fn inner(&self) -> String {
        self.0.to_string()
    }
}

impl TryFrom<String> for RevokedTokenOwner {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(Self(UserId::from_str(&value)?))
    }
}
