use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{
    errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use kernel::model::{
    auth::{AccessToken, AuthClaims, IssuedToken},
    id::{TokenId, UserId},
    role::Role,
};
use serde::{Deserialize, Serialize};
use shared::{config::AuthConfig, error::AppResult};
use std::{collections::HashSet, str::FromStr};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: uuid::Uuid,
    role: String,
    jti: uuid::Uuid,
    iat: i64,
    exp: i64,
}

/// Why a token was refused. Callers collapse every variant into "unauthenticated".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidToken {
    #[error("token has expired")]
    Expired,
    #[error("token is malformed")]
    Malformed,
    #[error("token signature does not match")]
    BadSignature,
}

/// Issues and verifies HS256-signed access tokens with an absolute expiry.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl: Duration::seconds(config.ttl as i64),
        }
    }

    pub fn issue(&self, user_id: UserId, role: Role, now: DateTime<Utc>) -> AppResult<IssuedToken> {
        let expires_at = now + self.ttl;
        let claims = TokenClaims {
            sub: user_id.raw(),
            role: role.as_ref().to_string(),
            jti: TokenId::new().raw(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(IssuedToken {
            access_token: AccessToken(token),
            user_id,
            role,
            expires_at,
        })
    }

    /// A token is accepted while `now` is strictly before its expiry.
    pub fn verify(
        &self,
        access_token: &AccessToken,
        now: DateTime<Utc>,
    ) -> Result<AuthClaims, InvalidToken> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against the caller's clock below, without leeway.
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::from(["exp".to_string(), "sub".to_string()]);

        let data = jsonwebtoken::decode::<TokenClaims>(&access_token.0, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => InvalidToken::BadSignature,
                _ => InvalidToken::Malformed,
            })?;
        let TokenClaims {
            sub, role, jti, exp, ..
        } = data.claims;

        if now.timestamp() >= exp {
            return Err(InvalidToken::Expired);
        }
        let role = Role::from_str(&role).map_err(|_| InvalidToken::Malformed)?;
        let expires_at = Utc
            .timestamp_opt(exp, 0)
            .single()
            .ok_or(InvalidToken::Malformed)?;

        Ok(AuthClaims {
            token_id: TokenId::from(jti),
            user_id: UserId::from(sub),
            role,
            expires_at,
        })
    }
}
