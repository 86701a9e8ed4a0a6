use axum::{async_trait, extract::FromRequestParts, http::request::Parts, RequestPartsExt};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use kernel::model::{
    auth::{AccessToken, AuthClaims},
    id::UserId,
    permission::{Caller, Permission},
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

/// A request whose bearer token verified, has not expired and was not revoked.
pub struct AuthorizedUser {
    pub access_token: AccessToken,
    pub claims: AuthClaims,
}

impl AuthorizedUser {
    pub fn id(&self) -> UserId {
        self.claims.user_id
    }

    pub fn caller(&self) -> Caller {
        self.claims.caller()
    }

    pub fn authorize(&self, permission: Permission) -> AppResult<()> {
        self.caller().authorize(permission)
    }
}

#[async_trait]
impl FromRequestParts<AppRegistry> for AuthorizedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::UnauthenticatedError)?;
        let access_token = AccessToken(bearer.token().to_string());

        let claims = registry
            .auth_repository()
            .fetch_claims_from_token(&access_token)
            .await?
            .ok_or(AppError::UnauthenticatedError)?;

        Ok(Self {
            access_token,
            claims,
        })
    }
}
