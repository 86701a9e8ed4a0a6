use axum::{extract::State, http::StatusCode, Json};
use garde::Validate;
use kernel::model::{activity_log::event::CreateActivityLog, auth::event::CreateToken};
use registry::AppRegistry;
use shared::error::AppResult;

use super::activity_log::record_activity;
use crate::{
    extractor::AuthorizedUser,
    model::{
        auth::{AccessTokenResponse, LoginRequest, RegisterRequest},
        user::{UpdateUserPasswordRequest, UpdateUserPasswordRequestWithUserId, UserResponse},
    },
};

pub async fn register(
    State(registry): State<AppRegistry>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    req.validate()?;

    let user = registry.user_repository().create(req.into()).await?;

    record_activity(
        &registry,
        CreateActivityLog::new(Some(user.user_id), "REGISTER", "user")
            .with_entity_id(user.user_id),
    );

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(registry): State<AppRegistry>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AccessTokenResponse>> {
    req.validate()?;

    let user = registry
        .auth_repository()
        .verify_user(&req.user_name, &req.password)
        .await?;
    let issued = registry
        .auth_repository()
        .create_token(CreateToken::new(user.user_id, user.role))
        .await?;

    record_activity(
        &registry,
        CreateActivityLog::new(Some(user.user_id), "LOGIN", "user").with_entity_id(user.user_id),
    );

    Ok(Json(issued.into()))
}

pub async fn logout(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry.auth_repository().delete_token(&user.claims).await?;

    record_activity(
        &registry,
        CreateActivityLog::new(Some(user.id()), "LOGOUT", "user").with_entity_id(user.id()),
    );

    Ok(StatusCode::NO_CONTENT)
}

pub async fn change_password(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateUserPasswordRequest>,
) -> AppResult<StatusCode> {
    req.validate()?;

    registry
        .user_repository()
        .update_password(UpdateUserPasswordRequestWithUserId::new(user.id(), req).into())
        .await?;

    record_activity(
        &registry,
        CreateActivityLog::new(Some(user.id()), "CHANGE_PASSWORD", "user")
            .with_entity_id(user.id()),
    );

    Ok(StatusCode::OK)
}
