use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    activity_log::event::CreateActivityLog,
    id::UserId,
    permission::Permission,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use super::activity_log::record_activity;
use crate::{
    extractor::AuthorizedUser,
    model::user::{
        UpdateUserProfileRequest, UpdateUserProfileRequestWithUserId, UpdateUserRoleRequest,
        UpdateUserRoleRequestWithIds, UserResponse, UsersResponse,
    },
};

pub async fn get_current_user(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UserResponse>> {
    find_user(&registry, user.id()).await.map(Json)
}

pub async fn get_user(
    user: AuthorizedUser,
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UserResponse>> {
    user.authorize(Permission::ActFor(user_id))?;
    find_user(&registry, user_id).await.map(Json)
}

pub async fn list_users(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UsersResponse>> {
    user.authorize(Permission::ManageUsers)?;

    let items = registry
        .user_repository()
        .find_all()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(UsersResponse { items }))
}

pub async fn update_current_user(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateUserProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    req.validate()?;

    registry
        .user_repository()
        .update_profile(UpdateUserProfileRequestWithUserId::new(user.id(), req).into())
        .await?;

    record_activity(
        &registry,
        CreateActivityLog::new(Some(user.id()), "UPDATE_PROFILE", "user")
            .with_entity_id(user.id()),
    );

    find_user(&registry, user.id()).await.map(Json)
}

pub async fn change_role(
    user: AuthorizedUser,
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateUserRoleRequest>,
) -> AppResult<StatusCode> {
    registry
        .user_repository()
        .update_role(UpdateUserRoleRequestWithIds::new(user_id, user.caller(), req).into())
        .await?;

    record_activity(
        &registry,
        CreateActivityLog::new(Some(user.id()), "CHANGE_ROLE", "user").with_entity_id(user_id),
    );

    Ok(StatusCode::OK)
}

async fn find_user(registry: &AppRegistry, user_id: UserId) -> AppResult<UserResponse> {
    registry
        .user_repository()
        .find_current_user(user_id)
        .await?
        .map(UserResponse::from)
        .ok_or_else(|| AppError::EntityNotFound("specified user not found".into()))
}
