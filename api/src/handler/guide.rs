use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{activity_log::event::CreateActivityLog, guide::event::DeleteGuide, id::GuideId};
use registry::AppRegistry;
use serde_json::json;
use shared::error::{AppError, AppResult};

use super::activity_log::record_activity;
use crate::{
    extractor::AuthorizedUser,
    model::guide::{
        CreateGuideRequestWithCaller, GuideResponse, GuidesResponse, UpdateGuideRequestWithIds,
        UpsertGuideRequest,
    },
};

pub async fn register_guide(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpsertGuideRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    req.validate()?;

    let guide_id = registry
        .guide_repository()
        .create(CreateGuideRequestWithCaller::new(user.caller(), req).into())
        .await?;

    record_activity(
        &registry,
        CreateActivityLog::new(Some(user.id()), "CREATE", "guide").with_entity_id(guide_id),
    );

    Ok((StatusCode::CREATED, Json(json!({ "guideId": guide_id }))))
}

pub async fn show_guide_list(State(registry): State<AppRegistry>) -> AppResult<Json<GuidesResponse>> {
    let items = registry
        .guide_repository()
        .find_all()
        .await?
        .into_iter()
        .map(GuideResponse::from)
        .collect();

    Ok(Json(GuidesResponse { items }))
}

pub async fn show_guide(
    Path(guide_id): Path<GuideId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<GuideResponse>> {
    registry
        .guide_repository()
        .find_by_id(guide_id)
        .await?
        .map(|g| Json(g.into()))
        .ok_or_else(|| AppError::EntityNotFound("specified guide not found".into()))
}

pub async fn update_guide(
    user: AuthorizedUser,
    Path(guide_id): Path<GuideId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpsertGuideRequest>,
) -> AppResult<StatusCode> {
    req.validate()?;

    registry
        .guide_repository()
        .update(UpdateGuideRequestWithIds::new(guide_id, user.caller(), req).into())
        .await?;

    record_activity(
        &registry,
        CreateActivityLog::new(Some(user.id()), "UPDATE", "guide").with_entity_id(guide_id),
    );

    Ok(StatusCode::OK)
}

pub async fn delete_guide(
    user: AuthorizedUser,
    Path(guide_id): Path<GuideId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .guide_repository()
        .delete(DeleteGuide::new(guide_id, user.caller()))
        .await?;

    record_activity(
        &registry,
        CreateActivityLog::new(Some(user.id()), "DELETE", "guide").with_entity_id(guide_id),
    );

    Ok(StatusCode::NO_CONTENT)
}
