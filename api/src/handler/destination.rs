use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    activity_log::event::CreateActivityLog,
    destination::event::DeleteDestination,
    id::DestinationId,
};
use registry::AppRegistry;
use serde_json::json;
use shared::error::{AppError, AppResult};

use super::activity_log::record_activity;
use crate::{
    extractor::AuthorizedUser,
    model::destination::{
        CreateDestinationRequestWithCaller, DestinationResponse, DestinationsResponse,
        UpdateDestinationRequestWithIds, UpsertDestinationRequest,
    },
};

pub async fn register_destination(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpsertDestinationRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    req.validate()?;

    let destination_id = registry
        .destination_repository()
        .create(CreateDestinationRequestWithCaller::new(user.caller(), req).into())
        .await?;

    record_activity(
        &registry,
        CreateActivityLog::new(Some(user.id()), "CREATE", "destination")
            .with_entity_id(destination_id),
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({ "destinationId": destination_id })),
    ))
}

pub async fn show_destination_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<DestinationsResponse>> {
    let items = registry
        .destination_repository()
        .find_all()
        .await?
        .into_iter()
        .map(DestinationResponse::from)
        .collect();

    Ok(Json(DestinationsResponse { items }))
}

pub async fn show_destination(
    Path(destination_id): Path<DestinationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<DestinationResponse>> {
    registry
        .destination_repository()
        .find_by_id(destination_id)
        .await
        .and_then(|d| match d {
            Some(d) => Ok(Json(d.into())),
            None => Err(AppError::EntityNotFound(
                "specified destination not found".into(),
            )),
        })
}

pub async fn update_destination(
    user: AuthorizedUser,
    Path(destination_id): Path<DestinationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpsertDestinationRequest>,
) -> AppResult<StatusCode> {
    req.validate()?;

    registry
        .destination_repository()
        .update(UpdateDestinationRequestWithIds::new(destination_id, user.caller(), req).into())
        .await?;

    record_activity(
        &registry,
        CreateActivityLog::new(Some(user.id()), "UPDATE", "destination")
            .with_entity_id(destination_id),
    );

    Ok(StatusCode::OK)
}

pub async fn delete_destination(
    user: AuthorizedUser,
    Path(destination_id): Path<DestinationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .destination_repository()
        .delete(DeleteDestination::new(destination_id, user.caller()))
        .await?;

    record_activity(
        &registry,
        CreateActivityLog::new(Some(user.id()), "DELETE", "destination")
            .with_entity_id(destination_id),
    );

    Ok(StatusCode::NO_CONTENT)
}
