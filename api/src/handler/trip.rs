use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    activity_log::event::CreateActivityLog,
    id::TripId,
    permission::Permission,
    trip::event::DeleteTrip,
};
use registry::AppRegistry;
use serde_json::json;
use shared::error::{AppError, AppResult};

use super::activity_log::record_activity;
use crate::{
    extractor::AuthorizedUser,
    model::{
        registration::RegistrationsResponse,
        trip::{
            AssignGuidesRequest, AssignGuidesRequestWithIds, CreateTripRequestWithCaller,
            PaginatedTripResponse, TripListQuery, TripResponse, TripSearchQuery,
            UpdateTripRequestWithIds, UpsertTripRequest,
        },
    },
};

pub async fn register_trip(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpsertTripRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    req.check()?;

    let trip_id = registry
        .trip_repository()
        .create(CreateTripRequestWithCaller::new(user.caller(), req).into())
        .await?;

    record_activity(
        &registry,
        CreateActivityLog::new(Some(user.id()), "CREATE", "trip").with_entity_id(trip_id),
    );

    Ok((StatusCode::CREATED, Json(json!({ "tripId": trip_id }))))
}

pub async fn show_trip_list(
    Query(query): Query<TripListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaginatedTripResponse>> {
    query.validate()?;

    registry
        .trip_repository()
        .find_all(query.into())
        .await
        .map(PaginatedTripResponse::from)
        .map(Json)
}

pub async fn search_trips(
    Query(query): Query<TripSearchQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaginatedTripResponse>> {
    query.validate()?;

    registry
        .trip_repository()
        .find_all(query.into())
        .await
        .map(PaginatedTripResponse::from)
        .map(Json)
}

pub async fn show_trip(
    Path(trip_id): Path<TripId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<TripResponse>> {
    registry
        .trip_repository()
        .find_by_id(trip_id)
        .await
        .and_then(|trip| match trip {
            Some(trip) => Ok(Json(trip.into())),
            None => Err(AppError::EntityNotFound("specified trip not found".into())),
        })
}

pub async fn update_trip(
    user: AuthorizedUser,
    Path(trip_id): Path<TripId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpsertTripRequest>,
) -> AppResult<StatusCode> {
    req.check()?;

    registry
        .trip_repository()
        .update(UpdateTripRequestWithIds::new(trip_id, user.caller(), req).into())
        .await?;

    record_activity(
        &registry,
        CreateActivityLog::new(Some(user.id()), "UPDATE", "trip").with_entity_id(trip_id),
    );

    Ok(StatusCode::OK)
}

pub async fn delete_trip(
    user: AuthorizedUser,
    Path(trip_id): Path<TripId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .trip_repository()
        .delete(DeleteTrip::new(trip_id, user.caller()))
        .await?;

    record_activity(
        &registry,
        CreateActivityLog::new(Some(user.id()), "DELETE", "trip").with_entity_id(trip_id),
    );

    Ok(StatusCode::NO_CONTENT)
}

pub async fn assign_guides(
    user: AuthorizedUser,
    Path(trip_id): Path<TripId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<AssignGuidesRequest>,
) -> AppResult<StatusCode> {
    let details = format!("{} guide(s)", req.guide_ids.len());

    registry
        .trip_repository()
        .assign_guides(AssignGuidesRequestWithIds::new(trip_id, user.caller(), req).into())
        .await?;

    record_activity(
        &registry,
        CreateActivityLog::new(Some(user.id()), "ASSIGN_GUIDES", "trip")
            .with_entity_id(trip_id)
            .with_details(details),
    );

    Ok(StatusCode::OK)
}

pub async fn show_trip_registrations(
    user: AuthorizedUser,
    Path(trip_id): Path<TripId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RegistrationsResponse>> {
    user.authorize(Permission::ManageCatalog)?;

    registry
        .registration_repository()
        .find_by_trip_id(trip_id)
        .await
        .map(RegistrationsResponse::from)
        .map(Json)
}
