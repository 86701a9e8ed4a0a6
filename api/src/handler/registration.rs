use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    activity_log::event::CreateActivityLog,
    id::{RegistrationId, UserId},
    permission::Permission,
    registration::event::DeleteRegistration,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use super::activity_log::record_activity;
use crate::{
    extractor::AuthorizedUser,
    model::registration::{
        CreateRegistrationRequest, CreateRegistrationRequestWithCaller, RegistrationResponse,
        RegistrationsResponse, UpdateRegistrationRequest, UpdateRegistrationRequestWithIds,
        UpdateRegistrationStatusRequest, UpdateRegistrationStatusRequestWithIds,
    },
};

pub async fn register_registration(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateRegistrationRequest>,
) -> AppResult<(StatusCode, Json<RegistrationResponse>)> {
    req.validate()?;

    let registration = registry
        .registration_repository()
        .create(CreateRegistrationRequestWithCaller::new(user.caller(), req).into())
        .await
        .inspect_err(|e| {
            if let AppError::CapacityExceeded(reason) = e {
                tracing::info!(user_id = %user.id(), %reason, "booking refused");
            }
        })?;

    record_activity(
        &registry,
        CreateActivityLog::new(Some(user.id()), "CREATE", "registration")
            .with_entity_id(registration.registration_id)
            .with_details(format!(
                "trip {} for {} participant(s)",
                registration.trip.trip_id, registration.number_of_participants
            )),
    );

    Ok((StatusCode::CREATED, Json(registration.into())))
}

pub async fn show_registration_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RegistrationsResponse>> {
    user.authorize(Permission::ManageCatalog)?;

    registry
        .registration_repository()
        .find_all()
        .await
        .map(RegistrationsResponse::from)
        .map(Json)
}

pub async fn show_registration(
    user: AuthorizedUser,
    Path(registration_id): Path<RegistrationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RegistrationResponse>> {
    let registration = registry
        .registration_repository()
        .find_by_id(registration_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound("specified registration not found".into()))?;

    let owner = registration.user.user_id;
    user.caller().authorize_or_hide(Permission::ActFor(owner), "registration")?;

    Ok(Json(registration.into()))
}

pub async fn show_user_registrations(
    user: AuthorizedUser,
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RegistrationsResponse>> {
    user.authorize(Permission::ActFor(user_id))?;

    registry
        .registration_repository()
        .find_by_user_id(user_id)
        .await
        .map(RegistrationsResponse::from)
        .map(Json)
}

pub async fn update_registration(
    user: AuthorizedUser,
    Path(registration_id): Path<RegistrationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateRegistrationRequest>,
) -> AppResult<Json<RegistrationResponse>> {
    req.validate()?;

    let registration = registry
        .registration_repository()
        .update(UpdateRegistrationRequestWithIds::new(registration_id, user.caller(), req).into())
        .await?;

    record_activity(
        &registry,
        CreateActivityLog::new(Some(user.id()), "UPDATE", "registration")
            .with_entity_id(registration_id)
            .with_details(format!(
                "{} participant(s), {}",
                registration.number_of_participants, registration.status
            )),
    );

    Ok(Json(registration.into()))
}

pub async fn update_registration_status(
    user: AuthorizedUser,
    Path(registration_id): Path<RegistrationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateRegistrationStatusRequest>,
) -> AppResult<StatusCode> {
    let status = req.status;

    registry
        .registration_repository()
        .update_status(
            UpdateRegistrationStatusRequestWithIds::new(registration_id, user.caller(), req).into(),
        )
        .await?;

    record_activity(
        &registry,
        CreateActivityLog::new(Some(user.id()), "UPDATE_STATUS", "registration")
            .with_entity_id(registration_id)
            .with_details(format!("{status:?}")),
    );

    Ok(StatusCode::OK)
}

pub async fn delete_registration(
    user: AuthorizedUser,
    Path(registration_id): Path<RegistrationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .registration_repository()
        .delete(DeleteRegistration::new(registration_id, user.caller()))
        .await?;

    record_activity(
        &registry,
        CreateActivityLog::new(Some(user.id()), "DELETE", "registration")
            .with_entity_id(registration_id),
    );

    Ok(StatusCode::NO_CONTENT)
}
