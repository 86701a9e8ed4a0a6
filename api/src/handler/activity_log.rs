use axum::{
    extract::{Query, State},
    Json,
};
use garde::Validate;
use kernel::model::{activity_log::event::CreateActivityLog, permission::Permission};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::activity_log::{ActivityLogListQuery, PaginatedActivityLogResponse},
};

/// Writes an activity entry in the background. The request never waits for
/// it and a failed write is only logged.
pub(crate) fn record_activity(registry: &AppRegistry, event: CreateActivityLog) {
    let repository = registry.activity_log_repository();
    tokio::spawn(async move {
        let action = event.action.clone();
        if let Err(e) = repository.record(event).await {
            tracing::warn!(error = %e, %action, "failed to record activity");
        }
    });
}

pub async fn show_activity_logs(
    user: AuthorizedUser,
    Query(query): Query<ActivityLogListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaginatedActivityLogResponse>> {
    user.authorize(Permission::ViewActivityLogs)?;
    query.validate()?;

    registry
        .activity_log_repository()
        .find_all(query.into())
        .await
        .map(PaginatedActivityLogResponse::from)
        .map(Json)
}
