use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    activity_log::ActivityLog,
    id::{ActivityLogId, UserId},
    list::{ListOptions, PaginatedList},
};
use serde::{Deserialize, Serialize};

const fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize, Validate)]
pub struct ActivityLogListQuery {
    #[garde(range(min = 1, max = 200))]
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[garde(range(min = 0))]
    #[serde(default)]
    pub offset: i64,
}

impl From<ActivityLogListQuery> for ListOptions {
    fn from(value: ActivityLogListQuery) -> Self {
        let ActivityLogListQuery { limit, offset } = value;
        ListOptions { limit, offset }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogResponse {
    pub log_id: ActivityLogId,
    pub user_id: Option<UserId>,
    pub action: String,
    pub entity: String,
    pub entity_id: Option<String>,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityLog> for ActivityLogResponse {
    fn from(value: ActivityLog) -> Self {
        let ActivityLog {
            log_id,
            user_id,
            action,
            entity,
            entity_id,
            details,
            created_at,
        } = value;
        Self {
            log_id,
            user_id,
            action,
            entity,
            entity_id,
            details,
            created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedActivityLogResponse {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub items: Vec<ActivityLogResponse>,
}

impl From<PaginatedList<ActivityLog>> for PaginatedActivityLogResponse {
    fn from(value: PaginatedList<ActivityLog>) -> Self {
        let PaginatedList {
            total,
            limit,
            offset,
            items,
        } = value;
        Self {
            total,
            limit,
            offset,
            items: items.into_iter().map(ActivityLogResponse::from).collect(),
        }
    }
}
