use kernel::model::{
    activity_log::ActivityLog,
    id::{ActivityLogId, UserId},
};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct ActivityLogRow {
    pub log_id: ActivityLogId,
    pub user_id: Option<UserId>,
    pub action: String,
    pub entity: String,
    pub entity_id: Option<String>,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityLogRow> for ActivityLog {
    fn from(value: ActivityLogRow) -> Self {
        let ActivityLogRow {
            log_id,
            user_id,
            action,
            entity,
            entity_id,
            details,
            created_at,
        } = value;
        ActivityLog {
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
