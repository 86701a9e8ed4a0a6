use crate::model::id::{ActivityLogId, UserId};
use chrono::{DateTime, Utc};
pub mod event;

#[derive(Debug, Clone)]
pub struct ActivityLog {
    pub log_id: ActivityLogId,
    pub user_id: Option<UserId>,
    pub action: String,
    pub entity: String,
    pub entity_id: Option<String>,
    pub details: String,
    pub created_at: DateTime<Utc>,
}
