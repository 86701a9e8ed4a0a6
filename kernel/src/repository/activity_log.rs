use crate::model::{
    activity_log::{event::CreateActivityLog, ActivityLog},
    list::{ListOptions, PaginatedList},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    async fn record(&self, event: CreateActivityLog) -> AppResult<()>;
    async fn find_all(&self, options: ListOptions) -> AppResult<PaginatedList<ActivityLog>>;
}
