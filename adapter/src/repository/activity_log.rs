use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    activity_log::{event::CreateActivityLog, ActivityLog},
    list::{ListOptions, PaginatedList},
};
use kernel::repository::activity_log::ActivityLogRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::activity_log::ActivityLogRow, ConnectionPool};

#[derive(new)]
pub struct ActivityLogRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ActivityLogRepository for ActivityLogRepositoryImpl {
    async fn record(&self, event: CreateActivityLog) -> AppResult<()> {
        sqlx::query(
            r#"
                INSERT INTO activity_logs (user_id, action, entity, entity_id, details)
                VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(event.user_id)
        .bind(&event.action)
        .bind(&event.entity)
        .bind(&event.entity_id)
        .bind(&event.details)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(())
    }

    async fn find_all(&self, options: ListOptions) -> AppResult<PaginatedList<ActivityLog>> {
        let ListOptions { limit, offset } = options;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activity_logs")
            .fetch_one(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        let rows = sqlx::query_as::<_, ActivityLogRow>(
            r#"
                SELECT log_id, user_id, action, entity, entity_id, details, created_at
                FROM activity_logs
                ORDER BY created_at DESC, log_id ASC
                LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(PaginatedList {
            total,
            limit,
            offset,
            items: rows.into_iter().map(ActivityLog::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::id::UserId;

    #[sqlx::test]
    async fn records_and_pages_entries(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = ActivityLogRepositoryImpl::new(ConnectionPool::new(pool));
        let user_id = UserId::new();

        repo.record(CreateActivityLog::new(Some(user_id), "LOGIN", "user").with_entity_id(user_id))
            .await?;
        repo.record(
            CreateActivityLog::new(None, "REGISTER", "user").with_details("self-service signup"),
        )
        .await?;
        repo.record(CreateActivityLog::new(Some(user_id), "LOGOUT", "user"))
            .await?;

        let page = repo.find_all(ListOptions::from_page(1, 2)).await?;
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);

        let rest = repo.find_all(ListOptions::from_page(2, 2)).await?;
        assert_eq!(rest.items.len(), 1);

        let all = repo.find_all(ListOptions::from_page(1, 10)).await?;
        let login = all.items.iter().find(|l| l.action == "LOGIN").unwrap();
        assert_eq!(login.entity_id, Some(user_id.to_string()));
        let register = all.items.iter().find(|l| l.action == "REGISTER").unwrap();
        assert_eq!(register.user_id, None);
        assert_eq!(register.details, "self-service signup");
        Ok(())
    }
}
