use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    guide::{
        event::{CreateGuide, DeleteGuide, UpdateGuide},
        Guide,
    },
    id::GuideId,
    permission::Permission,
};
use kernel::repository::guide::GuideRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::guide::GuideRow, ConnectionPool};

#[derive(new)]
pub struct GuideRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl GuideRepository for GuideRepositoryImpl {
    async fn create(&self, event: CreateGuide) -> AppResult<GuideId> {
        event.requested_by.authorize(Permission::ManageCatalog)?;

        let guide_id: GuideId = sqlx::query_scalar(
            r#"
                INSERT INTO guides (first_name, last_name, email, phone_number, bio)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING guide_id
            "#,
        )
        .bind(&event.first_name)
        .bind(&event.last_name)
        .bind(&event.email)
        .bind(&event.phone_number)
        .bind(&event.bio)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(guide_id)
    }

    async fn find_all(&self) -> AppResult<Vec<Guide>> {
        let rows = sqlx::query_as::<_, GuideRow>(
            r#"
                SELECT guide_id, first_name, last_name, email, phone_number, bio
                FROM guides
                ORDER BY last_name ASC, first_name ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Guide::from).collect())
    }

    async fn find_by_id(&self, guide_id: GuideId) -> AppResult<Option<Guide>> {
        let row = sqlx::query_as::<_, GuideRow>(
            r#"
                SELECT guide_id, first_name, last_name, email, phone_number, bio
                FROM guides
                WHERE guide_id = $1
            "#,
        )
        .bind(guide_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Guide::from))
    }

    async fn update(&self, event: UpdateGuide) -> AppResult<()> {
        event.requested_by.authorize(Permission::ManageCatalog)?;

        let res = sqlx::query(
            r#"
                UPDATE guides
                SET first_name = $1, last_name = $2, email = $3, phone_number = $4, bio = $5
                WHERE guide_id = $6
            "#,
        )
        .bind(&event.first_name)
        .bind(&event.last_name)
        .bind(&event.email)
        .bind(&event.phone_number)
        .bind(&event.bio)
        .bind(event.guide_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified guide not found".into()));
        }
        Ok(())
    }

    // Assignments to trips are removed with the guide.
    async fn delete(&self, event: DeleteGuide) -> AppResult<()> {
        event.requested_by.authorize(Permission::ManageCatalog)?;

        let res = sqlx::query("DELETE FROM guides WHERE guide_id = $1")
            .bind(event.guide_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified guide not found".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::{id::UserId, permission::Caller, role::Role};

    #[sqlx::test(fixtures("common", "trip"))]
    async fn manages_guides(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = GuideRepositoryImpl::new(ConnectionPool::new(pool));
        let admin = Caller::new(UserId::new(), Role::Admin);

        let id = repo
            .create(CreateGuide::new(
                "Joao".into(),
                "Silva".into(),
                "joao@example.com".into(),
                None,
                "Lisbon born".into(),
                admin,
            ))
            .await?;
        let guides = repo.find_all().await?;
        assert_eq!(guides.len(), 2);

        repo.update(UpdateGuide::new(
            id,
            "Joao".into(),
            "Silva".into(),
            "joao@example.com".into(),
            Some("+351 000".into()),
            "Tram expert".into(),
            admin,
        ))
        .await?;
        let guide = repo.find_by_id(id).await?.unwrap();
        assert_eq!(guide.bio, "Tram expert");
        assert_eq!(guide.phone_number.as_deref(), Some("+351 000"));

        // Haruka is assigned to a trip; deleting her drops the assignment.
        let haruka = guides.iter().find(|g| g.first_name == "Haruka").unwrap();
        repo.delete(DeleteGuide::new(haruka.guide_id, admin)).await?;
        assert!(repo.find_by_id(haruka.guide_id).await?.is_none());
        Ok(())
    }

    #[sqlx::test(fixtures("common"))]
    async fn missing_guide_is_not_found(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = GuideRepositoryImpl::new(ConnectionPool::new(pool));
        let admin = Caller::new(UserId::new(), Role::Admin);

        let res = repo.delete(DeleteGuide::new(GuideId::new(), admin)).await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        Ok(())
    }
}
