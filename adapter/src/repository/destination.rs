use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    destination::{
        event::{CreateDestination, DeleteDestination, UpdateDestination},
        Destination,
    },
    id::DestinationId,
    permission::Permission,
};
use kernel::repository::destination::DestinationRepository;
use shared::error::{AppError, AppResult};

use crate::database::{map_foreign_key_violation, model::destination::DestinationRow, ConnectionPool};

#[derive(new)]
pub struct DestinationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl DestinationRepository for DestinationRepositoryImpl {
    async fn create(&self, event: CreateDestination) -> AppResult<DestinationId> {
        event.requested_by.authorize(Permission::ManageCatalog)?;

        let destination_id: DestinationId = sqlx::query_scalar(
            r#"
                INSERT INTO destinations (name, country, description, image_url)
                VALUES ($1, $2, $3, $4)
                RETURNING destination_id
            "#,
        )
        .bind(&event.name)
        .bind(&event.country)
        .bind(&event.description)
        .bind(&event.image_url)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(destination_id)
    }

    async fn find_all(&self) -> AppResult<Vec<Destination>> {
        let rows = sqlx::query_as::<_, DestinationRow>(
            r#"
                SELECT destination_id, name, country, description, image_url
                FROM destinations
                ORDER BY name ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Destination::from).collect())
    }

    async fn find_by_id(&self, destination_id: DestinationId) -> AppResult<Option<Destination>> {
        let row = sqlx::query_as::<_, DestinationRow>(
            r#"
                SELECT destination_id, name, country, description, image_url
                FROM destinations
                WHERE destination_id = $1
            "#,
        )
        .bind(destination_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Destination::from))
    }

    async fn update(&self, event: UpdateDestination) -> AppResult<()> {
        event.requested_by.authorize(Permission::ManageCatalog)?;

        let res = sqlx::query(
            r#"
                UPDATE destinations
                SET name = $1, country = $2, description = $3, image_url = $4
                WHERE destination_id = $5
            "#,
        )
        .bind(&event.name)
        .bind(&event.country)
        .bind(&event.description)
        .bind(&event.image_url)
        .bind(event.destination_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(
                "specified destination not found".into(),
            ));
        }
        Ok(())
    }

    async fn delete(&self, event: DeleteDestination) -> AppResult<()> {
        event.requested_by.authorize(Permission::ManageCatalog)?;

        let mut tx = self.db.begin().await?;

        // Trips referencing the row take a key-share lock, so once this lock is
        // held no new trip can point at the destination until commit.
        sqlx::query_scalar::<_, DestinationId>(
            "SELECT destination_id FROM destinations WHERE destination_id = $1 FOR UPDATE",
        )
        .bind(event.destination_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound("specified destination not found".into()))?;

        let trips: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM trips WHERE destination_id = $1")
                .bind(event.destination_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        if trips > 0 {
            return Err(AppError::UnprocessableEntity(format!(
                "destination is used by {trips} trip(s)"
            )));
        }

        sqlx::query("DELETE FROM destinations WHERE destination_id = $1")
            .bind(event.destination_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_foreign_key_violation(e, "destination is used by a trip"))?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }
}
