use std::collections::HashMap;

use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    guide::TripGuide,
    id::{DestinationId, TripId},
    list::PaginatedList,
    permission::Permission,
    trip::{
        event::{AssignGuides, CreateTrip, DeleteTrip, UpdateTrip},
        ensure_valid_max_participants, ensure_valid_price, Capacity, Trip, TripListOptions,
    },
};
use kernel::repository::trip::TripRepository;
use shared::error::{AppError, AppResult};
use sqlx::{Postgres, Transaction};

use crate::database::{
    model::{
        guide::TripGuideRow,
        trip::{TripCapacityRow, TripRow},
    },
    ConnectionPool,
};

// Booked participants are summed from the registrations that still count.
const TRIP_SELECT: &str = r#"
    SELECT
        t.trip_id,
        t.name,
        t.description,
        t.start_date,
        t.end_date,
        t.price,
        t.max_participants,
        t.image_url,
        d.destination_id,
        d.name AS destination_name,
        d.country AS destination_country,
        COALESCE((
            SELECT SUM(r.number_of_participants)
            FROM trip_registrations AS r
            WHERE r.trip_id = t.trip_id AND r.status <> 'Cancelled'
        ), 0)::BIGINT AS booked_participants
    FROM trips AS t
    INNER JOIN destinations AS d USING(destination_id)
"#;

const TRIP_FILTER: &str = r#"
    WHERE ($1::UUID IS NULL OR t.destination_id = $1)
    AND ($2::TEXT IS NULL OR t.name ILIKE '%' || $2 || '%')
    AND ($3::TEXT IS NULL OR t.description ILIKE '%' || $3 || '%')
"#;

#[derive(new)]
pub struct TripRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl TripRepository for TripRepositoryImpl {
    async fn create(&self, event: CreateTrip) -> AppResult<TripId> {
        event.requested_by.authorize(Permission::ManageCatalog)?;
        ensure_valid_price(event.price)?;
        ensure_valid_max_participants(event.max_participants)?;

        let mut tx = self.db.begin().await?;
        ensure_destination_exists(&mut tx, event.destination_id).await?;

        let trip_id: TripId = sqlx::query_scalar(
            r#"
                INSERT INTO trips
                (name, description, start_date, end_date, price, max_participants, destination_id, image_url)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING trip_id
            "#,
        )
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(event.price)
        .bind(event.max_participants)
        .bind(event.destination_id)
        .bind(&event.image_url)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(trip_id)
    }

    async fn find_all(&self, options: TripListOptions) -> AppResult<PaginatedList<Trip>> {
        let TripListOptions {
            destination_id,
            name,
            description,
            limit,
            offset,
        } = options;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM trips AS t {TRIP_FILTER}"
        ))
        .bind(destination_id)
        .bind(&name)
        .bind(&description)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let rows = sqlx::query_as::<_, TripRow>(&format!(
            "{TRIP_SELECT} {TRIP_FILTER} ORDER BY t.start_date ASC, t.name ASC LIMIT $4 OFFSET $5"
        ))
        .bind(destination_id)
        .bind(&name)
        .bind(&description)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let trip_ids: Vec<TripId> = rows.iter().map(|row| row.trip_id).collect();
        let mut guides = self.find_guides(&trip_ids).await?;
        let items = rows
            .into_iter()
            .map(|row| {
                let trip_guides = guides.remove(&row.trip_id).unwrap_or_default();
                row.into_trip(trip_guides)
            })
            .collect();

        Ok(PaginatedList {
            total,
            limit,
            offset,
            items,
        })
    }

    async fn find_by_id(&self, trip_id: TripId) -> AppResult<Option<Trip>> {
        let row = sqlx::query_as::<_, TripRow>(&format!("{TRIP_SELECT} WHERE t.trip_id = $1"))
            .bind(trip_id)
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        match row {
            Some(row) => {
                let guides = self
                    .find_guides(&[trip_id])
                    .await?
                    .remove(&trip_id)
                    .unwrap_or_default();
                Ok(Some(row.into_trip(guides)))
            }
            None => Ok(None),
        }
    }

    async fn update(&self, event: UpdateTrip) -> AppResult<()> {
        event.requested_by.authorize(Permission::ManageCatalog)?;
        ensure_valid_price(event.price)?;
        ensure_valid_max_participants(event.max_participants)?;

        let mut tx = self.db.begin().await?;

        // Holding the trip row keeps concurrent bookings out while the
        // new maximum is compared with what is already booked.
        let locked = lock_trip(&mut tx, event.trip_id).await?;
        let booked = booked_participants(&mut tx, locked.trip_id).await?;
        if i64::from(event.max_participants) < booked {
            return Err(AppError::CapacityExceeded(format!(
                "{booked} participant(s) already booked, cannot lower maximum to {}",
                event.max_participants
            )));
        }
        ensure_destination_exists(&mut tx, event.destination_id).await?;

        sqlx::query(
            r#"
                UPDATE trips
                SET name = $1, description = $2, start_date = $3, end_date = $4,
                    price = $5, max_participants = $6, destination_id = $7, image_url = $8
                WHERE trip_id = $9
            "#,
        )
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(event.price)
        .bind(event.max_participants)
        .bind(event.destination_id)
        .bind(&event.image_url)
        .bind(event.trip_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn delete(&self, event: DeleteTrip) -> AppResult<()> {
        event.requested_by.authorize(Permission::ManageCatalog)?;

        let mut tx = self.db.begin().await?;
        lock_trip(&mut tx, event.trip_id).await?;

        let registrations: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM trip_registrations WHERE trip_id = $1")
                .bind(event.trip_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        if registrations > 0 {
            return Err(AppError::UnprocessableEntity(format!(
                "trip has {registrations} registration(s)"
            )));
        }

        sqlx::query("DELETE FROM trips WHERE trip_id = $1")
            .bind(event.trip_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn assign_guides(&self, event: AssignGuides) -> AppResult<()> {
        event.requested_by.authorize(Permission::ManageCatalog)?;

        let mut tx = self.db.begin().await?;
        lock_trip(&mut tx, event.trip_id).await?;

        let mut guide_ids = event.guide_ids;
        guide_ids.sort_by_key(|id| id.raw());
        guide_ids.dedup();

        let known: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM guides WHERE guide_id = ANY($1)")
            .bind(&guide_ids[..])
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        if known != guide_ids.len() as i64 {
            return Err(AppError::EntityNotFound(
                "one or more guides not found".into(),
            ));
        }

        sqlx::query("DELETE FROM trip_guides WHERE trip_id = $1")
            .bind(event.trip_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        sqlx::query(
            r#"
                INSERT INTO trip_guides (trip_id, guide_id)
                SELECT $1, guide_id FROM UNNEST($2::UUID[]) AS guide_id
            "#,
        )
        .bind(event.trip_id)
        .bind(&guide_ids[..])
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }
}

impl TripRepositoryImpl {
    async fn find_guides(&self, trip_ids: &[TripId]) -> AppResult<HashMap<TripId, Vec<TripGuide>>> {
        if trip_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, TripGuideRow>(
            r#"
                SELECT tg.trip_id, g.guide_id, g.first_name, g.last_name
                FROM trip_guides AS tg
                INNER JOIN guides AS g USING(guide_id)
                WHERE tg.trip_id = ANY($1)
                ORDER BY g.last_name ASC, g.first_name ASC
            "#,
        )
        .bind(trip_ids)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let mut grouped: HashMap<TripId, Vec<TripGuide>> = HashMap::new();
        for row in rows {
            grouped.entry(row.trip_id).or_default().push(row.into());
        }
        Ok(grouped)
    }
}

/// Locks the trip row for the rest of the transaction.
pub(crate) async fn lock_trip(
    tx: &mut Transaction<'_, Postgres>,
    trip_id: TripId,
) -> AppResult<TripCapacityRow> {
    sqlx::query_as::<_, TripCapacityRow>(
        "SELECT trip_id, price, max_participants FROM trips WHERE trip_id = $1 FOR UPDATE",
    )
    .bind(trip_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(AppError::SpecificOperationError)?
    .ok_or_else(|| AppError::EntityNotFound("specified trip not found".into()))
}

/// Sums participants of the trip's non-cancelled registrations.
pub(crate) async fn booked_participants(
    tx: &mut Transaction<'_, Postgres>,
    trip_id: TripId,
) -> AppResult<i64> {
    sqlx::query_scalar(
        r#"
            SELECT COALESCE(SUM(number_of_participants), 0)::BIGINT
            FROM trip_registrations
            WHERE trip_id = $1 AND status <> 'Cancelled'
        "#,
    )
    .bind(trip_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(AppError::SpecificOperationError)
}

pub(crate) fn capacity_of(locked: &TripCapacityRow, booked: i64) -> Capacity {
    Capacity::new(locked.max_participants, booked)
}

async fn ensure_destination_exists(
    tx: &mut Transaction<'_, Postgres>,
    destination_id: DestinationId,
) -> AppResult<()> {
    // The key-share lock keeps the destination from being deleted until commit.
    sqlx::query_scalar::<_, DestinationId>(
        "SELECT destination_id FROM destinations WHERE destination_id = $1 FOR KEY SHARE",
    )
    .bind(destination_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(AppError::SpecificOperationError)?
    .ok_or_else(|| AppError::EntityNotFound("specified destination not found".into()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kernel::model::{
        id::{GuideId, UserId},
        list::ListOptions,
        permission::Caller,
        role::Role,
    };
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const AUTUMN: &str = "f47ac10b-58cc-4372-a567-0e02b2c3d479";
    const KYOTO: &str = "a3e7c8f2-5d1b-4c6a-9f0e-2b8d4c7a1e93";
    const LISBON: &str = "c1f0d2b4-7e3a-4b8c-a5d6-9e2f1c0b3a47";
    const ALICE: &str = "5b4c96ac-316a-4bee-8e69-cac5eb84ff4c";

    fn admin() -> Caller {
        Caller::new(UserId::new(), Role::Admin)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    async fn book(pool: &sqlx::PgPool, trip: &str, participants: i32, status: &str) {
        sqlx::query(
            r#"
                INSERT INTO trip_registrations
                (trip_id, user_id, number_of_participants, total_price, status)
                VALUES ($1::UUID, $2::UUID, $3, 0, $4)
            "#,
        )
        .bind(trip)
        .bind(ALICE)
        .bind(participants)
        .bind(status)
        .execute(pool)
        .await
        .unwrap();
    }

    #[sqlx::test(fixtures("common"))]
    async fn creates_and_reads_a_trip(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = TripRepositoryImpl::new(ConnectionPool::new(pool));

        let trip_id = repo
            .create(CreateTrip::new(
                "Lisbon by Tram".into(),
                "Old town rides".into(),
                date("2030-05-01"),
                date("2030-05-04"),
                Decimal::new(12000, 2),
                8,
                DestinationId::from_str(LISBON)?,
                None,
                admin(),
            ))
            .await?;

        let trip = repo.find_by_id(trip_id).await?.unwrap();
        assert_eq!(trip.name, "Lisbon by Tram");
        assert_eq!(trip.price, Decimal::new(12000, 2));
        assert_eq!(trip.destination.name, "Lisbon");
        assert_eq!(trip.max_participants(), 8);
        assert_eq!(trip.available_spots(), 8);
        assert!(trip.guides.is_empty());
        Ok(())
    }

    #[sqlx::test(fixtures("common"))]
    async fn trip_needs_an_existing_destination(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = TripRepositoryImpl::new(ConnectionPool::new(pool));

        let res = repo
            .create(CreateTrip::new(
                "Nowhere".into(),
                String::new(),
                date("2030-05-01"),
                date("2030-05-02"),
                Decimal::ONE,
                1,
                DestinationId::new(),
                None,
                admin(),
            ))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        Ok(())
    }

    #[sqlx::test(fixtures("common"))]
    async fn unstorable_prices_are_rejected_before_insert(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = TripRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        for price in ["1000000000", "0.001"] {
            let res = repo
                .create(CreateTrip::new(
                    "Overpriced".into(),
                    String::new(),
                    date("2030-05-01"),
                    date("2030-05-02"),
                    Decimal::from_str(price)?,
                    4,
                    DestinationId::from_str(LISBON)?,
                    None,
                    admin(),
                ))
                .await;
            assert!(
                matches!(res, Err(AppError::UnprocessableEntity(_))),
                "price {price} was not refused"
            );
        }

        let res = repo
            .create(CreateTrip::new(
                "Stadium Tour".into(),
                String::new(),
                date("2030-05-01"),
                date("2030-05-02"),
                Decimal::ONE,
                10_001,
                DestinationId::from_str(LISBON)?,
                None,
                admin(),
            ))
            .await;
        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));

        let trips: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trips")
            .fetch_one(&pool)
            .await?;
        assert_eq!(trips, 0);
        Ok(())
    }

    #[sqlx::test(fixtures("common", "trip"))]
    async fn available_spots_ignore_cancelled_registrations(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        book(&pool, AUTUMN, 2, "Confirmed").await;
        book(&pool, AUTUMN, 1, "Pending").await;
        book(&pool, AUTUMN, 2, "Cancelled").await;
        let repo = TripRepositoryImpl::new(ConnectionPool::new(pool));

        let trip = repo.find_by_id(TripId::from_str(AUTUMN)?).await?.unwrap();
        assert_eq!(trip.capacity, Capacity::new(5, 3));
        assert_eq!(trip.available_spots(), 2);
        assert_eq!(trip.guides.len(), 1);
        assert_eq!(trip.guides[0].first_name, "Haruka");
        Ok(())
    }

    #[sqlx::test(fixtures("common", "trip"))]
    async fn lists_and_filters_trips(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = TripRepositoryImpl::new(ConnectionPool::new(pool));

        let all = repo
            .find_all(TripListOptions::paged(ListOptions::from_page(1, 20)))
            .await?;
        assert_eq!(all.total, 2);
        assert_eq!(all.items[0].name, "Autumn in Kyoto");

        let by_destination = repo
            .find_all(TripListOptions {
                destination_id: Some(DestinationId::from_str(KYOTO)?),
                ..TripListOptions::paged(ListOptions::from_page(1, 20))
            })
            .await?;
        assert_eq!(by_destination.total, 2);

        let by_name = repo
            .find_all(TripListOptions {
                name: Some("tea".into()),
                ..TripListOptions::paged(ListOptions::from_page(1, 20))
            })
            .await?;
        assert_eq!(by_name.total, 1);
        assert_eq!(by_name.items[0].name, "Kyoto Tea Week");

        let second_page = repo
            .find_all(TripListOptions::paged(ListOptions::from_page(2, 1)))
            .await?;
        assert_eq!(second_page.total, 2);
        assert_eq!(second_page.items.len(), 1);
        assert_eq!(second_page.items[0].name, "Kyoto Tea Week");
        Ok(())
    }

    #[sqlx::test(fixtures("common", "trip"))]
    async fn maximum_cannot_drop_below_booked(pool: sqlx::PgPool) -> anyhow::Result<()> {
        book(&pool, AUTUMN, 4, "Confirmed").await;
        let repo = TripRepositoryImpl::new(ConnectionPool::new(pool));
        let trip_id = TripId::from_str(AUTUMN)?;
        let update = |max| {
            UpdateTrip::new(
                trip_id,
                "Autumn in Kyoto".into(),
                "Maple season walking tour".into(),
                date("2030-11-10"),
                date("2030-11-17"),
                Decimal::new(19950, 2),
                max,
                DestinationId::from_str(KYOTO).unwrap(),
                None,
                admin(),
            )
        };

        let res = repo.update(update(3)).await;
        assert!(matches!(res, Err(AppError::CapacityExceeded(_))));

        repo.update(update(4)).await?;
        let trip = repo.find_by_id(trip_id).await?.unwrap();
        assert_eq!(trip.available_spots(), 0);
        Ok(())
    }

    #[sqlx::test(fixtures("common", "trip"))]
    async fn trip_with_registrations_cannot_be_deleted(pool: sqlx::PgPool) -> anyhow::Result<()> {
        book(&pool, AUTUMN, 1, "Cancelled").await;
        let repo = TripRepositoryImpl::new(ConnectionPool::new(pool));
        let autumn = TripId::from_str(AUTUMN)?;

        let res = repo.delete(DeleteTrip::new(autumn, admin())).await;
        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));

        let tea = TripId::from_str("6fa459ea-ee8a-4ca4-894e-db77e160355e")?;
        repo.delete(DeleteTrip::new(tea, admin())).await?;
        assert!(repo.find_by_id(tea).await?.is_none());
        assert!(repo.find_by_id(autumn).await?.is_some());
        Ok(())
    }

    #[sqlx::test(fixtures("common", "trip"))]
    async fn assigning_guides_replaces_previous_assignment(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = TripRepositoryImpl::new(ConnectionPool::new(pool));
        let autumn = TripId::from_str(AUTUMN)?;

        repo.assign_guides(AssignGuides::new(autumn, vec![], admin()))
            .await?;
        assert!(repo.find_by_id(autumn).await?.unwrap().guides.is_empty());

        let unknown = repo
            .assign_guides(AssignGuides::new(autumn, vec![GuideId::new()], admin()))
            .await;
        assert!(matches!(unknown, Err(AppError::EntityNotFound(_))));

        let haruka = GuideId::from_str("e2b4a6c8-1d3f-4a5b-8c7d-6e9f0a1b2c3d")?;
        repo.assign_guides(AssignGuides::new(autumn, vec![haruka, haruka], admin()))
            .await?;
        assert_eq!(repo.find_by_id(autumn).await?.unwrap().guides.len(), 1);
        Ok(())
    }
}
