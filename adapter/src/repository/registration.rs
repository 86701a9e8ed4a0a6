use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{RegistrationId, TripId, UserId},
    permission::{Caller, Permission},
    registration::{
        event::{
            CreateRegistration, DeleteRegistration, UpdateRegistration, UpdateRegistrationStatus,
        },
        total_price, Registration, RegistrationStatus,
    },
};
use kernel::repository::registration::RegistrationRepository;
use shared::error::{AppError, AppResult};
use sqlx::{Postgres, Transaction};

use crate::database::{
    model::registration::{RegistrationRow, RegistrationStateRow},
    ConnectionPool,
};
use crate::repository::trip::{booked_participants, capacity_of, lock_trip};

const REGISTRATION_SELECT: &str = r#"
    SELECT
        r.registration_id,
        r.trip_id,
        t.name AS trip_name,
        t.start_date,
        t.end_date,
        r.user_id,
        u.user_name,
        r.number_of_participants,
        r.total_price,
        r.status,
        r.registration_date
    FROM trip_registrations AS r
    INNER JOIN trips AS t USING(trip_id)
    INNER JOIN users AS u USING(user_id)
"#;

#[derive(new)]
pub struct RegistrationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl RegistrationRepository for RegistrationRepositoryImpl {
    async fn create(&self, event: CreateRegistration) -> AppResult<Registration> {
        event
            .requested_by
            .authorize(Permission::ActFor(event.user_id))?;

        let mut tx = self.db.begin().await?;

        // Every booking for the same trip queues up behind this lock, so the
        // sum read below stays accurate until commit.
        let trip = lock_trip(&mut tx, event.trip_id).await?;
        ensure_user_exists(&mut tx, event.user_id).await?;

        let booked = booked_participants(&mut tx, trip.trip_id).await?;
        capacity_of(&trip, booked).ensure_room_for(event.number_of_participants)?;

        let registration_id: RegistrationId = sqlx::query_scalar(
            r#"
                INSERT INTO trip_registrations
                (trip_id, user_id, number_of_participants, total_price, status)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING registration_id
            "#,
        )
        .bind(trip.trip_id)
        .bind(event.user_id)
        .bind(event.number_of_participants)
        .bind(total_price(trip.price, event.number_of_participants))
        .bind(RegistrationStatus::Pending.as_ref())
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        tracing::info!(
            %registration_id,
            trip_id = %trip.trip_id,
            participants = event.number_of_participants,
            "registration created"
        );

        self.fetch(registration_id).await
    }

    async fn update(&self, event: UpdateRegistration) -> AppResult<Registration> {
        self.change(
            event.registration_id,
            Some(event.number_of_participants),
            event.status,
            event.requested_by,
        )
        .await?;
        self.fetch(event.registration_id).await
    }

    async fn update_status(&self, event: UpdateRegistrationStatus) -> AppResult<()> {
        self.change(
            event.registration_id,
            None,
            event.status,
            event.requested_by,
        )
        .await
    }

    async fn delete(&self, event: DeleteRegistration) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let state = lock_registration(&mut tx, event.registration_id).await?;
        event
            .requested_by
            .authorize(Permission::ActFor(state.user_id))?;

        sqlx::query("DELETE FROM trip_registrations WHERE registration_id = $1")
            .bind(state.registration_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        registration_id: RegistrationId,
    ) -> AppResult<Option<Registration>> {
        sqlx::query_as::<_, RegistrationRow>(&format!(
            "{REGISTRATION_SELECT} WHERE r.registration_id = $1"
        ))
        .bind(registration_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(Registration::try_from)
        .transpose()
    }

    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Registration>> {
        sqlx::query_as::<_, RegistrationRow>(&format!(
            "{REGISTRATION_SELECT} WHERE r.user_id = $1 ORDER BY r.registration_date DESC"
        ))
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Registration::try_from)
        .collect()
    }

    async fn find_by_trip_id(&self, trip_id: TripId) -> AppResult<Vec<Registration>> {
        sqlx::query_as::<_, RegistrationRow>(&format!(
            "{REGISTRATION_SELECT} WHERE r.trip_id = $1 ORDER BY r.registration_date DESC"
        ))
        .bind(trip_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Registration::try_from)
        .collect()
    }

    async fn find_all(&self) -> AppResult<Vec<Registration>> {
        sqlx::query_as::<_, RegistrationRow>(&format!(
            "{REGISTRATION_SELECT} ORDER BY r.registration_date DESC"
        ))
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Registration::try_from)
        .collect()
    }
}

impl RegistrationRepositoryImpl {
    async fn fetch(&self, registration_id: RegistrationId) -> AppResult<Registration> {
        self.find_by_id(registration_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound("specified registration not found".into()))
    }

    /// Applies a participant count and/or status change under the trip lock.
    /// `participants` of `None` keeps the current count.
    async fn change(
        &self,
        registration_id: RegistrationId,
        participants: Option<i32>,
        status: RegistrationStatus,
        requested_by: Caller,
    ) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // The trip is locked before the registration, the same order create uses.
        let trip_id: TripId = sqlx::query_scalar(
            "SELECT trip_id FROM trip_registrations WHERE registration_id = $1",
        )
        .bind(registration_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound("specified registration not found".into()))?;
        let trip = lock_trip(&mut tx, trip_id).await?;
        let state = lock_registration(&mut tx, registration_id).await?;

        requested_by.authorize(Permission::ActFor(state.user_id))?;

        let current = state.status()?;
        current.ensure_transition_to(status)?;

        let participants = participants.unwrap_or(state.number_of_participants);
        // A status-only change keeps the seats it already holds.
        let seats_change = participants != state.number_of_participants
            || !current.counts_toward_capacity();
        if status.counts_toward_capacity() && seats_change {
            let booked = booked_participants(&mut tx, trip.trip_id).await?;
            let own = if current.counts_toward_capacity() {
                i64::from(state.number_of_participants)
            } else {
                0
            };
            capacity_of(&trip, booked - own).ensure_room_for(participants)?;
        } else if participants < 1 {
            return Err(AppError::UnprocessableEntity(
                "number of participants must be at least 1".into(),
            ));
        }

        // The price is only recomputed when the head count changes.
        sqlx::query(
            r#"
                UPDATE trip_registrations
                SET total_price = CASE WHEN number_of_participants <> $1 THEN $2 ELSE total_price END,
                    number_of_participants = $1,
                    status = $3
                WHERE registration_id = $4
            "#,
        )
        .bind(participants)
        .bind(total_price(trip.price, participants))
        .bind(status.as_ref())
        .bind(state.registration_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        tracing::info!(
            %registration_id,
            from = %current,
            to = %status,
            participants,
            "registration changed"
        );

        Ok(())
    }
}

async fn lock_registration(
    tx: &mut Transaction<'_, Postgres>,
    registration_id: RegistrationId,
) -> AppResult<RegistrationStateRow> {
    sqlx::query_as::<_, RegistrationStateRow>(
        r#"
            SELECT registration_id, trip_id, user_id, number_of_participants, status
            FROM trip_registrations
            WHERE registration_id = $1
            FOR UPDATE
        "#,
    )
    .bind(registration_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(AppError::SpecificOperationError)?
    .ok_or_else(|| AppError::EntityNotFound("specified registration not found".into()))
}

async fn ensure_user_exists(tx: &mut Transaction<'_, Postgres>, user_id: UserId) -> AppResult<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)")
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
    if !exists {
        return Err(AppError::EntityNotFound("specified user not found".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::trip::TripRepositoryImpl;
    use kernel::model::role::Role;
    use kernel::repository::trip::TripRepository;
    use rust_decimal::Decimal;
    use std::{str::FromStr, sync::Arc};
    use tokio::task::JoinSet;

    const AUTUMN: &str = "f47ac10b-58cc-4372-a567-0e02b2c3d479";
    const ALICE: &str = "5b4c96ac-316a-4bee-8e69-cac5eb84ff4c";
    const BOB: &str = "050afe56-c3da-4448-8e4d-6f44007d2ca5";

    fn user(id: &str) -> (UserId, Caller) {
        let user_id = UserId::from_str(id).unwrap();
        (user_id, Caller::new(user_id, Role::User))
    }

    fn autumn() -> TripId {
        TripId::from_str(AUTUMN).unwrap()
    }

    async fn available_spots(pool: &sqlx::PgPool) -> i64 {
        TripRepositoryImpl::new(ConnectionPool::new(pool.clone()))
            .find_by_id(autumn())
            .await
            .unwrap()
            .unwrap()
            .available_spots()
    }

    #[sqlx::test(fixtures("common", "trip"))]
    async fn books_within_capacity_and_prices_the_booking(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = RegistrationRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let (alice, caller) = user(ALICE);

        let registration = repo
            .create(CreateRegistration::new(autumn(), alice, 3, caller))
            .await?;

        assert_eq!(registration.status, RegistrationStatus::Pending);
        assert_eq!(registration.number_of_participants, 3);
        assert_eq!(registration.total_price, Decimal::new(59850, 2));
        assert_eq!(registration.user.user_name, "alice");
        assert_eq!(registration.trip.name, "Autumn in Kyoto");
        assert_eq!(available_spots(&pool).await, 2);
        Ok(())
    }

    #[sqlx::test(fixtures("common", "trip"))]
    async fn rejected_booking_leaves_no_trace(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = RegistrationRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let (alice, alice_caller) = user(ALICE);
        let (bob, bob_caller) = user(BOB);

        repo.create(CreateRegistration::new(autumn(), alice, 3, alice_caller))
            .await?;
        let res = repo
            .create(CreateRegistration::new(autumn(), bob, 3, bob_caller))
            .await;

        assert!(matches!(res, Err(AppError::CapacityExceeded(_))));
        assert!(repo.find_by_user_id(bob).await?.is_empty());
        assert_eq!(available_spots(&pool).await, 2);

        repo.create(CreateRegistration::new(autumn(), bob, 2, bob_caller))
            .await?;
        assert_eq!(available_spots(&pool).await, 0);
        Ok(())
    }

    #[sqlx::test(fixtures("common", "trip"))]
    async fn rejects_missing_trip_and_bad_counts(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = RegistrationRepositoryImpl::new(ConnectionPool::new(pool));
        let (alice, caller) = user(ALICE);

        let missing = repo
            .create(CreateRegistration::new(TripId::new(), alice, 1, caller))
            .await;
        assert!(matches!(missing, Err(AppError::EntityNotFound(_))));

        let zero = repo
            .create(CreateRegistration::new(autumn(), alice, 0, caller))
            .await;
        assert!(matches!(zero, Err(AppError::UnprocessableEntity(_))));
        Ok(())
    }

    #[sqlx::test(fixtures("common", "trip"))]
    async fn users_book_only_for_themselves(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = RegistrationRepositoryImpl::new(ConnectionPool::new(pool));
        let (_, alice_caller) = user(ALICE);
        let (bob, _) = user(BOB);

        let res = repo
            .create(CreateRegistration::new(autumn(), bob, 1, alice_caller))
            .await;
        assert!(matches!(res, Err(AppError::ForbiddenOperation)));

        let admin = Caller::new(UserId::new(), Role::Admin);
        let registration = repo
            .create(CreateRegistration::new(autumn(), bob, 1, admin))
            .await?;
        assert_eq!(registration.user.user_id, bob);
        Ok(())
    }

    #[sqlx::test(fixtures("common", "trip"))]
    async fn update_excludes_its_own_participants(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = RegistrationRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let (alice, caller) = user(ALICE);

        let registration = repo
            .create(CreateRegistration::new(autumn(), alice, 3, caller))
            .await?;
        let id = registration.registration_id;

        let grown = repo
            .update(UpdateRegistration::new(
                id,
                5,
                RegistrationStatus::Confirmed,
                caller,
            ))
            .await?;
        assert_eq!(grown.number_of_participants, 5);
        assert_eq!(grown.status, RegistrationStatus::Confirmed);
        assert_eq!(grown.total_price, Decimal::new(99750, 2));

        let too_many = repo
            .update(UpdateRegistration::new(
                id,
                6,
                RegistrationStatus::Confirmed,
                caller,
            ))
            .await;
        assert!(matches!(too_many, Err(AppError::CapacityExceeded(_))));
        assert_eq!(available_spots(&pool).await, 0);
        Ok(())
    }

    #[sqlx::test(fixtures("common", "trip"))]
    async fn status_changes_on_a_full_trip_skip_the_capacity_check(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = RegistrationRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let (alice, alice_caller) = user(ALICE);
        let (bob, bob_caller) = user(BOB);

        let alices = repo
            .create(CreateRegistration::new(autumn(), alice, 3, alice_caller))
            .await?;
        let bobs = repo
            .create(CreateRegistration::new(autumn(), bob, 2, bob_caller))
            .await?;
        assert_eq!(available_spots(&pool).await, 0);

        repo.update_status(UpdateRegistrationStatus::new(
            alices.registration_id,
            RegistrationStatus::Confirmed,
            alice_caller,
        ))
        .await?;

        let confirmed = repo
            .update(UpdateRegistration::new(
                bobs.registration_id,
                2,
                RegistrationStatus::Confirmed,
                bob_caller,
            ))
            .await?;
        assert_eq!(confirmed.status, RegistrationStatus::Confirmed);
        assert_eq!(confirmed.total_price, bobs.total_price);

        let alices = repo.find_by_id(alices.registration_id).await?.unwrap();
        assert_eq!(alices.status, RegistrationStatus::Confirmed);
        assert_eq!(available_spots(&pool).await, 0);
        Ok(())
    }

    #[sqlx::test(fixtures("common", "trip"))]
    async fn cancelling_releases_spots_for_good(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = RegistrationRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let (alice, caller) = user(ALICE);

        let registration = repo
            .create(CreateRegistration::new(autumn(), alice, 5, caller))
            .await?;
        let id = registration.registration_id;
        assert_eq!(available_spots(&pool).await, 0);

        repo.update_status(UpdateRegistrationStatus::new(
            id,
            RegistrationStatus::Cancelled,
            caller,
        ))
        .await?;
        assert_eq!(available_spots(&pool).await, 5);

        let revived = repo
            .update_status(UpdateRegistrationStatus::new(
                id,
                RegistrationStatus::Confirmed,
                caller,
            ))
            .await;
        assert!(matches!(revived, Err(AppError::UnprocessableEntity(_))));
        Ok(())
    }

    #[sqlx::test(fixtures("common", "trip"))]
    async fn only_the_owner_changes_a_registration(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = RegistrationRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let (alice, alice_caller) = user(ALICE);
        let (_, bob_caller) = user(BOB);

        let registration = repo
            .create(CreateRegistration::new(autumn(), alice, 2, alice_caller))
            .await?;
        let id = registration.registration_id;

        let res = repo
            .delete(DeleteRegistration::new(id, bob_caller))
            .await;
        assert!(matches!(res, Err(AppError::ForbiddenOperation)));

        repo.delete(DeleteRegistration::new(id, alice_caller))
            .await?;
        assert!(repo.find_by_id(id).await?.is_none());
        assert_eq!(available_spots(&pool).await, 5);
        Ok(())
    }

    #[sqlx::test(fixtures("common", "trip"))]
    async fn concurrent_bookings_never_oversell(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = Arc::new(RegistrationRepositoryImpl::new(ConnectionPool::new(
            pool.clone(),
        )));
        let (alice, caller) = user(ALICE);

        let mut set = JoinSet::new();
        for _ in 0..8 {
            let repo = repo.clone();
            set.spawn(async move {
                repo.create(CreateRegistration::new(autumn(), alice, 1, caller))
                    .await
            });
        }

        let mut succeeded = 0;
        while let Some(res) = set.join_next().await {
            match res? {
                Ok(_) => succeeded += 1,
                Err(AppError::CapacityExceeded(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        assert_eq!(succeeded, 5);
        assert_eq!(available_spots(&pool).await, 0);
        assert_eq!(repo.find_by_trip_id(autumn()).await?.len(), 5);
        Ok(())
    }
}
