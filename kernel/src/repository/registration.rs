use crate::model::{
    id::{RegistrationId, TripId, UserId},
    registration::{
        event::{
            CreateRegistration, DeleteRegistration, UpdateRegistration, UpdateRegistrationStatus,
        },
        Registration,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

/// Owner of the capacity invariant: booked participants of a trip never exceed
/// its maximum. Every write runs as one transaction holding the trip row lock.
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    async fn create(&self, event: CreateRegistration) -> AppResult<Registration>;
    /// Re-checks capacity without the registration's own participants.
    async fn update(&self, event: UpdateRegistration) -> AppResult<Registration>;
    async fn update_status(&self, event: UpdateRegistrationStatus) -> AppResult<()>;
    async fn delete(&self, event: DeleteRegistration) -> AppResult<()>;
    async fn find_by_id(&self, registration_id: RegistrationId)
        -> AppResult<Option<Registration>>;
    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Registration>>;
    async fn find_by_trip_id(&self, trip_id: TripId) -> AppResult<Vec<Registration>>;
    async fn find_all(&self) -> AppResult<Vec<Registration>>;
}
