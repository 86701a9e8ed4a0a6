use crate::model::{
    id::TripId,
    list::PaginatedList,
    trip::{
        event::{AssignGuides, CreateTrip, DeleteTrip, UpdateTrip},
        Trip, TripListOptions,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn create(&self, event: CreateTrip) -> AppResult<TripId>;
    /// Lists trips, optionally filtered by destination or by name/description substrings.
    async fn find_all(&self, options: TripListOptions) -> AppResult<PaginatedList<Trip>>;
    async fn find_by_id(&self, trip_id: TripId) -> AppResult<Option<Trip>>;
    async fn update(&self, event: UpdateTrip) -> AppResult<()>;
    /// Fails while any registration references the trip.
    async fn delete(&self, event: DeleteTrip) -> AppResult<()>;
    async fn assign_guides(&self, event: AssignGuides) -> AppResult<()>;
}
