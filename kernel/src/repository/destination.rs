use crate::model::{
    destination::{
        event::{CreateDestination, DeleteDestination, UpdateDestination},
        Destination,
    },
    id::DestinationId,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait DestinationRepository: Send + Sync {
    async fn create(&self, event: CreateDestination) -> AppResult<DestinationId>;
    async fn find_all(&self) -> AppResult<Vec<Destination>>;
    async fn find_by_id(&self, destination_id: DestinationId) -> AppResult<Option<Destination>>;
    async fn update(&self, event: UpdateDestination) -> AppResult<()>;
    async fn delete(&self, event: DeleteDestination) -> AppResult<()>;
}
