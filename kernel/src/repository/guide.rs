use crate::model::{
    guide::{
        event::{CreateGuide, DeleteGuide, UpdateGuide},
        Guide,
    },
    id::GuideId,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait GuideRepository: Send + Sync {
    async fn create(&self, event: CreateGuide) -> AppResult<GuideId>;
    async fn find_all(&self) -> AppResult<Vec<Guide>>;
    async fn find_by_id(&self, guide_id: GuideId) -> AppResult<Option<Guide>>;
    async fn update(&self, event: UpdateGuide) -> AppResult<()>;
    async fn delete(&self, event: DeleteGuide) -> AppResult<()>;
}
