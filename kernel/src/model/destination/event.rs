use crate::model::{id::DestinationId, permission::Caller};
use derive_new::new;

#[derive(new)]
pub struct CreateDestination {
    pub name: String,
    pub country: String,
    pub description: String,
    pub image_url: Option<String>,
    pub requested_by: Caller,
}

#[derive(new)]
pub struct UpdateDestination {
    pub destination_id: DestinationId,
    pub name: String,
    pub country: String,
    pub description: String,
    pub image_url: Option<String>,
    pub requested_by: Caller,
}

#[derive(new)]
pub struct DeleteDestination {
    pub destination_id: DestinationId,
    pub requested_by: Caller,
}
