use crate::model::id::DestinationId;
pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub destination_id: DestinationId,
    pub name: String,
    pub country: String,
    pub description: String,
    pub image_url: Option<String>,
}
