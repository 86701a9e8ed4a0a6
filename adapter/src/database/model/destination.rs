use kernel::model::{destination::Destination, id::DestinationId};

#[derive(sqlx::FromRow)]
pub struct DestinationRow {
    pub destination_id: DestinationId,
    pub name: String,
    pub country: String,
    pub description: String,
    pub image_url: Option<String>,
}

impl From<DestinationRow> for Destination {
    fn from(value: DestinationRow) -> Self {
        let DestinationRow {
            destination_id,
            name,
            country,
            description,
            image_url,
        } = value;
        Destination {
            destination_id,
            name,
            country,
            description,
            image_url,
        }
    }
}
