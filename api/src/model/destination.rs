use derive_new::new;
use garde::Validate;
use kernel::model::{
    destination::{
        event::{CreateDestination, UpdateDestination},
        Destination,
    },
    id::DestinationId,
    permission::Caller,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertDestinationRequest {
    #[garde(length(min = 1, max = 255))]
    pub name: String,
    #[garde(length(min = 1, max = 255))]
    pub country: String,
    #[garde(skip)]
    #[serde(default)]
    pub description: String,
    #[garde(url)]
    pub image_url: Option<String>,
}

#[derive(new)]
pub struct CreateDestinationRequestWithCaller(Caller, UpsertDestinationRequest);
impl From<CreateDestinationRequestWithCaller> for CreateDestination {
    fn from(value: CreateDestinationRequestWithCaller) -> Self {
        let CreateDestinationRequestWithCaller(
            requested_by,
            UpsertDestinationRequest {
                name,
                country,
                description,
                image_url,
            },
        ) = value;
        CreateDestination::new(name, country, description, image_url, requested_by)
    }
}

#[derive(new)]
pub struct UpdateDestinationRequestWithIds(DestinationId, Caller, UpsertDestinationRequest);
impl From<UpdateDestinationRequestWithIds> for UpdateDestination {
    fn from(value: UpdateDestinationRequestWithIds) -> Self {
        let UpdateDestinationRequestWithIds(
            destination_id,
            requested_by,
            UpsertDestinationRequest {
                name,
                country,
                description,
                image_url,
            },
        ) = value;
        UpdateDestination::new(
            destination_id,
            name,
            country,
            description,
            image_url,
            requested_by,
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationResponse {
    pub destination_id: DestinationId,
    pub name: String,
    pub country: String,
    pub description: String,
    pub image_url: Option<String>,
}

impl From<Destination> for DestinationResponse {
    fn from(value: Destination) -> Self {
        let Destination {
            destination_id,
            name,
            country,
            description,
            image_url,
        } = value;
        Self {
            destination_id,
            name,
            country,
            description,
            image_url,
        }
    }
}

#[derive(Serialize)]
pub struct DestinationsResponse {
    pub items: Vec<DestinationResponse>,
}
