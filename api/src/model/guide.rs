use derive_new::new;
use garde::Validate;
use kernel::model::{
    guide::{
        event::{CreateGuide, UpdateGuide},
        Guide, TripGuide,
    },
    id::GuideId,
    permission::Caller,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertGuideRequest {
    #[garde(length(min = 1, max = 255))]
    pub first_name: String,
    #[garde(length(min = 1, max = 255))]
    pub last_name: String,
    #[garde(email)]
    pub email: String,
    #[garde(length(max = 32))]
    pub phone_number: Option<String>,
    #[garde(skip)]
    #[serde(default)]
    pub bio: String,
}

#[derive(new)]
pub struct CreateGuideRequestWithCaller(Caller, UpsertGuideRequest);
impl From<CreateGuideRequestWithCaller> for CreateGuide {
    fn from(value: CreateGuideRequestWithCaller) -> Self {
        let CreateGuideRequestWithCaller(
            requested_by,
            UpsertGuideRequest {
                first_name,
                last_name,
                email,
                phone_number,
                bio,
            },
        ) = value;
        CreateGuide::new(first_name, last_name, email, phone_number, bio, requested_by)
    }
}

#[derive(new)]
pub struct UpdateGuideRequestWithIds(GuideId, Caller, UpsertGuideRequest);
impl From<UpdateGuideRequestWithIds> for UpdateGuide {
    fn from(value: UpdateGuideRequestWithIds) -> Self {
        let UpdateGuideRequestWithIds(
            guide_id,
            requested_by,
            UpsertGuideRequest {
                first_name,
                last_name,
                email,
                phone_number,
                bio,
            },
        ) = value;
        UpdateGuide::new(
            guide_id,
            first_name,
            last_name,
            email,
            phone_number,
            bio,
            requested_by,
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideResponse {
    pub guide_id: GuideId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub bio: String,
}

impl From<Guide> for GuideResponse {
    fn from(value: Guide) -> Self {
        let Guide {
            guide_id,
            first_name,
            last_name,
            email,
            phone_number,
            bio,
        } = value;
        Self {
            guide_id,
            first_name,
            last_name,
            email,
            phone_number,
            bio,
        }
    }
}

#[derive(Serialize)]
pub struct GuidesResponse {
    pub items: Vec<GuideResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripGuideResponse {
    pub guide_id: GuideId,
    pub first_name: String,
    pub last_name: String,
}

impl From<TripGuide> for TripGuideResponse {
    fn from(value: TripGuide) -> Self {
        let TripGuide {
            guide_id,
            first_name,
            last_name,
        } = value;
        Self {
            guide_id,
            first_name,
            last_name,
        }
    }
}
