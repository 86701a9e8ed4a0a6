use crate::model::{id::GuideId, permission::Caller};
use derive_new::new;

#[derive(new)]
pub struct CreateGuide {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub bio: String,
    pub requested_by: Caller,
}

#[derive(new)]
pub struct UpdateGuide {
    pub guide_id: GuideId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub bio: String,
    pub requested_by: Caller,
}

#[derive(new)]
pub struct DeleteGuide {
    pub guide_id: GuideId,
    pub requested_by: Caller,
}
