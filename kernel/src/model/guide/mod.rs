use crate::model::id::GuideId;
pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guide {
    pub guide_id: GuideId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub bio: String,
}

/// A guide as listed on a trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripGuide {
    pub guide_id: GuideId,
    pub first_name: String,
    pub last_name: String,
}
