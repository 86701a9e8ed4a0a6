use kernel::model::{
    guide::{Guide, TripGuide},
    id::{GuideId, TripId},
};

#[derive(sqlx::FromRow)]
pub struct GuideRow {
    pub guide_id: GuideId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub bio: String,
}

impl From<GuideRow> for Guide {
    fn from(value: GuideRow) -> Self {
        let GuideRow {
            guide_id,
            first_name,
            last_name,
            email,
            phone_number,
            bio,
        } = value;
        Guide {
            guide_id,
            first_name,
            last_name,
            email,
            phone_number,
            bio,
        }
    }
}

// A guide assignment joined with the guide's name.
#[derive(sqlx::FromRow)]
pub struct TripGuideRow {
    pub trip_id: TripId,
    pub guide_id: GuideId,
    pub first_name: String,
    pub last_name: String,
}

impl From<TripGuideRow> for TripGuide {
    fn from(value: TripGuideRow) -> Self {
        let TripGuideRow {
            trip_id: _,
            guide_id,
            first_name,
            last_name,
        } = value;
        TripGuide {
            guide_id,
            first_name,
            last_name,
        }
    }
}
