use crate::model::{
    id::{DestinationId, GuideId, TripId},
    permission::Caller,
};
use chrono::NaiveDate;
use derive_new::new;
use rust_decimal::Decimal;

#[derive(new)]
pub struct CreateTrip {
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Decimal,
    pub max_participants: i32,
    pub destination_id: DestinationId,
    pub image_url: Option<String>,
    pub requested_by: Caller,
}

#[derive(new)]
pub struct UpdateTrip {
    pub trip_id: TripId,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Decimal,
    pub max_participants: i32,
    pub destination_id: DestinationId,
    pub image_url: Option<String>,
    pub requested_by: Caller,
}

#[derive(new)]
pub struct DeleteTrip {
    pub trip_id: TripId,
    pub requested_by: Caller,
}

#[derive(new)]
pub struct AssignGuides {
    pub trip_id: TripId,
    pub guide_ids: Vec<GuideId>,
    pub requested_by: Caller,
}
