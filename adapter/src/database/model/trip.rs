use kernel::model::{
    guide::TripGuide,
    id::{DestinationId, TripId},
    trip::{Capacity, Trip, TripDestination},
};
use rust_decimal::Decimal;
use sqlx::types::chrono::NaiveDate;

#[derive(sqlx::FromRow)]
pub struct TripRow {
    pub trip_id: TripId,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Decimal,
    pub max_participants: i32,
    pub image_url: Option<String>,
    pub destination_id: DestinationId,
    pub destination_name: String,
    pub destination_country: String,
    pub booked_participants: i64,
}

impl TripRow {
    // Guides live in a separate table, so they are attached after the fact.
    pub fn into_trip(self, guides: Vec<TripGuide>) -> Trip {
        let TripRow {
            trip_id,
            name,
            description,
            start_date,
            end_date,
            price,
            max_participants,
            image_url,
            destination_id,
            destination_name,
            destination_country,
            booked_participants,
        } = self;
        Trip {
            trip_id,
            name,
            description,
            start_date,
            end_date,
            price,
            image_url,
            destination: TripDestination {
                destination_id,
                name: destination_name,
                country: destination_country,
            },
            guides,
            capacity: Capacity::new(max_participants, booked_participants),
        }
    }
}

// The locked part of a trip that capacity checks need.
#[derive(sqlx::FromRow)]
pub struct TripCapacityRow {
    pub trip_id: TripId,
    pub price: Decimal,
    pub max_participants: i32,
}
