use chrono::NaiveDate;
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{DestinationId, GuideId, TripId},
    list::{ListOptions, PaginatedList},
    permission::Caller,
    trip::{
        event::{AssignGuides, CreateTrip, UpdateTrip},
        ensure_valid_price, Trip, TripDestination, TripListOptions, MAX_PARTICIPANTS,
    },
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

use super::guide::TripGuideResponse;

const DEFAULT_LIMIT: i64 = 20;
const fn default_limit() -> i64 {
    DEFAULT_LIMIT
}
const fn default_page() -> i64 {
    1
}
const MAX_PAGE: i64 = 100_000;

fn storable_price(value: &Decimal, _: &()) -> garde::Result {
    ensure_valid_price(*value).map_err(|e| garde::Error::new(e.to_string()))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TripListQuery {
    #[garde(skip)]
    pub destination: Option<DestinationId>,
    #[garde(range(min = 1, max = 100))]
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[garde(range(min = 0))]
    #[serde(default)]
    pub offset: i64,
}

impl From<TripListQuery> for TripListOptions {
    fn from(value: TripListQuery) -> Self {
        let TripListQuery {
            destination,
            limit,
            offset,
        } = value;
        Self {
            destination_id: destination,
            limit,
            offset,
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TripSearchQuery {
    #[garde(length(max = 255))]
    pub name: Option<String>,
    #[garde(length(max = 255))]
    pub description: Option<String>,
    #[garde(range(min = 1, max = MAX_PAGE))]
    #[serde(default = "default_page")]
    pub page: i64,
    #[garde(range(min = 1, max = 100))]
    #[serde(default = "default_limit")]
    pub count: i64,
}

impl From<TripSearchQuery> for TripListOptions {
    fn from(value: TripSearchQuery) -> Self {
        let TripSearchQuery {
            name,
            description,
            page,
            count,
        } = value;
        // Blank search terms match everything.
        let non_blank = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
        Self {
            name: non_blank(name),
            description: non_blank(description),
            ..TripListOptions::paged(ListOptions::from_page(page, count))
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertTripRequest {
    #[garde(length(min = 1, max = 255))]
    pub name: String,
    #[garde(skip)]
    #[serde(default)]
    pub description: String,
    #[garde(skip)]
    pub start_date: NaiveDate,
    #[garde(skip)]
    pub end_date: NaiveDate,
    #[garde(custom(storable_price))]
    pub price: Decimal,
    #[garde(range(min = 1, max = MAX_PARTICIPANTS))]
    pub max_participants: i32,
    #[garde(skip)]
    pub destination_id: DestinationId,
    #[garde(url)]
    pub image_url: Option<String>,
}

impl UpsertTripRequest {
    /// Field-level validation plus the date range check that spans two fields.
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        if self.start_date > self.end_date {
            return Err(AppError::UnprocessableEntity(
                "startDate must not be after endDate".into(),
            ));
        }
        Ok(())
    }
}

#[derive(new)]
pub struct CreateTripRequestWithCaller(Caller, UpsertTripRequest);
impl From<CreateTripRequestWithCaller> for CreateTrip {
    fn from(value: CreateTripRequestWithCaller) -> Self {
        let CreateTripRequestWithCaller(
            requested_by,
            UpsertTripRequest {
                name,
                description,
                start_date,
                end_date,
                price,
                max_participants,
                destination_id,
                image_url,
            },
        ) = value;
        CreateTrip::new(
            name,
            description,
            start_date,
            end_date,
            price,
            max_participants,
            destination_id,
            image_url,
            requested_by,
        )
    }
}

#[derive(new)]
pub struct UpdateTripRequestWithIds(TripId, Caller, UpsertTripRequest);
impl From<UpdateTripRequestWithIds> for UpdateTrip {
    fn from(value: UpdateTripRequestWithIds) -> Self {
        let UpdateTripRequestWithIds(
            trip_id,
            requested_by,
            UpsertTripRequest {
                name,
                description,
                start_date,
                end_date,
                price,
                max_participants,
                destination_id,
                image_url,
            },
        ) = value;
        UpdateTrip::new(
            trip_id,
            name,
            description,
            start_date,
            end_date,
            price,
            max_participants,
            destination_id,
            image_url,
            requested_by,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignGuidesRequest {
    pub guide_ids: Vec<GuideId>,
}

#[derive(new)]
pub struct AssignGuidesRequestWithIds(TripId, Caller, AssignGuidesRequest);
impl From<AssignGuidesRequestWithIds> for AssignGuides {
    fn from(value: AssignGuidesRequestWithIds) -> Self {
        let AssignGuidesRequestWithIds(trip_id, requested_by, AssignGuidesRequest { guide_ids }) =
            value;
        AssignGuides::new(trip_id, guide_ids, requested_by)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDestinationResponse {
    pub destination_id: DestinationId,
    pub name: String,
    pub country: String,
}

impl From<TripDestination> for TripDestinationResponse {
    fn from(value: TripDestination) -> Self {
        let TripDestination {
            destination_id,
            name,
            country,
        } = value;
        Self {
            destination_id,
            name,
            country,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    pub trip_id: TripId,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Decimal,
    pub max_participants: i32,
    pub booked_participants: i64,
    pub available_spots: i64,
    pub image_url: Option<String>,
    pub destination: TripDestinationResponse,
    pub guides: Vec<TripGuideResponse>,
}

impl From<Trip> for TripResponse {
    fn from(value: Trip) -> Self {
        let available_spots = value.available_spots();
        let Trip {
            trip_id,
            name,
            description,
            start_date,
            end_date,
            price,
            image_url,
            destination,
            guides,
            capacity,
        } = value;
        Self {
            trip_id,
            name,
            description,
            start_date,
            end_date,
            price,
            max_participants: capacity.max_participants,
            booked_participants: capacity.booked,
            available_spots,
            image_url,
            destination: destination.into(),
            guides: guides.into_iter().map(TripGuideResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedTripResponse {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub items: Vec<TripResponse>,
}

impl From<PaginatedList<Trip>> for PaginatedTripResponse {
    fn from(value: PaginatedList<Trip>) -> Self {
        let PaginatedList {
            total,
            limit,
            offset,
            items,
        } = value;
        Self {
            total,
            limit,
            offset,
            items: items.into_iter().map(TripResponse::from).collect(),
        }
    }
}
