use crate::model::{
    guide::TripGuide,
    id::{DestinationId, TripId},
    list::ListOptions,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult};

pub mod event;

/// Largest head count a trip can offer, and so the largest single booking.
pub const MAX_PARTICIPANTS: i32 = 10_000;
/// Prices must stay strictly below this amount.
pub const PRICE_CEILING: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Accepts prices that are positive, below `PRICE_CEILING` and carry at most
/// two decimal places, so they are stored without rounding.
pub fn ensure_valid_price(price: Decimal) -> AppResult<()> {
    if price <= Decimal::ZERO || price >= PRICE_CEILING || price.normalize().scale() > 2 {
        return Err(AppError::UnprocessableEntity(
            "price must be between 0.01 and 99999999.99 with at most two decimals".into(),
        ));
    }
    Ok(())
}

pub fn ensure_valid_max_participants(max_participants: i32) -> AppResult<()> {
    if !(1..=MAX_PARTICIPANTS).contains(&max_participants) {
        return Err(AppError::UnprocessableEntity(format!(
            "maximum participants must be between 1 and {MAX_PARTICIPANTS}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub trip_id: TripId,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub destination: TripDestination,
    pub guides: Vec<TripGuide>,
    pub capacity: Capacity,
}

impl Trip {
    pub fn max_participants(&self) -> i32 {
        self.capacity.max_participants
    }

    pub fn available_spots(&self) -> i64 {
        self.capacity.available()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripDestination {
    pub destination_id: DestinationId,
    pub name: String,
    pub country: String,
}

/// Seat accounting for one trip.
///
/// `booked` is always derived from the registration rows that count toward
/// capacity; it is never stored on the trip itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub max_participants: i32,
    pub booked: i64,
}

impl Capacity {
    pub fn new(max_participants: i32, booked: i64) -> Self {
        Self {
            max_participants,
            booked,
        }
    }

    pub fn available(&self) -> i64 {
        i64::from(self.max_participants) - self.booked
    }

    /// Fails with `CapacityExceeded` unless `requested` more participants fit.
    pub fn ensure_room_for(&self, requested: i32) -> AppResult<()> {
        if requested < 1 {
            return Err(AppError::UnprocessableEntity(
                "number of participants must be at least 1".into(),
            ));
        }
        if self.booked + i64::from(requested) > i64::from(self.max_participants) {
            return Err(AppError::CapacityExceeded(format!(
                "only {} spot(s) left, {} requested",
                self.available().max(0),
                requested
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TripListOptions {
    pub destination_id: Option<DestinationId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl TripListOptions {
    pub fn paged(options: ListOptions) -> Self {
        Self {
            limit: options.limit,
            offset: options.offset,
            ..Default::default()
        }
    }
}
