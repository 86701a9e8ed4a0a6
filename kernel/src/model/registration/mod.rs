use crate::model::{
    id::{RegistrationId, TripId},
    user::RegistrationUser,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult};
use strum::{AsRefStr, Display, EnumString};

pub mod event;

#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub registration_id: RegistrationId,
    pub trip: RegistrationTrip,
    pub user: RegistrationUser,
    pub number_of_participants: i32,
    pub total_price: Decimal,
    pub status: RegistrationStatus,
    pub registration_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationTrip {
    pub trip_id: TripId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, AsRefStr, Display)]
pub enum RegistrationStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl RegistrationStatus {
    /// Cancelled bookings release their seats.
    pub fn counts_toward_capacity(self) -> bool {
        !matches!(self, RegistrationStatus::Cancelled)
    }

    pub fn can_transition_to(self, next: RegistrationStatus) -> bool {
        use RegistrationStatus::*;
        self == next
            || matches!(
                (self, next),
                (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled)
            )
    }

    pub fn ensure_transition_to(self, next: RegistrationStatus) -> AppResult<()> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(AppError::UnprocessableEntity(format!(
                "registration status cannot change from {self} to {next}"
            )))
        }
    }
}

/// Price of a booking at the moment it is made or changed.
pub fn total_price(unit_price: Decimal, number_of_participants: i32) -> Decimal {
    unit_price * Decimal::from(number_of_participants)
}
