use kernel::model::{
    id::{RegistrationId, TripId, UserId},
    registration::{Registration, RegistrationStatus, RegistrationTrip},
    user::RegistrationUser,
};
use rust_decimal::Decimal;
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, NaiveDate, Utc};
use std::str::FromStr;

#[derive(sqlx::FromRow)]
pub struct RegistrationRow {
    pub registration_id: RegistrationId,
    pub trip_id: TripId,
    pub trip_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub user_id: UserId,
    pub user_name: String,
    pub number_of_participants: i32,
    pub total_price: Decimal,
    pub status: String,
    pub registration_date: DateTime<Utc>,
}

impl TryFrom<RegistrationRow> for Registration {
    type Error = AppError;

    fn try_from(value: RegistrationRow) -> Result<Self, Self::Error> {
        let RegistrationRow {
            registration_id,
            trip_id,
            trip_name,
            start_date,
            end_date,
            user_id,
            user_name,
            number_of_participants,
            total_price,
            status,
            registration_date,
        } = value;
        Ok(Registration {
            registration_id,
            trip: RegistrationTrip {
                trip_id,
                name: trip_name,
                start_date,
                end_date,
            },
            user: RegistrationUser { user_id, user_name },
            number_of_participants,
            total_price,
            status: parse_status(&status)?,
            registration_date,
        })
    }
}

// The row as read under lock before it is modified.
#[derive(sqlx::FromRow)]
pub struct RegistrationStateRow {
    pub registration_id: RegistrationId,
    pub trip_id: TripId,
    pub user_id: UserId,
    pub number_of_participants: i32,
    pub status: String,
}

impl RegistrationStateRow {
    pub fn status(&self) -> Result<RegistrationStatus, AppError> {
        parse_status(&self.status)
    }
}

fn parse_status(status: &str) -> Result<RegistrationStatus, AppError> {
    RegistrationStatus::from_str(status)
        .map_err(|e| AppError::ConversionEntityError(format!("status {status}: {e}")))
}
