use chrono::{DateTime, NaiveDate, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{RegistrationId, TripId, UserId},
    permission::Caller,
    registration::{
        event::{CreateRegistration, UpdateRegistration, UpdateRegistrationStatus},
        Registration, RegistrationStatus, RegistrationTrip,
    },
    trip::MAX_PARTICIPANTS,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::user::RegistrationUserResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationStatusName {
    Pending,
    Confirmed,
    Cancelled,
}

impl From<RegistrationStatus> for RegistrationStatusName {
    fn from(value: RegistrationStatus) -> Self {
        match value {
            RegistrationStatus::Pending => Self::Pending,
            RegistrationStatus::Confirmed => Self::Confirmed,
            RegistrationStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<RegistrationStatusName> for RegistrationStatus {
    fn from(value: RegistrationStatusName) -> Self {
        match value {
            RegistrationStatusName::Pending => Self::Pending,
            RegistrationStatusName::Confirmed => Self::Confirmed,
            RegistrationStatusName::Cancelled => Self::Cancelled,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegistrationRequest {
    #[garde(skip)]
    pub trip_id: TripId,
    /// Only admins may book on behalf of someone else.
    #[garde(skip)]
    pub user_id: Option<UserId>,
    #[garde(range(min = 1, max = MAX_PARTICIPANTS))]
    pub number_of_participants: i32,
}

#[derive(new)]
pub struct CreateRegistrationRequestWithCaller(Caller, CreateRegistrationRequest);
impl From<CreateRegistrationRequestWithCaller> for CreateRegistration {
    fn from(value: CreateRegistrationRequestWithCaller) -> Self {
        let CreateRegistrationRequestWithCaller(
            requested_by,
            CreateRegistrationRequest {
                trip_id,
                user_id,
                number_of_participants,
            },
        ) = value;
        CreateRegistration::new(
            trip_id,
            user_id.unwrap_or(requested_by.user_id),
            number_of_participants,
            requested_by,
        )
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegistrationRequest {
    #[garde(range(min = 1, max = MAX_PARTICIPANTS))]
    pub number_of_participants: i32,
    #[garde(skip)]
    pub status: RegistrationStatusName,
}

#[derive(new)]
pub struct UpdateRegistrationRequestWithIds(RegistrationId, Caller, UpdateRegistrationRequest);
impl From<UpdateRegistrationRequestWithIds> for UpdateRegistration {
    fn from(value: UpdateRegistrationRequestWithIds) -> Self {
        let UpdateRegistrationRequestWithIds(
            registration_id,
            requested_by,
            UpdateRegistrationRequest {
                number_of_participants,
                status,
            },
        ) = value;
        UpdateRegistration::new(
            registration_id,
            number_of_participants,
            status.into(),
            requested_by,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateRegistrationStatusRequest {
    pub status: RegistrationStatusName,
}

#[derive(new)]
pub struct UpdateRegistrationStatusRequestWithIds(
    RegistrationId,
    Caller,
    UpdateRegistrationStatusRequest,
);
impl From<UpdateRegistrationStatusRequestWithIds> for UpdateRegistrationStatus {
    fn from(value: UpdateRegistrationStatusRequestWithIds) -> Self {
        let UpdateRegistrationStatusRequestWithIds(
            registration_id,
            requested_by,
            UpdateRegistrationStatusRequest { status },
        ) = value;
        UpdateRegistrationStatus::new(registration_id, status.into(), requested_by)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationTripResponse {
    pub trip_id: TripId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<RegistrationTrip> for RegistrationTripResponse {
    fn from(value: RegistrationTrip) -> Self {
        let RegistrationTrip {
            trip_id,
            name,
            start_date,
            end_date,
        } = value;
        Self {
            trip_id,
            name,
            start_date,
            end_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub registration_id: RegistrationId,
    pub trip: RegistrationTripResponse,
    pub user: RegistrationUserResponse,
    pub number_of_participants: i32,
    pub total_price: Decimal,
    pub status: RegistrationStatusName,
    pub registration_date: DateTime<Utc>,
}

impl From<Registration> for RegistrationResponse {
    fn from(value: Registration) -> Self {
        let Registration {
            registration_id,
            trip,
            user,
            number_of_participants,
            total_price,
            status,
            registration_date,
        } = value;
        Self {
            registration_id,
            trip: trip.into(),
            user: user.into(),
            number_of_participants,
            total_price,
            status: status.into(),
            registration_date,
        }
    }
}

#[derive(Serialize)]
pub struct RegistrationsResponse {
    pub items: Vec<RegistrationResponse>,
}

impl From<Vec<Registration>> for RegistrationsResponse {
    fn from(value: Vec<Registration>) -> Self {
        Self {
            items: value.into_iter().map(RegistrationResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::role::Role;
    use rstest::rstest;

    #[test]
    fn booking_defaults_to_the_caller() {
        let caller = Caller::new(UserId::new(), Role::User);
        let req: CreateRegistrationRequest = serde_json::from_value(serde_json::json!({
            "tripId": TripId::new(),
            "numberOfParticipants": 2,
        }))
        .unwrap();

        let event = CreateRegistration::from(CreateRegistrationRequestWithCaller::new(caller, req));
        assert_eq!(event.user_id, caller.user_id);
        assert_eq!(event.number_of_participants, 2);
    }

    #[test]
    fn rejects_unknown_status_names() {
        let res = serde_json::from_str::<UpdateRegistrationStatusRequest>(r#"{"status":"Archived"}"#);
        assert!(res.is_err());
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(MAX_PARTICIPANTS, true)]
    #[case(MAX_PARTICIPANTS + 1, false)]
    #[case(i32::MAX, false)]
    fn bounds_participant_counts(#[case] number_of_participants: i32, #[case] ok: bool) {
        let req = UpdateRegistrationRequest {
            number_of_participants,
            status: RegistrationStatusName::Pending,
        };
        assert_eq!(req.validate().is_ok(), ok);

        let req: CreateRegistrationRequest = serde_json::from_value(serde_json::json!({
            "tripId": TripId::new(),
            "numberOfParticipants": number_of_participants,
        }))
        .unwrap();
        assert_eq!(req.validate().is_ok(), ok);
    }
}
