use crate::model::{
    id::{RegistrationId, TripId, UserId},
    permission::Caller,
    registration::RegistrationStatus,
};
use derive_new::new;

#[derive(new)]
pub struct CreateRegistration {
    pub trip_id: TripId,
    /// The user the booking is made for; differs from the caller only for admins.
    pub user_id: UserId,
    pub number_of_participants: i32,
    pub requested_by: Caller,
}

#[derive(new)]
pub struct UpdateRegistration {
    pub registration_id: RegistrationId,
    pub number_of_participants: i32,
    pub status: RegistrationStatus,
    pub requested_by: Caller,
}

#[derive(new)]
pub struct UpdateRegistrationStatus {
    pub registration_id: RegistrationId,
    pub status: RegistrationStatus,
    pub requested_by: Caller,
}

#[derive(new)]
pub struct DeleteRegistration {
    pub registration_id: RegistrationId,
    pub requested_by: Caller,
}
