pub mod activity_log;
pub mod auth;
pub mod destination;
pub mod guide;
pub mod health;
pub mod registration;
pub mod trip;
pub mod user;
pub mod v1;
