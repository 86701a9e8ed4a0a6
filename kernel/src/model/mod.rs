pub mod activity_log;
pub mod auth;
pub mod destination;
pub mod guide;
pub mod id;
pub mod list;
pub mod permission;
pub mod registration;
pub mod role;
pub mod trip;
pub mod user;
