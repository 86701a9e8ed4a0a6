pub mod database;
pub mod password;
pub mod redis;
pub mod repository;
pub mod token;
