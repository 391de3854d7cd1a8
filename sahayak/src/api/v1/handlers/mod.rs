pub mod advisory;
pub mod auth;
pub mod diagnosis;
pub mod health;
pub mod market;
pub mod reports;
pub mod soil;
pub mod weather;
pub mod whatsapp;

pub use health::health_check;
