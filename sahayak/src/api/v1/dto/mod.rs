//! v1 API Data Transfer Objects.
//!
//! These types define the wire format for the v1 REST API. They are separate
//! from the internal domain models in `src/models/` and handle serialization,
//! deserialization, and request validation.

pub mod advisory;
pub mod auth;
pub mod diagnosis;
pub mod market;
pub mod reports;
pub mod soil;
pub mod weather;

// Re-export all public types for convenient access via `dto::*`.
pub use advisory::*;
pub use auth::*;
pub use diagnosis::*;
pub use market::*;
pub use reports::*;
pub use soil::*;
pub use weather::*;
