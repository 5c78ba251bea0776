//! Services layer - Business logic
//!
//! This module contains the business logic services of the forum service.
//! Services are responsible for:
//! - Coordinating repository calls
//! - Turning repository failures into typed errors

pub mod status;

pub use status::{StatusService, StatusServiceError};
