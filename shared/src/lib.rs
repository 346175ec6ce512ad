//! Shared types for the Mesa floor-scheduling framework
//!
//! Common types used across the engine and any transport wrapper:
//! domain models, floor events, request payloads, error types, and
//! utility functions.

pub mod error;
pub mod floor;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Floor re-exports (for convenient access)
pub use floor::{FloorEvent, FloorEventPayload, FloorEventType};
