//! Floor scheduling types shared between the engine and its consumers
//!
//! - **event**: immutable floor events broadcast after every scheduler mutation
//! - **request**: validated request payloads entering the scheduler

pub mod event;
pub mod request;

pub use event::{FloorEvent, FloorEventPayload, FloorEventType};
pub use request::{ReservationRequest, WalkInRequest};
