//! Request payloads entering the scheduler
//!
//! Static bounds are declared with `validator`; policy-dependent bounds
//! (duration limits, advance-booking window) are checked by the scheduler
//! against its configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Maximum length for reservation notes
pub const MAX_NOTE_LEN: usize = 500;

/// Reservation request as received from the booking surface
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReservationRequest {
    pub table_id: i64,
    /// Opaque client id supplied by the customer module
    pub client_id: i64,
    #[validate(range(min = 1))]
    pub party_size: u32,
    /// Window start, Unix millis
    pub start_time: i64,
    #[validate(range(min = 1))]
    pub duration_minutes: u32,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Walk-in seating request from the order module
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WalkInRequest {
    pub table_id: i64,
    #[validate(range(min = 1))]
    pub party_size: u32,
    /// Estimated occupancy, used to conflict-check against upcoming
    /// reservations before seating
    #[validate(range(min = 1))]
    pub estimated_minutes: u32,
}
