//! Reservation Model

use serde::{Deserialize, Serialize};

/// Lifecycle state of a reservation.
///
/// Created `Pending`; a host confirms it (`Confirmed`) or it is cancelled,
/// either explicitly or by expiry. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    /// Check whether `next` is reachable from this state.
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        matches!(
            (self, next),
            (ReservationStatus::Pending, ReservationStatus::Confirmed)
                | (ReservationStatus::Pending, ReservationStatus::Cancelled)
                | (ReservationStatus::Confirmed, ReservationStatus::Completed)
                | (ReservationStatus::Confirmed, ReservationStatus::Cancelled)
        )
    }

    /// Pending and Confirmed reservations hold their time window.
    pub fn is_active(self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }

    /// No transition leaves a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, ReservationStatus::Completed | ReservationStatus::Cancelled)
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReservationStatus::Pending => write!(f, "PENDING"),
            ReservationStatus::Confirmed => write!(f, "CONFIRMED"),
            ReservationStatus::Completed => write!(f, "COMPLETED"),
            ReservationStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Reservation entity - a time-boxed claim on a table for a party
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub table_id: i64,
    /// Opaque client reference owned by the customer module
    pub client_id: i64,
    pub party_size: u32,
    /// Window start, Unix millis
    pub start_time: i64,
    pub duration_minutes: u32,
    pub status: ReservationStatus,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Reservation {
    /// Window end (exclusive), Unix millis. A reservation ending exactly
    /// when another starts does not conflict with it.
    pub fn end_time(&self) -> i64 {
        self.start_time + crate::util::minutes_to_millis(self.duration_minutes)
    }
}
