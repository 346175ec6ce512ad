//! Time-window conflict detection
//!
//! Pure functions over half-open `[start, end)` windows in Unix millis.
//! Zero-length and negative windows are rejected at construction and never
//! reach the overlap test.

use serde::{Deserialize, Serialize};
use shared::models::Reservation;
use thiserror::Error;

/// Half-open time window `[start, end)`, Unix millis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

/// Rejected window shape (`end <= start`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid time window: start={start}, end={end}")]
pub struct InvalidWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    /// Build a window, rejecting zero-length and negative durations
    pub fn new(start: i64, end: i64) -> Result<Self, InvalidWindow> {
        if end <= start {
            return Err(InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window starting at `start` and lasting `minutes`
    pub fn starting_at(start: i64, minutes: u32) -> Result<Self, InvalidWindow> {
        Self::new(start, start + shared::util::minutes_to_millis(minutes))
    }

    pub fn duration_millis(&self) -> i64 {
        self.end - self.start
    }

    pub fn contains(&self, instant: i64) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// The time window a reservation claims
pub fn window_of(reservation: &Reservation) -> TimeWindow {
    TimeWindow {
        start: reservation.start_time,
        end: reservation.end_time(),
    }
}

/// Half-open interval overlap: `start_A < end_B && start_B < end_A`.
///
/// Touching endpoints do not conflict, enabling back-to-back bookings.
pub fn overlaps(a: TimeWindow, b: TimeWindow) -> bool {
    a.start < b.end && b.start < a.end
}

/// First active reservation whose window overlaps `window`, if any
pub fn conflicting_reservation<'a>(
    window: TimeWindow,
    reservations: &'a [Reservation],
) -> Option<&'a Reservation> {
    reservations
        .iter()
        .find(|r| r.status.is_active() && overlaps(window, window_of(r)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ReservationStatus;

    fn win(start: i64, end: i64) -> TimeWindow {
        TimeWindow::new(start, end).unwrap()
    }

    #[test]
    fn rejects_zero_and_negative_windows() {
        assert!(TimeWindow::new(100, 100).is_err());
        assert!(TimeWindow::new(100, 50).is_err());
        assert!(TimeWindow::new(100, 101).is_ok());
    }

    #[test]
    fn overlapping_windows_conflict() {
        assert!(overlaps(win(0, 100), win(50, 150)));
        assert!(overlaps(win(50, 150), win(0, 100)));
        // Containment
        assert!(overlaps(win(0, 100), win(25, 75)));
        // Identical
        assert!(overlaps(win(0, 100), win(0, 100)));
    }

    #[test]
    fn adjacent_windows_do_not_conflict() {
        assert!(!overlaps(win(0, 100), win(100, 200)));
        assert!(!overlaps(win(100, 200), win(0, 100)));
    }

    #[test]
    fn disjoint_windows_do_not_conflict() {
        assert!(!overlaps(win(0, 100), win(200, 300)));
    }

    fn reservation(id: i64, start: i64, minutes: u32, status: ReservationStatus) -> Reservation {
        Reservation {
            id,
            table_id: 1,
            client_id: 1,
            party_size: 2,
            start_time: start,
            duration_minutes: minutes,
            status,
            created_at: 0,
            notes: None,
        }
    }

    #[test]
    fn terminal_reservations_are_ignored() {
        let reservations = vec![
            reservation(1, 0, 60, ReservationStatus::Cancelled),
            reservation(2, 0, 60, ReservationStatus::Completed),
        ];
        assert!(conflicting_reservation(win(0, 60_000), &reservations).is_none());
    }

    #[test]
    fn active_reservation_conflicts() {
        let reservations = vec![
            reservation(1, 0, 60, ReservationStatus::Cancelled),
            reservation(2, 30 * 60_000, 60, ReservationStatus::Pending),
        ];
        let hit = conflicting_reservation(win(0, 60 * 60_000), &reservations).unwrap();
        assert_eq!(hit.id, 2);
    }
}
