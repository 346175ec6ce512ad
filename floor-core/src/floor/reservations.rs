//! Reservation store - reservation records and time-indexed queries
//!
//! Owns the reservation lifecycle state machine. Like the table registry,
//! write operations take the caller's transaction so the scheduler commits
//! reservation and table-state changes as one unit.

use super::conflict::{overlaps, window_of, TimeWindow};
use super::error::{FloorError, FloorResult};
use super::storage::FloorStorage;
use redb::WriteTransaction;
use shared::floor::ReservationRequest;
use shared::models::{Reservation, ReservationStatus};
use shared::util::{minutes_to_millis, snowflake_id};

#[derive(Clone)]
pub struct ReservationStore {
    storage: FloorStorage,
}

impl ReservationStore {
    pub fn new(storage: FloorStorage) -> Self {
        Self { storage }
    }

    // ========== Queries ==========

    pub fn get(&self, reservation_id: i64) -> FloorResult<Reservation> {
        self.storage
            .get_reservation(reservation_id)?
            .ok_or(FloorError::ReservationNotFound(reservation_id))
    }

    /// Get within a write transaction (critical-section reads)
    pub fn get_txn(
        &self,
        txn: &WriteTransaction,
        reservation_id: i64,
    ) -> FloorResult<Reservation> {
        self.storage
            .get_reservation_txn(txn, reservation_id)?
            .ok_or(FloorError::ReservationNotFound(reservation_id))
    }

    /// Reservations taken for a table, optionally restricted to those
    /// overlapping `window`, ascending by start time
    pub fn list_by_table(
        &self,
        table_id: i64,
        window: Option<TimeWindow>,
    ) -> FloorResult<Vec<Reservation>> {
        let mut reservations = self.storage.list_reservations_for_table(table_id)?;
        if let Some(w) = window {
            reservations.retain(|r| overlaps(w, window_of(r)));
        }
        reservations.sort_by_key(|r| r.start_time);
        Ok(reservations)
    }

    /// Pending/Confirmed reservations for a table, ascending by start time
    pub fn list_active_by_table(&self, table_id: i64) -> FloorResult<Vec<Reservation>> {
        let mut reservations: Vec<Reservation> = self
            .storage
            .list_reservations_for_table(table_id)?
            .into_iter()
            .filter(|r| r.status.is_active())
            .collect();
        reservations.sort_by_key(|r| r.start_time);
        Ok(reservations)
    }

    /// Active reservations for a table, read within a write transaction.
    /// This is what the scheduler re-checks immediately before committing.
    pub fn list_active_by_table_txn(
        &self,
        txn: &WriteTransaction,
        table_id: i64,
    ) -> FloorResult<Vec<Reservation>> {
        let mut reservations: Vec<Reservation> = self
            .storage
            .list_reservations_for_table_txn(txn, table_id)?
            .into_iter()
            .filter(|r| r.status.is_active())
            .collect();
        reservations.sort_by_key(|r| r.start_time);
        Ok(reservations)
    }

    /// Active reservations across all tables, ascending by start time
    pub fn list_active(&self) -> FloorResult<Vec<Reservation>> {
        let mut reservations = self.storage.list_active_reservations()?;
        reservations.sort_by_key(|r| r.start_time);
        Ok(reservations)
    }

    /// Active reservations whose start falls within the next `within_minutes`.
    /// Feeds reminder notifications and the reclaimer's soon-to-arrive checks.
    pub fn list_upcoming(&self, within_minutes: u32, now: i64) -> FloorResult<Vec<Reservation>> {
        let horizon = now + minutes_to_millis(within_minutes);
        let mut reservations: Vec<Reservation> = self
            .storage
            .list_active_reservations()?
            .into_iter()
            .filter(|r| r.start_time >= now && r.start_time < horizon)
            .collect();
        reservations.sort_by_key(|r| r.start_time);
        Ok(reservations)
    }

    // ========== Mutations (scheduler only) ==========

    /// Create a Pending reservation from a validated request
    pub fn create(
        &self,
        txn: &WriteTransaction,
        request: &ReservationRequest,
        now: i64,
    ) -> FloorResult<Reservation> {
        let reservation = Reservation {
            id: snowflake_id(),
            table_id: request.table_id,
            client_id: request.client_id,
            party_size: request.party_size,
            start_time: request.start_time,
            duration_minutes: request.duration_minutes,
            status: ReservationStatus::Pending,
            created_at: now,
            notes: request.notes.clone(),
        };
        self.storage.store_reservation(txn, &reservation)?;
        Ok(reservation)
    }

    /// Validate and persist a lifecycle transition
    pub fn update_state(
        &self,
        txn: &WriteTransaction,
        reservation_id: i64,
        new_state: ReservationStatus,
    ) -> FloorResult<Reservation> {
        let mut reservation = self.get_txn(txn, reservation_id)?;

        if !reservation.status.can_transition_to(new_state) {
            return Err(FloorError::InvalidReservationTransition {
                reservation_id,
                from: reservation.status,
                to: new_state,
            });
        }

        reservation.status = new_state;
        self.storage.store_reservation(txn, &reservation)?;
        Ok(reservation)
    }
}
