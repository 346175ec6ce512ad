//! AvailabilityScheduler - the orchestration core
//!
//! All mutating floor operations funnel through this component so the
//! no-double-booking and state-machine invariants are enforced at a single
//! choke point. The registry and reservation store are read-only to
//! everything else.
//!
//! # Operation Flow
//!
//! ```text
//! reserve(request)
//!     ├─ 1. Validate request and policy bounds
//!     ├─ 2. Acquire the per-table lock
//!     ├─ 3. Begin write transaction
//!     ├─ 4. Re-run conflict detection against committed state
//!     ├─ 5. Write reservation (+ table state when effective immediately)
//!     ├─ 6. Allocate event sequence numbers
//!     ├─ 7. Commit transaction
//!     ├─ 8. Broadcast event(s)
//!     └─ 9. Return the reservation
//! ```
//!
//! The inspect-and-commit sequence runs entirely under the table's lock with
//! every write in one redb transaction: two concurrent `reserve` calls for
//! overlapping windows on the same table yield exactly one success and one
//! conflict, and a failed commit rolls back the table-state and reservation
//! writes together. Operations on different tables proceed in parallel.

use super::conflict::{conflicting_reservation, TimeWindow};
use super::error::{FloorError, FloorResult};
use super::registry::TableRegistry;
use super::reservations::ReservationStore;
use super::storage::{FloorStorage, StorageError};
use crate::core::FloorConfig;
use dashmap::DashMap;
use parking_lot::Mutex;
use shared::floor::{FloorEvent, FloorEventPayload, FloorEventType, ReservationRequest, WalkInRequest};
use shared::models::{DiningTable, Reservation, ReservationStatus, TableState};
use std::sync::Arc;
use tokio::sync::broadcast;
use validator::Validate;

#[cfg(test)]
mod tests;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 4096;

/// The scheduling core
///
/// The `epoch` field is a unique identifier generated on each startup.
/// Subscribers use it to detect engine restarts and re-query instead of
/// trusting their event stream.
pub struct AvailabilityScheduler {
    storage: FloorStorage,
    registry: TableRegistry,
    reservations: ReservationStore,
    config: FloorConfig,
    /// Per-table critical-section locks; the (table, active-reservation-set)
    /// pair is the unit of contention
    locks: DashMap<i64, Arc<Mutex<()>>>,
    event_tx: broadcast::Sender<FloorEvent>,
    /// Engine instance epoch - unique ID generated on startup
    epoch: String,
}

impl std::fmt::Debug for AvailabilityScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityScheduler")
            .field("storage", &"<FloorStorage>")
            .field("event_tx", &"<broadcast::Sender>")
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl AvailabilityScheduler {
    pub fn new(storage: FloorStorage, config: FloorConfig) -> Self {
        let registry = TableRegistry::new(storage.clone());
        let reservations = ReservationStore::new(storage.clone());
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let epoch = uuid::Uuid::new_v4().to_string();
        tracing::info!(epoch = %epoch, "AvailabilityScheduler started with new epoch");
        Self {
            storage,
            registry,
            reservations,
            config,
            locks: DashMap::new(),
            event_tx,
            epoch,
        }
    }

    /// Get the engine epoch (unique instance ID)
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    /// Subscribe to floor event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<FloorEvent> {
        self.event_tx.subscribe()
    }

    pub fn config(&self) -> &FloorConfig {
        &self.config
    }

    /// Read-only access to the table registry
    pub fn registry(&self) -> &TableRegistry {
        &self.registry
    }

    /// Read-only access to the reservation store
    pub fn reservations(&self) -> &ReservationStore {
        &self.reservations
    }

    // ========== Queries ==========

    pub fn get_table(&self, table_id: i64) -> FloorResult<DiningTable> {
        self.registry.get(table_id)
    }

    pub fn get_reservation(&self, reservation_id: i64) -> FloorResult<Reservation> {
        self.reservations.get(reservation_id)
    }

    pub fn list_reservations_for_table(
        &self,
        table_id: i64,
        window: Option<TimeWindow>,
    ) -> FloorResult<Vec<Reservation>> {
        self.reservations.list_by_table(table_id, window)
    }

    /// Active reservations starting within the horizon (default from config).
    /// The notification module polls this for reminders.
    pub fn list_upcoming(
        &self,
        within_minutes: Option<u32>,
        now: i64,
    ) -> FloorResult<Vec<Reservation>> {
        let horizon = within_minutes.unwrap_or(self.config.upcoming_horizon_minutes);
        self.reservations.list_upcoming(horizon, now)
    }

    /// Tables that can host `party_size` over `window`
    ///
    /// Filters by capacity, activation, and location, excludes tables under
    /// maintenance, then discards any table whose active reservations
    /// overlap the desired window. Read-only and idempotent; results are
    /// ordered by table number.
    pub fn find_available_tables(
        &self,
        window: TimeWindow,
        party_size: u32,
        location: Option<&str>,
    ) -> FloorResult<Vec<DiningTable>> {
        let mut available = Vec::new();
        for table in self.registry.list_all()? {
            if !table.is_active || table.state == TableState::Maintenance {
                continue;
            }
            if table.capacity < party_size {
                continue;
            }
            if let Some(loc) = location
                && !table.location.eq_ignore_ascii_case(loc)
            {
                continue;
            }
            let active = self.reservations.list_active_by_table(table.id)?;
            if conflicting_reservation(window, &active).is_some() {
                continue;
            }
            available.push(table);
        }
        Ok(available)
    }

    /// The candidate minimizing wasted seats, ties broken by lowest table
    /// number for determinism. `None` when no candidate fits.
    pub fn best_fit(candidates: &[DiningTable], party_size: u32) -> Option<&DiningTable> {
        candidates
            .iter()
            .filter(|t| t.capacity >= party_size)
            .min_by_key(|t| (t.capacity - party_size, t.number))
    }

    // ========== Mutations ==========

    /// Register a new table (administrative boundary). New tables start `Free`.
    pub fn register_table(
        &self,
        input: &shared::models::DiningTableCreate,
        now: i64,
    ) -> FloorResult<DiningTable> {
        log_outcome("register_table", self.register_table_inner(input, now))
    }

    /// Book a table for a party over a time window
    ///
    /// Conflict detection is re-run under the per-table lock immediately
    /// before insertion, closing the race between `find_available_tables`
    /// and commit. When the window starts within the immediate-effect
    /// threshold the table is also transitioned to `Reserved`.
    pub fn reserve(&self, request: &ReservationRequest, now: i64) -> FloorResult<Reservation> {
        log_outcome("reserve", self.reserve_inner(request, now))
    }

    /// Confirm a pending reservation. Validates the booking only - seating
    /// is explicit via [`AvailabilityScheduler::seat`].
    pub fn confirm(&self, reservation_id: i64, now: i64) -> FloorResult<Reservation> {
        log_outcome("confirm", self.confirm_inner(reservation_id, now))
    }

    /// Check in a confirmed reservation: the guest arrives and is seated
    pub fn seat(&self, reservation_id: i64, now: i64) -> FloorResult<Reservation> {
        log_outcome("seat", self.seat_inner(reservation_id, now))
    }

    /// Walk-in seating against a free table, conflict-checked over the
    /// estimated occupancy window
    pub fn occupy(&self, request: &WalkInRequest, now: i64) -> FloorResult<DiningTable> {
        log_outcome("occupy", self.occupy_inner(request, now))
    }

    /// Cancel an active reservation. A table held `Reserved` for this
    /// booking alone returns to `Free`.
    pub fn cancel(
        &self,
        reservation_id: i64,
        reason: Option<&str>,
        now: i64,
    ) -> FloorResult<Reservation> {
        log_outcome("cancel", self.cancel_inner(reservation_id, reason, now))
    }

    /// Release an occupied table, settling any confirmed reservation whose
    /// window has started. Used for normal order completion and for forced
    /// reclamation alike.
    pub fn release(&self, table_id: i64, now: i64) -> FloorResult<DiningTable> {
        log_outcome("release", self.release_inner(table_id, now))
    }

    /// Non-blocking release for the reclaimer: returns `Ok(None)` without
    /// touching anything when the table is locked by an in-flight operation
    pub fn try_release(&self, table_id: i64, now: i64) -> FloorResult<Option<DiningTable>> {
        let lock = self.table_lock(table_id);
        match lock.try_lock() {
            Some(_guard) => log_outcome("release", self.release_locked(table_id, now)).map(Some),
            None => Ok(None),
        }
    }

    /// Non-blocking cancel for the reclaimer
    pub fn try_cancel(
        &self,
        reservation_id: i64,
        reason: Option<&str>,
        now: i64,
    ) -> FloorResult<Option<Reservation>> {
        let reservation = self.reservations.get(reservation_id)?;
        let lock = self.table_lock(reservation.table_id);
        match lock.try_lock() {
            Some(_guard) => {
                log_outcome("cancel", self.cancel_locked(reservation_id, reason, now)).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Take a free table out of service
    pub fn set_maintenance(
        &self,
        table_id: i64,
        note: Option<&str>,
        now: i64,
    ) -> FloorResult<DiningTable> {
        log_outcome("set_maintenance", self.set_maintenance_inner(table_id, note, now))
    }

    /// Put a table back in service after maintenance
    pub fn clear_maintenance(&self, table_id: i64, now: i64) -> FloorResult<DiningTable> {
        log_outcome("clear_maintenance", self.clear_maintenance_inner(table_id, now))
    }

    /// Record a cleaning; side effect only, no state change
    pub fn register_cleaning(&self, table_id: i64, now: i64) -> FloorResult<DiningTable> {
        log_outcome("register_cleaning", self.register_cleaning_inner(table_id, now))
    }

    /// Soft-disable or re-enable a table (administrative boundary)
    pub fn set_table_active(&self, table_id: i64, active: bool) -> FloorResult<DiningTable> {
        log_outcome("set_table_active", self.set_table_active_inner(table_id, active))
    }

    // ========== Internals ==========

    /// Lock guarding the inspect-and-commit sequence for one table
    pub(crate) fn table_lock(&self, table_id: i64) -> Arc<Mutex<()>> {
        self.locks
            .entry(table_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Broadcast events after a successful commit
    fn emit_all(&self, events: Vec<FloorEvent>) {
        for event in events {
            let _ = self.event_tx.send(event);
        }
    }

    fn next_event(
        &self,
        txn: &redb::WriteTransaction,
        now: i64,
        event_type: FloorEventType,
        payload: FloorEventPayload,
    ) -> FloorResult<FloorEvent> {
        let seq = self.storage.increment_sequence(txn)?;
        Ok(FloorEvent::new(seq, now, event_type, payload))
    }

    /// Policy bounds that depend on configuration rather than on the
    /// request shape: duration limits, advance-booking window, and the
    /// bounded past tolerance for reserve-now requests.
    fn validate_window_policy(&self, request: &ReservationRequest, now: i64) -> FloorResult<()> {
        let min = self.config.min_reservation_minutes;
        let max = self.config.max_reservation_minutes;
        if request.duration_minutes < min || request.duration_minutes > max {
            return Err(FloorError::DurationOutOfRange {
                minutes: request.duration_minutes,
                min,
                max,
            });
        }

        let window = TimeWindow::starting_at(request.start_time, request.duration_minutes)?;
        if window.end <= now || request.start_time < now - self.config.immediate_effect_millis() {
            return Err(FloorError::StartTimeInPast {
                start_time: request.start_time,
            });
        }
        if request.start_time > now + self.config.advance_booking_millis() {
            return Err(FloorError::AdvanceWindowExceeded {
                start_time: request.start_time,
            });
        }
        Ok(())
    }

    fn register_table_inner(
        &self,
        input: &shared::models::DiningTableCreate,
        now: i64,
    ) -> FloorResult<DiningTable> {
        let txn = self.storage.begin_write()?;
        let table = self.registry.register(&txn, input, now)?;
        let event = self.next_event(
            &txn,
            now,
            FloorEventType::TableRegistered,
            FloorEventPayload::TableRegistered {
                table_id: table.id,
                number: table.number,
                capacity: table.capacity,
                location: table.location.clone(),
            },
        )?;
        txn.commit().map_err(StorageError::from)?;
        self.emit_all(vec![event]);
        tracing::info!(table_id = table.id, number = table.number, "Table registered");
        Ok(table)
    }

    fn reserve_inner(&self, request: &ReservationRequest, now: i64) -> FloorResult<Reservation> {
        request.validate()?;
        self.validate_window_policy(request, now)?;

        // Cheap pre-checks outside the lock; all re-validated inside
        let table = self.registry.get(request.table_id)?;
        if !table.is_active {
            return Err(FloorError::TableInactive(table.id));
        }
        if request.party_size > table.capacity {
            return Err(FloorError::CapacityExceeded {
                table_id: table.id,
                capacity: table.capacity,
                party_size: request.party_size,
            });
        }

        let window = TimeWindow::starting_at(request.start_time, request.duration_minutes)?;
        let immediate = request.start_time - now <= self.config.immediate_effect_millis();

        let lock = self.table_lock(request.table_id);
        let _guard = lock.lock();

        let txn = self.storage.begin_write()?;
        let mut events = Vec::new();

        let table = self.registry.get_txn(&txn, request.table_id)?;
        if !table.is_active {
            return Err(FloorError::TableInactive(table.id));
        }

        let active = self
            .reservations
            .list_active_by_table_txn(&txn, request.table_id)?;
        if let Some(existing) = conflicting_reservation(window, &active) {
            return Err(FloorError::Conflict {
                table_id: table.id,
                reservation_id: existing.id,
                start: existing.start_time,
                end: existing.end_time(),
            });
        }

        if immediate {
            // The guest is arriving now or soon; the table itself must be
            // available, not just the window.
            if table.state != TableState::Free {
                return Err(FloorError::TableUnavailable {
                    table_id: table.id,
                    state: table.state,
                });
            }
            self.registry
                .set_state(&txn, table.id, TableState::Reserved, now)?;
            events.push(self.next_event(
                &txn,
                now,
                FloorEventType::TableStateChanged,
                FloorEventPayload::TableStateChanged {
                    table_id: table.id,
                    from: TableState::Free,
                    to: TableState::Reserved,
                },
            )?);
        }

        let reservation = self.reservations.create(&txn, request, now)?;
        events.push(self.next_event(
            &txn,
            now,
            FloorEventType::ReservationCreated,
            FloorEventPayload::ReservationCreated {
                reservation_id: reservation.id,
                table_id: reservation.table_id,
                client_id: reservation.client_id,
                party_size: reservation.party_size,
                start_time: reservation.start_time,
                duration_minutes: reservation.duration_minutes,
            },
        )?);

        txn.commit().map_err(StorageError::from)?;
        self.emit_all(events);
        tracing::info!(
            reservation_id = reservation.id,
            table_id = reservation.table_id,
            start_time = reservation.start_time,
            immediate,
            "Reservation created"
        );
        Ok(reservation)
    }

    fn confirm_inner(&self, reservation_id: i64, now: i64) -> FloorResult<Reservation> {
        let existing = self.reservations.get(reservation_id)?;

        let lock = self.table_lock(existing.table_id);
        let _guard = lock.lock();

        let txn = self.storage.begin_write()?;
        let reservation =
            self.reservations
                .update_state(&txn, reservation_id, ReservationStatus::Confirmed)?;
        let event = self.next_event(
            &txn,
            now,
            FloorEventType::ReservationConfirmed,
            FloorEventPayload::ReservationConfirmed {
                reservation_id,
                table_id: reservation.table_id,
            },
        )?;
        txn.commit().map_err(StorageError::from)?;
        self.emit_all(vec![event]);
        tracing::info!(reservation_id, table_id = reservation.table_id, "Reservation confirmed");
        Ok(reservation)
    }

    fn seat_inner(&self, reservation_id: i64, now: i64) -> FloorResult<Reservation> {
        let existing = self.reservations.get(reservation_id)?;

        let lock = self.table_lock(existing.table_id);
        let _guard = lock.lock();

        let txn = self.storage.begin_write()?;
        let reservation = self.reservations.get_txn(&txn, reservation_id)?;
        if reservation.status != ReservationStatus::Confirmed {
            return Err(FloorError::ReservationNotConfirmed {
                reservation_id,
                status: reservation.status,
            });
        }

        // Free -> Occupied and Reserved -> Occupied are the only legal
        // edges; anything else fails in set_state.
        let table = self.registry.get_txn(&txn, reservation.table_id)?;
        let from = table.state;
        self.registry
            .set_state(&txn, reservation.table_id, TableState::Occupied, now)?;
        let event = self.next_event(
            &txn,
            now,
            FloorEventType::TableStateChanged,
            FloorEventPayload::TableStateChanged {
                table_id: reservation.table_id,
                from,
                to: TableState::Occupied,
            },
        )?;
        txn.commit().map_err(StorageError::from)?;
        self.emit_all(vec![event]);
        tracing::info!(
            reservation_id,
            table_id = reservation.table_id,
            "Guest seated"
        );
        Ok(reservation)
    }

    fn occupy_inner(&self, request: &WalkInRequest, now: i64) -> FloorResult<DiningTable> {
        request.validate()?;

        let table = self.registry.get(request.table_id)?;
        if !table.is_active {
            return Err(FloorError::TableInactive(table.id));
        }
        if request.party_size > table.capacity {
            return Err(FloorError::CapacityExceeded {
                table_id: table.id,
                capacity: table.capacity,
                party_size: request.party_size,
            });
        }

        let window = TimeWindow::starting_at(now, request.estimated_minutes)?;

        let lock = self.table_lock(request.table_id);
        let _guard = lock.lock();

        let txn = self.storage.begin_write()?;
        let table = self.registry.get_txn(&txn, request.table_id)?;
        if !table.is_active {
            return Err(FloorError::TableInactive(table.id));
        }
        if table.state != TableState::Free {
            return Err(FloorError::TableUnavailable {
                table_id: table.id,
                state: table.state,
            });
        }

        let active = self
            .reservations
            .list_active_by_table_txn(&txn, request.table_id)?;
        if let Some(existing) = conflicting_reservation(window, &active) {
            return Err(FloorError::Conflict {
                table_id: table.id,
                reservation_id: existing.id,
                start: existing.start_time,
                end: existing.end_time(),
            });
        }

        let updated = self
            .registry
            .set_state(&txn, request.table_id, TableState::Occupied, now)?;
        let event = self.next_event(
            &txn,
            now,
            FloorEventType::TableStateChanged,
            FloorEventPayload::TableStateChanged {
                table_id: updated.id,
                from: TableState::Free,
                to: TableState::Occupied,
            },
        )?;
        txn.commit().map_err(StorageError::from)?;
        self.emit_all(vec![event]);
        tracing::info!(
            table_id = updated.id,
            party_size = request.party_size,
            "Walk-in seated"
        );
        Ok(updated)
    }

    fn cancel_inner(
        &self,
        reservation_id: i64,
        reason: Option<&str>,
        now: i64,
    ) -> FloorResult<Reservation> {
        let existing = self.reservations.get(reservation_id)?;
        let lock = self.table_lock(existing.table_id);
        let _guard = lock.lock();
        self.cancel_locked(reservation_id, reason, now)
    }

    /// Cancel body; the caller holds the table lock
    fn cancel_locked(
        &self,
        reservation_id: i64,
        reason: Option<&str>,
        now: i64,
    ) -> FloorResult<Reservation> {
        let txn = self.storage.begin_write()?;
        let previous = self.reservations.get_txn(&txn, reservation_id)?.status;
        let reservation =
            self.reservations
                .update_state(&txn, reservation_id, ReservationStatus::Cancelled)?;

        let mut events = vec![self.next_event(
            &txn,
            now,
            FloorEventType::ReservationCancelled,
            FloorEventPayload::ReservationCancelled {
                reservation_id,
                table_id: reservation.table_id,
                previous,
                reason: reason.map(|r| r.to_string()),
            },
        )?];

        // Release the hold if no other booking needs the table imminently
        let table = self.registry.get_txn(&txn, reservation.table_id)?;
        if table.state == TableState::Reserved {
            let remaining = self
                .reservations
                .list_active_by_table_txn(&txn, reservation.table_id)?;
            let still_held = remaining
                .iter()
                .any(|r| r.start_time - now <= self.config.immediate_effect_millis());
            if !still_held {
                self.registry
                    .set_state(&txn, reservation.table_id, TableState::Free, now)?;
                events.push(self.next_event(
                    &txn,
                    now,
                    FloorEventType::TableStateChanged,
                    FloorEventPayload::TableStateChanged {
                        table_id: reservation.table_id,
                        from: TableState::Reserved,
                        to: TableState::Free,
                    },
                )?);
            }
        }

        txn.commit().map_err(StorageError::from)?;
        self.emit_all(events);
        tracing::info!(
            reservation_id,
            table_id = reservation.table_id,
            reason = reason.unwrap_or("unspecified"),
            "Reservation cancelled"
        );
        Ok(reservation)
    }

    fn release_inner(&self, table_id: i64, now: i64) -> FloorResult<DiningTable> {
        let lock = self.table_lock(table_id);
        let _guard = lock.lock();
        self.release_locked(table_id, now)
    }

    /// Release body; the caller holds the table lock
    fn release_locked(&self, table_id: i64, now: i64) -> FloorResult<DiningTable> {
        let txn = self.storage.begin_write()?;

        // Release only undoes occupancy. Reserved and Maintenance have their
        // own exits (cancel / clear_maintenance), even though the Free edge
        // exists for them in the state machine.
        let table = self.registry.get_txn(&txn, table_id)?;
        if table.state != TableState::Occupied {
            return Err(FloorError::InvalidTableTransition {
                table_id,
                from: table.state,
                to: TableState::Free,
            });
        }
        let updated = self
            .registry
            .set_state(&txn, table_id, TableState::Free, now)?;

        let mut events = vec![self.next_event(
            &txn,
            now,
            FloorEventType::TableStateChanged,
            FloorEventPayload::TableStateChanged {
                table_id,
                from: TableState::Occupied,
                to: TableState::Free,
            },
        )?];

        // Settle the booking that was using the table; strictly-future
        // reservations stay untouched.
        let active = self.reservations.list_active_by_table_txn(&txn, table_id)?;
        for reservation in active {
            if reservation.status == ReservationStatus::Confirmed && reservation.start_time <= now {
                self.reservations
                    .update_state(&txn, reservation.id, ReservationStatus::Completed)?;
                events.push(self.next_event(
                    &txn,
                    now,
                    FloorEventType::ReservationCompleted,
                    FloorEventPayload::ReservationCompleted {
                        reservation_id: reservation.id,
                        table_id,
                    },
                )?);
            }
        }

        txn.commit().map_err(StorageError::from)?;
        self.emit_all(events);
        tracing::info!(table_id, "Table released");
        Ok(updated)
    }

    fn set_maintenance_inner(
        &self,
        table_id: i64,
        note: Option<&str>,
        now: i64,
    ) -> FloorResult<DiningTable> {
        let lock = self.table_lock(table_id);
        let _guard = lock.lock();

        let txn = self.storage.begin_write()?;
        self.registry
            .set_state(&txn, table_id, TableState::Maintenance, now)?;
        let updated = self.registry.set_maintenance_note(&txn, table_id, note)?;
        let event = self.next_event(
            &txn,
            now,
            FloorEventType::TableStateChanged,
            FloorEventPayload::TableStateChanged {
                table_id,
                from: TableState::Free,
                to: TableState::Maintenance,
            },
        )?;
        txn.commit().map_err(StorageError::from)?;
        self.emit_all(vec![event]);
        tracing::info!(table_id, note = note.unwrap_or(""), "Table under maintenance");
        Ok(updated)
    }

    fn clear_maintenance_inner(&self, table_id: i64, now: i64) -> FloorResult<DiningTable> {
        let lock = self.table_lock(table_id);
        let _guard = lock.lock();

        let txn = self.storage.begin_write()?;
        let table = self.registry.get_txn(&txn, table_id)?;
        if table.state != TableState::Maintenance {
            return Err(FloorError::InvalidTableTransition {
                table_id,
                from: table.state,
                to: TableState::Free,
            });
        }
        let updated = self
            .registry
            .set_state(&txn, table_id, TableState::Free, now)?;
        let event = self.next_event(
            &txn,
            now,
            FloorEventType::TableStateChanged,
            FloorEventPayload::TableStateChanged {
                table_id,
                from: TableState::Maintenance,
                to: TableState::Free,
            },
        )?;
        txn.commit().map_err(StorageError::from)?;
        self.emit_all(vec![event]);
        tracing::info!(table_id, "Maintenance cleared");
        Ok(updated)
    }

    fn register_cleaning_inner(&self, table_id: i64, now: i64) -> FloorResult<DiningTable> {
        let lock = self.table_lock(table_id);
        let _guard = lock.lock();

        let txn = self.storage.begin_write()?;
        let updated = self.registry.register_cleaning(&txn, table_id, now)?;
        let event = self.next_event(
            &txn,
            now,
            FloorEventType::TableCleaned,
            FloorEventPayload::TableCleaned {
                table_id,
                cleaned_at: now,
            },
        )?;
        txn.commit().map_err(StorageError::from)?;
        self.emit_all(vec![event]);
        Ok(updated)
    }

    fn set_table_active_inner(&self, table_id: i64, active: bool) -> FloorResult<DiningTable> {
        let lock = self.table_lock(table_id);
        let _guard = lock.lock();

        let txn = self.storage.begin_write()?;
        let updated = self.registry.set_active(&txn, table_id, active)?;
        txn.commit().map_err(StorageError::from)?;
        tracing::info!(table_id, active, "Table activation changed");
        Ok(updated)
    }
}

/// Uniform outcome logging at the operation boundary
///
/// Conflicts and capacity failures are expected under contention and logged
/// at debug; state-machine violations indicate a misbehaving caller and are
/// logged at warn; storage failures at error.
fn log_outcome<T>(op: &'static str, result: FloorResult<T>) -> FloorResult<T> {
    if let Err(e) = &result {
        if e.is_expected() {
            tracing::debug!(op, error = %e, "Scheduling rejected");
        } else {
            match e {
                FloorError::InvalidTableTransition { .. }
                | FloorError::InvalidReservationTransition { .. }
                | FloorError::ReservationNotConfirmed { .. } => {
                    tracing::warn!(op, error = %e, "State machine violation");
                }
                FloorError::Storage(_) => {
                    tracing::error!(op, error = %e, "Storage failure");
                }
                _ => {
                    tracing::debug!(op, error = %e, "Request rejected");
                }
            }
        }
    }
    result
}
