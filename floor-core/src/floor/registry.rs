//! Table registry - canonical state of every physical table
//!
//! The registry validates the table state machine and persists transitions;
//! it never decides *when* a transition happens - that is the scheduler's
//! job, and the scheduler is the only caller of the mutating methods here.

use super::error::{FloorError, FloorResult};
use super::storage::FloorStorage;
use redb::WriteTransaction;
use shared::models::{DiningTable, DiningTableCreate, TableState};
use shared::util::snowflake_id;

/// Entity names are bounded the same way across the platform
const MAX_LOCATION_LEN: usize = 200;
const MAX_NOTE_LEN: usize = 500;

#[derive(Clone)]
pub struct TableRegistry {
    storage: FloorStorage,
}

impl TableRegistry {
    pub fn new(storage: FloorStorage) -> Self {
        Self { storage }
    }

    // ========== Queries ==========

    pub fn get(&self, table_id: i64) -> FloorResult<DiningTable> {
        self.storage
            .get_table(table_id)?
            .ok_or(FloorError::TableNotFound(table_id))
    }

    /// Get within a write transaction (critical-section reads)
    pub fn get_txn(&self, txn: &WriteTransaction, table_id: i64) -> FloorResult<DiningTable> {
        self.storage
            .get_table_txn(txn, table_id)?
            .ok_or(FloorError::TableNotFound(table_id))
    }

    pub fn list_all(&self) -> FloorResult<Vec<DiningTable>> {
        let mut tables = self.storage.list_tables()?;
        tables.sort_by_key(|t| t.number);
        Ok(tables)
    }

    pub fn list_by_state(&self, state: TableState) -> FloorResult<Vec<DiningTable>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|t| t.state == state)
            .collect())
    }

    pub fn list_by_capacity_range(&self, min: u32, max: u32) -> FloorResult<Vec<DiningTable>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|t| t.capacity >= min && t.capacity <= max)
            .collect())
    }

    // ========== Mutations (scheduler only) ==========

    /// Register a new table. New tables start `Free`.
    pub fn register(
        &self,
        txn: &WriteTransaction,
        input: &DiningTableCreate,
        now: i64,
    ) -> FloorResult<DiningTable> {
        if input.capacity < 1 {
            return Err(FloorError::Validation("capacity must be at least 1".into()));
        }
        let location = input.location.trim();
        if location.is_empty() {
            return Err(FloorError::Validation("location must not be empty".into()));
        }
        if location.len() > MAX_LOCATION_LEN {
            return Err(FloorError::Validation(format!(
                "location is too long ({} chars, max {MAX_LOCATION_LEN})",
                location.len()
            )));
        }

        let table = DiningTable {
            id: snowflake_id(),
            number: input.number,
            capacity: input.capacity,
            location: location.to_string(),
            state: TableState::Free,
            state_changed_at: now,
            last_cleaned_at: None,
            maintenance_note: None,
            is_active: true,
            created_at: now,
        };

        if !self.storage.insert_table(txn, &table)? {
            return Err(FloorError::TableNumberTaken(input.number));
        }
        Ok(table)
    }

    /// Validate and persist a state transition, stamping `state_changed_at`.
    ///
    /// The maintenance note travels with the `Maintenance` state: set on
    /// entry (by the scheduler), cleared on exit.
    pub fn set_state(
        &self,
        txn: &WriteTransaction,
        table_id: i64,
        new_state: TableState,
        now: i64,
    ) -> FloorResult<DiningTable> {
        let mut table = self.get_txn(txn, table_id)?;

        if !table.state.can_transition_to(new_state) {
            return Err(FloorError::InvalidTableTransition {
                table_id,
                from: table.state,
                to: new_state,
            });
        }

        if table.state == TableState::Maintenance {
            table.maintenance_note = None;
        }
        table.state = new_state;
        table.state_changed_at = now;
        self.storage.store_table(txn, &table)?;
        Ok(table)
    }

    /// Attach a maintenance note to a table already transitioned to `Maintenance`
    pub fn set_maintenance_note(
        &self,
        txn: &WriteTransaction,
        table_id: i64,
        note: Option<&str>,
    ) -> FloorResult<DiningTable> {
        if let Some(n) = note
            && n.len() > MAX_NOTE_LEN
        {
            return Err(FloorError::Validation(format!(
                "note is too long ({} chars, max {MAX_NOTE_LEN})",
                n.len()
            )));
        }
        let mut table = self.get_txn(txn, table_id)?;
        table.maintenance_note = note.map(|n| n.to_string());
        self.storage.store_table(txn, &table)?;
        Ok(table)
    }

    /// Record a cleaning; side effect only, no state change
    pub fn register_cleaning(
        &self,
        txn: &WriteTransaction,
        table_id: i64,
        now: i64,
    ) -> FloorResult<DiningTable> {
        let mut table = self.get_txn(txn, table_id)?;
        table.last_cleaned_at = Some(now);
        self.storage.store_table(txn, &table)?;
        self.storage.append_cleaning(txn, table_id, now)?;
        Ok(table)
    }

    /// Soft-disable or re-enable a table. Tables referenced by historical
    /// reservations are never hard-deleted.
    pub fn set_active(
        &self,
        txn: &WriteTransaction,
        table_id: i64,
        active: bool,
    ) -> FloorResult<DiningTable> {
        let mut table = self.get_txn(txn, table_id)?;
        table.is_active = active;
        self.storage.store_table(txn, &table)?;
        Ok(table)
    }
}
