//! redb-based storage layer for the floor registry
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `tables` | `table_id` | `DiningTable` | Canonical table records |
//! | `table_numbers` | `number` | `table_id` | Table-number uniqueness index |
//! | `reservations` | `reservation_id` | `Reservation` | Reservation records |
//! | `table_reservations` | `(table_id, reservation_id)` | `()` | Per-table index |
//! | `active_reservations` | `reservation_id` | `table_id` | Pending/Confirmed index |
//! | `cleaning_log` | `(table_id, timestamp)` | `()` | Cleaning history |
//! | `sequence_counter` | `()` | `u64` | Global event sequence |
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate`: once `commit()` returns the
//! mutation is on disk, and copy-on-write keeps the file consistent across
//! power loss. Write transactions are exposed to callers so the scheduler
//! can commit a table-state change and a reservation write as one atomic
//! unit - a failed commit rolls both back together.

use redb::{
    Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use shared::models::{DiningTable, Reservation};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Canonical table records: key = table_id, value = JSON-serialized DiningTable
const TABLES_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("tables");

/// Table-number uniqueness index: key = number, value = table_id
const TABLE_NUMBERS_TABLE: TableDefinition<u32, i64> = TableDefinition::new("table_numbers");

/// Reservation records: key = reservation_id, value = JSON-serialized Reservation
const RESERVATIONS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("reservations");

/// Per-table reservation index: key = (table_id, reservation_id), value = empty
const TABLE_RESERVATIONS_TABLE: TableDefinition<(i64, i64), ()> =
    TableDefinition::new("table_reservations");

/// Active (Pending/Confirmed) reservation index: key = reservation_id, value = table_id
const ACTIVE_RESERVATIONS_TABLE: TableDefinition<i64, i64> =
    TableDefinition::new("active_reservations");

/// Cleaning history: key = (table_id, timestamp), value = empty
const CLEANING_LOG_TABLE: TableDefinition<(i64, i64), ()> = TableDefinition::new("cleaning_log");

/// Sequence counter: key = "seq", value = u64
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const SEQUENCE_KEY: &str = "seq";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Table not found: {0}")]
    TableMissing(i64),

    #[error("Reservation not found: {0}")]
    ReservationMissing(i64),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Floor storage backed by redb
#[derive(Clone)]
pub struct FloorStorage {
    db: Arc<Database>,
}

impl FloorStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Open an in-memory database (tests and demos)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Create all tables and seed the sequence counter
    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(TABLES_TABLE)?;
            let _ = write_txn.open_table(TABLE_NUMBERS_TABLE)?;
            let _ = write_txn.open_table(RESERVATIONS_TABLE)?;
            let _ = write_txn.open_table(TABLE_RESERVATIONS_TABLE)?;
            let _ = write_txn.open_table(ACTIVE_RESERVATIONS_TABLE)?;
            let _ = write_txn.open_table(CLEANING_LOG_TABLE)?;

            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            if seq_table.get(SEQUENCE_KEY)?.is_none() {
                seq_table.insert(SEQUENCE_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Sequence Operations ==========

    /// Increment and return the global sequence number (within transaction)
    pub fn increment_sequence(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        let current = table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0);
        let next = current + 1;
        table.insert(SEQUENCE_KEY, next)?;
        Ok(next)
    }

    /// Get current sequence (read-only)
    pub fn current_sequence(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SEQUENCE_TABLE)?;
        Ok(table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0))
    }

    // ========== Table Operations ==========

    /// Insert a new table, maintaining the number uniqueness index.
    /// Returns false (and writes nothing) if the number is already taken.
    pub fn insert_table(&self, txn: &WriteTransaction, table: &DiningTable) -> StorageResult<bool> {
        let mut numbers = txn.open_table(TABLE_NUMBERS_TABLE)?;
        if numbers.get(table.number)?.is_some() {
            return Ok(false);
        }
        numbers.insert(table.number, table.id)?;
        drop(numbers);

        let mut tables = txn.open_table(TABLES_TABLE)?;
        let value = serde_json::to_vec(table)?;
        tables.insert(table.id, value.as_slice())?;
        Ok(true)
    }

    /// Store an updated table record (the number index is left untouched -
    /// table numbers are immutable after registration)
    pub fn store_table(&self, txn: &WriteTransaction, table: &DiningTable) -> StorageResult<()> {
        let mut tables = txn.open_table(TABLES_TABLE)?;
        let value = serde_json::to_vec(table)?;
        tables.insert(table.id, value.as_slice())?;
        Ok(())
    }

    /// Get a table by id
    pub fn get_table(&self, table_id: i64) -> StorageResult<Option<DiningTable>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLES_TABLE)?;
        match table.get(table_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Get a table by id within a write transaction (critical-section reads)
    pub fn get_table_txn(
        &self,
        txn: &WriteTransaction,
        table_id: i64,
    ) -> StorageResult<Option<DiningTable>> {
        let table = txn.open_table(TABLES_TABLE)?;
        match table.get(table_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All registered tables
    pub fn list_tables(&self) -> StorageResult<Vec<DiningTable>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLES_TABLE)?;

        let mut tables = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            tables.push(serde_json::from_slice(value.value())?);
        }
        Ok(tables)
    }

    // ========== Reservation Operations ==========

    /// Store a reservation, keeping the per-table and active indices in sync
    pub fn store_reservation(
        &self,
        txn: &WriteTransaction,
        reservation: &Reservation,
    ) -> StorageResult<()> {
        let mut reservations = txn.open_table(RESERVATIONS_TABLE)?;
        let value = serde_json::to_vec(reservation)?;
        reservations.insert(reservation.id, value.as_slice())?;
        drop(reservations);

        let mut by_table = txn.open_table(TABLE_RESERVATIONS_TABLE)?;
        by_table.insert((reservation.table_id, reservation.id), ())?;
        drop(by_table);

        let mut active = txn.open_table(ACTIVE_RESERVATIONS_TABLE)?;
        if reservation.status.is_active() {
            active.insert(reservation.id, reservation.table_id)?;
        } else {
            active.remove(reservation.id)?;
        }
        Ok(())
    }

    /// Get a reservation by id
    pub fn get_reservation(&self, reservation_id: i64) -> StorageResult<Option<Reservation>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RESERVATIONS_TABLE)?;
        match table.get(reservation_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Get a reservation by id within a write transaction
    pub fn get_reservation_txn(
        &self,
        txn: &WriteTransaction,
        reservation_id: i64,
    ) -> StorageResult<Option<Reservation>> {
        let table = txn.open_table(RESERVATIONS_TABLE)?;
        match table.get(reservation_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All reservations ever taken for a table
    pub fn list_reservations_for_table(&self, table_id: i64) -> StorageResult<Vec<Reservation>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(TABLE_RESERVATIONS_TABLE)?;
        let table = read_txn.open_table(RESERVATIONS_TABLE)?;

        let mut reservations = Vec::new();
        let range_start = (table_id, i64::MIN);
        let range_end = (table_id, i64::MAX);
        for result in index.range(range_start..=range_end)? {
            let (key, _) = result?;
            let (_, reservation_id) = key.value();
            if let Some(guard) = table.get(reservation_id)? {
                reservations.push(serde_json::from_slice(guard.value())?);
            }
        }
        Ok(reservations)
    }

    /// All reservations for a table, read within a write transaction
    pub fn list_reservations_for_table_txn(
        &self,
        txn: &WriteTransaction,
        table_id: i64,
    ) -> StorageResult<Vec<Reservation>> {
        let index = txn.open_table(TABLE_RESERVATIONS_TABLE)?;
        let table = txn.open_table(RESERVATIONS_TABLE)?;

        let mut reservations = Vec::new();
        let range_start = (table_id, i64::MIN);
        let range_end = (table_id, i64::MAX);
        for result in index.range(range_start..=range_end)? {
            let (key, _) = result?;
            let (_, reservation_id) = key.value();
            if let Some(guard) = table.get(reservation_id)? {
                reservations.push(serde_json::from_slice(guard.value())?);
            }
        }
        Ok(reservations)
    }

    /// All Pending/Confirmed reservations across every table
    pub fn list_active_reservations(&self) -> StorageResult<Vec<Reservation>> {
        let read_txn = self.db.begin_read()?;
        let active = read_txn.open_table(ACTIVE_RESERVATIONS_TABLE)?;
        let table = read_txn.open_table(RESERVATIONS_TABLE)?;

        let mut reservations = Vec::new();
        for result in active.iter()? {
            let (key, _) = result?;
            let reservation_id = key.value();
            if let Some(guard) = table.get(reservation_id)? {
                reservations.push(serde_json::from_slice(guard.value())?);
            }
        }
        Ok(reservations)
    }

    // ========== Cleaning Log ==========

    /// Append a cleaning record for a table
    pub fn append_cleaning(
        &self,
        txn: &WriteTransaction,
        table_id: i64,
        timestamp: i64,
    ) -> StorageResult<()> {
        let mut log = txn.open_table(CLEANING_LOG_TABLE)?;
        log.insert((table_id, timestamp), ())?;
        Ok(())
    }

    /// Cleaning timestamps recorded for a table, ascending
    pub fn cleaning_history(&self, table_id: i64) -> StorageResult<Vec<i64>> {
        let read_txn = self.db.begin_read()?;
        let log = read_txn.open_table(CLEANING_LOG_TABLE)?;

        let mut timestamps = Vec::new();
        for result in log.range((table_id, i64::MIN)..=(table_id, i64::MAX))? {
            let (key, _) = result?;
            let (_, ts) = key.value();
            timestamps.push(ts);
        }
        Ok(timestamps)
    }
}
