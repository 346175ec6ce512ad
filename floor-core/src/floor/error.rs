//! Floor scheduling error taxonomy
//!
//! Conflicts and capacity failures are expected, recoverable outcomes under
//! contention; state-machine violations indicate a defect in the caller and
//! are logged distinctly. Everything is returned as a value - the engine
//! never panics on domain failures.

use super::storage::StorageError;
use shared::error::{AppError, ErrorCode};
use shared::models::{ReservationStatus, TableState};
use thiserror::Error;

/// Floor scheduling errors
#[derive(Debug, Error)]
pub enum FloorError {
    #[error("Table not found: {0}")]
    TableNotFound(i64),

    #[error("Reservation not found: {0}")]
    ReservationNotFound(i64),

    #[error("Table {0} is disabled")]
    TableInactive(i64),

    #[error("Table number {0} is already registered")]
    TableNumberTaken(u32),

    #[error("Table {table_id} is {state}, not available for seating")]
    TableUnavailable { table_id: i64, state: TableState },

    #[error("Invalid transition for table {table_id}: {from} -> {to}")]
    InvalidTableTransition {
        table_id: i64,
        from: TableState,
        to: TableState,
    },

    #[error("Invalid transition for reservation {reservation_id}: {from} -> {to}")]
    InvalidReservationTransition {
        reservation_id: i64,
        from: ReservationStatus,
        to: ReservationStatus,
    },

    #[error("Reservation {reservation_id} is {status}, check-in requires a confirmed booking")]
    ReservationNotConfirmed {
        reservation_id: i64,
        status: ReservationStatus,
    },

    #[error(
        "Time window conflict on table {table_id}: reservation {reservation_id} holds [{start}, {end})"
    )]
    Conflict {
        table_id: i64,
        reservation_id: i64,
        start: i64,
        end: i64,
    },

    #[error("Party of {party_size} exceeds capacity {capacity} of table {table_id}")]
    CapacityExceeded {
        table_id: i64,
        capacity: u32,
        party_size: u32,
    },

    #[error("Reservation duration {minutes}min is outside [{min}min, {max}min]")]
    DurationOutOfRange { minutes: u32, min: u32, max: u32 },

    #[error("Start time {start_time} exceeds the advance-booking window")]
    AdvanceWindowExceeded { start_time: i64 },

    #[error("Start time {start_time} is in the past")]
    StartTimeInPast { start_time: i64 },

    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type FloorResult<T> = Result<T, FloorError>;

impl FloorError {
    /// Structured error code for the transport boundary
    pub fn error_code(&self) -> ErrorCode {
        match self {
            FloorError::TableNotFound(_) => ErrorCode::TableNotFound,
            FloorError::ReservationNotFound(_) => ErrorCode::ReservationNotFound,
            FloorError::TableInactive(_) => ErrorCode::TableInactive,
            FloorError::TableNumberTaken(_) => ErrorCode::TableNumberTaken,
            FloorError::TableUnavailable { .. } => ErrorCode::TableOccupied,
            FloorError::InvalidTableTransition { .. } => ErrorCode::InvalidTableState,
            FloorError::InvalidReservationTransition { .. } => ErrorCode::InvalidReservationState,
            FloorError::ReservationNotConfirmed { .. } => ErrorCode::InvalidReservationState,
            FloorError::Conflict { .. } => ErrorCode::ReservationConflict,
            FloorError::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
            FloorError::DurationOutOfRange { .. } => ErrorCode::DurationOutOfRange,
            FloorError::AdvanceWindowExceeded { .. } => ErrorCode::AdvanceWindowExceeded,
            FloorError::StartTimeInPast { .. } => ErrorCode::StartTimeInPast,
            FloorError::Validation(_) => ErrorCode::ValidationFailed,
            FloorError::Storage(e) => classify_storage_error(e),
        }
    }

    /// Expected outcomes under normal contention, reported to the caller
    /// without an error-level log entry
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            FloorError::Conflict { .. }
                | FloorError::CapacityExceeded { .. }
                | FloorError::TableUnavailable { .. }
        )
    }
}

/// Map storage failures onto transport error codes
fn classify_storage_error(e: &StorageError) -> ErrorCode {
    match e {
        StorageError::Serialization(_) => return ErrorCode::InternalError,
        StorageError::TableMissing(_) => return ErrorCode::TableNotFound,
        StorageError::ReservationMissing(_) => return ErrorCode::ReservationNotFound,
        _ => {}
    }

    // redb errors are classified by message
    let err_str = e.to_string().to_lowercase();

    if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc") {
        return ErrorCode::StorageFull;
    }

    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return ErrorCode::StorageCorrupted;
    }

    ErrorCode::SystemBusy
}

impl From<FloorError> for AppError {
    fn from(err: FloorError) -> Self {
        let code = err.error_code();
        if matches!(err, FloorError::Storage(_)) {
            tracing::error!(error = %err, error_code = ?code, "Storage error occurred");
        }
        AppError::with_message(code, err.to_string())
    }
}

impl From<validator::ValidationErrors> for FloorError {
    fn from(errors: validator::ValidationErrors) -> Self {
        FloorError::Validation(errors.to_string())
    }
}

impl From<super::conflict::InvalidWindow> for FloorError {
    fn from(w: super::conflict::InvalidWindow) -> Self {
        FloorError::Validation(w.to_string())
    }
}
