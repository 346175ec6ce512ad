//! Unified error codes for the Mesa floor framework
//!
//! This module defines all error codes used across the engine and its
//! transport wrappers. Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Reservation errors
//! - 7xxx: Table errors
//! - 9xxx: System errors

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 4001,
    /// Time window already booked on this table
    ReservationConflict = 4002,
    /// Reservation state machine violation
    InvalidReservationState = 4003,
    /// Reservation window already passed
    ReservationExpired = 4004,
    /// Duration outside the configured bounds
    DurationOutOfRange = 4005,
    /// Start time beyond the advance-booking window
    AdvanceWindowExceeded = 4006,
    /// Start time already in the past
    StartTimeInPast = 4007,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table is occupied
    TableOccupied = 7002,
    /// Table state machine violation
    InvalidTableState = 7003,
    /// Table is soft-disabled
    TableInactive = 7004,
    /// Party size exceeds table capacity
    CapacityExceeded = 7005,
    /// Table number already registered
    TableNumberTaken = 7006,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Storage full (disk space insufficient)
    StorageFull = 9401,
    /// Storage corrupted (data file damaged)
    StorageCorrupted = 9403,
    /// System busy (IO error, retry later)
    SystemBusy = 9404,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::ReservationConflict => "Time window is already booked",
            ErrorCode::InvalidReservationState => "Invalid reservation state transition",
            ErrorCode::ReservationExpired => "Reservation window has already passed",
            ErrorCode::DurationOutOfRange => "Reservation duration is out of range",
            ErrorCode::AdvanceWindowExceeded => "Start time is beyond the advance-booking window",
            ErrorCode::StartTimeInPast => "Start time is in the past",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableOccupied => "Table is occupied",
            ErrorCode::InvalidTableState => "Invalid table state transition",
            ErrorCode::TableInactive => "Table is disabled",
            ErrorCode::CapacityExceeded => "Party size exceeds table capacity",
            ErrorCode::TableNumberTaken => "Table number is already registered",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database operation failed",
            ErrorCode::StorageFull => "Storage is full",
            ErrorCode::StorageCorrupted => "Storage is corrupted",
            ErrorCode::SystemBusy => "System is busy, retry later",
        }
    }

    /// Get the HTTP status code for this error (for transport wrappers)
    pub const fn http_status(&self) -> StatusCode {
        match self {
            ErrorCode::Success => StatusCode::OK,

            ErrorCode::ValidationFailed
            | ErrorCode::InvalidRequest
            | ErrorCode::ValueOutOfRange
            | ErrorCode::DurationOutOfRange
            | ErrorCode::AdvanceWindowExceeded
            | ErrorCode::StartTimeInPast => StatusCode::BAD_REQUEST,

            ErrorCode::NotFound
            | ErrorCode::ReservationNotFound
            | ErrorCode::TableNotFound => StatusCode::NOT_FOUND,

            ErrorCode::AlreadyExists
            | ErrorCode::ReservationConflict
            | ErrorCode::TableOccupied
            | ErrorCode::TableNumberTaken => StatusCode::CONFLICT,

            ErrorCode::InvalidReservationState
            | ErrorCode::InvalidTableState
            | ErrorCode::ReservationExpired
            | ErrorCode::TableInactive
            | ErrorCode::CapacityExceeded => StatusCode::UNPROCESSABLE_ENTITY,

            ErrorCode::SystemBusy => StatusCode::SERVICE_UNAVAILABLE,

            ErrorCode::Unknown
            | ErrorCode::InternalError
            | ErrorCode::DatabaseError
            | ErrorCode::StorageFull
            | ErrorCode::StorageCorrupted => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the category for this error code
    pub fn category(&self) -> super::ErrorCategory {
        super::ErrorCategory::from_code(self.code())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::Unknown,
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            4 => ErrorCode::AlreadyExists,
            5 => ErrorCode::InvalidRequest,
            8 => ErrorCode::ValueOutOfRange,

            4001 => ErrorCode::ReservationNotFound,
            4002 => ErrorCode::ReservationConflict,
            4003 => ErrorCode::InvalidReservationState,
            4004 => ErrorCode::ReservationExpired,
            4005 => ErrorCode::DurationOutOfRange,
            4006 => ErrorCode::AdvanceWindowExceeded,
            4007 => ErrorCode::StartTimeInPast,

            7001 => ErrorCode::TableNotFound,
            7002 => ErrorCode::TableOccupied,
            7003 => ErrorCode::InvalidTableState,
            7004 => ErrorCode::TableInactive,
            7005 => ErrorCode::CapacityExceeded,
            7006 => ErrorCode::TableNumberTaken,

            9001 => ErrorCode::InternalError,
            9002 => ErrorCode::DatabaseError,
            9401 => ErrorCode::StorageFull,
            9403 => ErrorCode::StorageCorrupted,
            9404 => ErrorCode::SystemBusy,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::NotFound,
            ErrorCode::ReservationConflict,
            ErrorCode::CapacityExceeded,
            ErrorCode::InvalidTableState,
            ErrorCode::SystemBusy,
        ] {
            let raw: u16 = code.into();
            assert_eq!(ErrorCode::try_from(raw), Ok(code));
        }
    }

    #[test]
    fn unknown_code_rejected() {
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn conflict_maps_to_http_409() {
        assert_eq!(
            ErrorCode::ReservationConflict.http_status(),
            StatusCode::CONFLICT
        );
    }
}
