//! Floor events - immutable facts recorded after scheduler operations
//!
//! Every mutation the scheduler commits produces exactly one event. Events
//! carry a global sequence number persisted with the mutation itself, so
//! subscribers (floor-plan displays, the notification module) can detect
//! gaps and re-query instead of trusting delivery.

use crate::models::{ReservationStatus, TableState};
use serde::{Deserialize, Serialize};

/// Floor event - immutable audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorEvent {
    /// Event unique ID
    pub event_id: String,
    /// Global sequence number (authoritative ordering, persisted atomically
    /// with the mutation that produced the event)
    pub sequence: u64,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Event type
    pub event_type: FloorEventType,
    /// Event payload
    pub payload: FloorEventPayload,
}

impl FloorEvent {
    pub fn new(
        sequence: u64,
        timestamp: i64,
        event_type: FloorEventType,
        payload: FloorEventPayload,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            timestamp,
            event_type,
            payload,
        }
    }
}

/// Event type enumeration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FloorEventType {
    // Tables
    TableRegistered,
    TableStateChanged,
    TableCleaned,

    // Reservations
    ReservationCreated,
    ReservationConfirmed,
    ReservationCancelled,
    ReservationCompleted,
}

impl std::fmt::Display for FloorEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FloorEventType::TableRegistered => write!(f, "TABLE_REGISTERED"),
            FloorEventType::TableStateChanged => write!(f, "TABLE_STATE_CHANGED"),
            FloorEventType::TableCleaned => write!(f, "TABLE_CLEANED"),
            FloorEventType::ReservationCreated => write!(f, "RESERVATION_CREATED"),
            FloorEventType::ReservationConfirmed => write!(f, "RESERVATION_CONFIRMED"),
            FloorEventType::ReservationCancelled => write!(f, "RESERVATION_CANCELLED"),
            FloorEventType::ReservationCompleted => write!(f, "RESERVATION_COMPLETED"),
        }
    }
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FloorEventPayload {
    // ========== Tables ==========
    TableRegistered {
        table_id: i64,
        number: u32,
        capacity: u32,
        location: String,
    },

    TableStateChanged {
        table_id: i64,
        from: TableState,
        to: TableState,
    },

    TableCleaned {
        table_id: i64,
        cleaned_at: i64,
    },

    // ========== Reservations ==========
    ReservationCreated {
        reservation_id: i64,
        table_id: i64,
        client_id: i64,
        party_size: u32,
        start_time: i64,
        duration_minutes: u32,
    },

    ReservationConfirmed {
        reservation_id: i64,
        table_id: i64,
    },

    ReservationCancelled {
        reservation_id: i64,
        table_id: i64,
        /// Previous status, for audit
        previous: ReservationStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    ReservationCompleted {
        reservation_id: i64,
        table_id: i64,
    },
}
