//! Floor Scheduling Module
//!
//! This module implements table and reservation scheduling:
//!
//! - **storage**: redb-based persistence layer for tables, reservations, and indices
//! - **registry**: canonical table state and the table state machine
//! - **reservations**: reservation records and time-indexed queries
//! - **conflict**: pure half-open time-window overlap detection
//! - **scheduler**: the orchestration core - the only component that mutates state
//! - **reclaimer**: periodic sweep reclaiming abandoned tables and no-shows
//!
//! # Architecture
//!
//! ```text
//! Request → AvailabilityScheduler → per-table lock → Storage (redb)
//!                   ↓                                     ↓
//!                Broadcast                     Table + Reservation writes
//!                   ↓                           (single transaction)
//!             All Subscribers
//! ```
//!
//! The registry and reservation store are read-only to everything except the
//! scheduler; the reclaimer routes every forced transition through the same
//! scheduler entry points.

pub mod conflict;
pub mod error;
pub mod reclaimer;
pub mod registry;
pub mod reservations;
pub mod scheduler;
pub mod storage;

// Re-exports
pub use conflict::{overlaps, InvalidWindow, TimeWindow};
pub use error::{FloorError, FloorResult};
pub use reclaimer::{IdleReclaimer, SweepStats};
pub use registry::TableRegistry;
pub use reservations::ReservationStore;
pub use scheduler::AvailabilityScheduler;
pub use storage::{FloorStorage, StorageError};

// Re-export shared types for convenience
pub use shared::floor::{FloorEvent, FloorEventPayload, FloorEventType};
pub use shared::models::{DiningTable, DiningTableCreate, Reservation, ReservationStatus, TableState};
