//! Mesa Floor Core - table and reservation scheduling engine
//!
//! # Architecture
//!
//! This crate is the scheduling core of the Mesa restaurant platform. It
//! assigns physical tables to walk-in orders and time-boxed reservations
//! without double-booking, and reclaims tables abandoned past policy
//! thresholds.
//!
//! ```text
//! floor-core/src/
//! ├── core/          # Policy configuration, background task management
//! ├── floor/         # Storage, registry, reservations, scheduler, reclaimer
//! └── utils/         # Logging
//! ```
//!
//! # Data Flow
//!
//! 1. A request (reservation, walk-in, check-in, release) enters the
//!    [`AvailabilityScheduler`] - the only component that mutates state
//! 2. The scheduler runs the inspect-and-commit sequence under a per-table
//!    lock inside one storage transaction
//! 3. A [`shared::FloorEvent`] with a global sequence number is persisted
//!    with the mutation and broadcast to subscribers after commit
//! 4. The [`IdleReclaimer`] sweeps periodically and funnels its forced
//!    transitions through the same scheduler entry points

pub mod core;
pub mod floor;
pub mod utils;

// Re-export public types
pub use crate::core::{BackgroundTasks, FloorConfig, TaskKind};
pub use floor::{
    AvailabilityScheduler, FloorError, FloorResult, FloorStorage, IdleReclaimer, ReservationStore,
    SweepStats, TableRegistry, TimeWindow,
};

// Re-export unified error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
