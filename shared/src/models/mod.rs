//! Domain models for the floor-scheduling core

pub mod dining_table;
pub mod reservation;

pub use dining_table::{DiningTable, DiningTableCreate, TableState};
pub use reservation::{Reservation, ReservationStatus};
