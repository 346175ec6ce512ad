use super::*;
use crate::core::FloorConfig;
use crate::floor::storage::FloorStorage;
use shared::models::DiningTableCreate;

mod test_core;

/// Fixed wall clock for deterministic scheduling tests
const T0: i64 = 1_700_000_000_000;

/// `T0` shifted by whole minutes
fn at(minutes: i64) -> i64 {
    T0 + minutes * 60_000
}

fn create_test_scheduler() -> AvailabilityScheduler {
    let storage = FloorStorage::open_in_memory().unwrap();
    AvailabilityScheduler::new(storage, FloorConfig::builtin())
}

fn register(
    scheduler: &AvailabilityScheduler,
    number: u32,
    capacity: u32,
    location: &str,
) -> DiningTable {
    scheduler
        .register_table(
            &DiningTableCreate {
                number,
                capacity,
                location: location.to_string(),
            },
            T0,
        )
        .unwrap()
}

fn booking(table_id: i64, start: i64, minutes: u32, party: u32) -> ReservationRequest {
    ReservationRequest {
        table_id,
        client_id: 99,
        party_size: party,
        start_time: start,
        duration_minutes: minutes,
        notes: None,
    }
}

fn walk_in(table_id: i64, party: u32, estimated_minutes: u32) -> WalkInRequest {
    WalkInRequest {
        table_id,
        party_size: party,
        estimated_minutes,
    }
}
