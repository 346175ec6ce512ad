//! End-to-end floor scheduling flows against the public API

use floor_core::{
    AvailabilityScheduler, BackgroundTasks, FloorConfig, FloorError, FloorStorage, IdleReclaimer,
    TaskKind, TimeWindow,
};
use shared::floor::{ReservationRequest, WalkInRequest};
use shared::models::{DiningTableCreate, ReservationStatus, TableState};
use shared::util::{minutes_to_millis, now_millis};
use std::sync::Arc;

const T0: i64 = 1_700_000_000_000;

fn at(minutes: i64) -> i64 {
    T0 + minutes * 60_000
}

fn build_floor(scheduler: &AvailabilityScheduler) -> Vec<i64> {
    [(1u32, 2u32), (2, 4), (3, 4), (4, 6), (5, 8)]
        .iter()
        .map(|(number, capacity)| {
            scheduler
                .register_table(
                    &DiningTableCreate {
                        number: *number,
                        capacity: *capacity,
                        location: if *number <= 3 { "Main Hall" } else { "Terrace" }.to_string(),
                    },
                    T0,
                )
                .unwrap()
                .id
        })
        .collect()
}

fn booking(table_id: i64, start: i64, minutes: u32, party: u32) -> ReservationRequest {
    ReservationRequest {
        table_id,
        client_id: 7,
        party_size: party,
        start_time: start,
        duration_minutes: minutes,
        notes: None,
    }
}

#[test]
fn evening_service_end_to_end() {
    let scheduler =
        AvailabilityScheduler::new(FloorStorage::open_in_memory().unwrap(), FloorConfig::builtin());
    let tables = build_floor(&scheduler);
    let mut events = scheduler.subscribe();

    // A party of four books the 60-to-150-minute slot on table 2
    let dinner = scheduler
        .reserve(&booking(tables[1], at(60), 90, 4), T0)
        .unwrap();
    assert_eq!(dinner.status, ReservationStatus::Pending);

    // A second party wants the middle of that slot - conflict, pick another table
    let err = scheduler
        .reserve(&booking(tables[1], at(90), 30, 2), T0)
        .unwrap_err();
    assert!(matches!(err, FloorError::Conflict { .. }));

    let window = TimeWindow::new(at(90), at(120)).unwrap();
    let alternatives = scheduler.find_available_tables(window, 2, None).unwrap();
    assert!(!alternatives.iter().any(|t| t.id == tables[1]));
    let second_table = AvailabilityScheduler::best_fit(&alternatives, 2).unwrap().id;
    scheduler
        .reserve(&booking(second_table, at(90), 30, 2), T0)
        .unwrap();

    // Back-to-back on table 2 right after the dinner slot works
    scheduler
        .reserve(&booking(tables[1], at(150), 60, 2), T0)
        .unwrap();

    // A party of six: only capacities 6 and 8 fit, 6 wastes least
    let window = TimeWindow::new(at(60), at(150)).unwrap();
    let for_six = scheduler.find_available_tables(window, 6, None).unwrap();
    assert_eq!(
        AvailabilityScheduler::best_fit(&for_six, 6).unwrap().capacity,
        6
    );

    // The dinner party confirms, arrives, eats, leaves
    scheduler.confirm(dinner.id, at(5)).unwrap();
    scheduler.seat(dinner.id, at(62)).unwrap();
    assert_eq!(
        scheduler.get_table(tables[1]).unwrap().state,
        TableState::Occupied
    );
    scheduler.release(tables[1], at(145)).unwrap();
    assert_eq!(
        scheduler.get_reservation(dinner.id).unwrap().status,
        ReservationStatus::Completed
    );

    // The event stream saw the whole evening in order
    let mut sequences = Vec::new();
    while let Ok(event) = events.try_recv() {
        sequences.push(event.sequence);
    }
    let mut sorted = sequences.clone();
    sorted.sort_unstable();
    assert_eq!(sequences, sorted);
    assert!(!sequences.is_empty());
}

#[test]
fn cancellation_reopens_the_slot() {
    let scheduler =
        AvailabilityScheduler::new(FloorStorage::open_in_memory().unwrap(), FloorConfig::builtin());
    let tables = build_floor(&scheduler);

    let first = scheduler
        .reserve(&booking(tables[2], at(60), 90, 4), T0)
        .unwrap();
    scheduler.cancel(first.id, Some("plans changed"), at(10)).unwrap();

    // The identical window books cleanly now
    let second = scheduler
        .reserve(&booking(tables[2], at(60), 90, 4), at(10))
        .unwrap();
    assert_eq!(second.status, ReservationStatus::Pending);
}

#[test]
fn no_show_sweep_restores_the_floor() {
    let scheduler = Arc::new(AvailabilityScheduler::new(
        FloorStorage::open_in_memory().unwrap(),
        FloorConfig::builtin(),
    ));
    let tables = build_floor(&scheduler);
    let reclaimer = IdleReclaimer::new(
        scheduler.clone(),
        tokio_util::sync::CancellationToken::new(),
    );

    // Booked for "in ten minutes", confirmed, table held - nobody shows up
    let ghost = scheduler
        .reserve(&booking(tables[0], at(10), 60, 2), T0)
        .unwrap();
    scheduler.confirm(ghost.id, T0).unwrap();
    assert_eq!(
        scheduler.get_table(tables[0]).unwrap().state,
        TableState::Reserved
    );

    // Meanwhile a walk-in sits at table 3 and is forgotten entirely
    scheduler
        .occupy(
            &WalkInRequest {
                table_id: tables[2],
                party_size: 3,
                estimated_minutes: 90,
            },
            T0,
        )
        .unwrap();

    // Hours later one sweep cleans up both
    let stats = reclaimer.sweep_once(at(200));
    assert_eq!(stats.no_shows + stats.expired, 1);
    assert_eq!(stats.released, 1);
    assert_eq!(
        scheduler.get_reservation(ghost.id).unwrap().status,
        ReservationStatus::Cancelled
    );
    assert_eq!(
        scheduler.get_table(tables[0]).unwrap().state,
        TableState::Free
    );
    assert_eq!(
        scheduler.get_table(tables[2]).unwrap().state,
        TableState::Free
    );
}

#[test]
fn floor_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("floor.redb");

    let (table_id, reservation_id) = {
        let scheduler = AvailabilityScheduler::new(
            FloorStorage::open(&path).unwrap(),
            FloorConfig::builtin(),
        );
        let tables = build_floor(&scheduler);
        let reservation = scheduler
            .reserve(&booking(tables[3], at(60), 120, 5), T0)
            .unwrap();
        scheduler.confirm(reservation.id, T0).unwrap();
        (tables[3], reservation.id)
    };

    let scheduler =
        AvailabilityScheduler::new(FloorStorage::open(&path).unwrap(), FloorConfig::builtin());
    assert_eq!(scheduler.get_table(table_id).unwrap().capacity, 6);
    assert_eq!(
        scheduler.get_reservation(reservation_id).unwrap().status,
        ReservationStatus::Confirmed
    );

    // The booked window is still blocked after the restart
    let err = scheduler
        .reserve(&booking(table_id, at(90), 30, 2), T0)
        .unwrap_err();
    assert!(matches!(err, FloorError::Conflict { .. }));
}

#[tokio::test]
async fn background_reclaimer_frees_abandoned_table() {
    let mut config = FloorConfig::builtin();
    config.sweep_interval_secs = 1;
    config.max_occupancy_minutes = 120;

    let scheduler = Arc::new(AvailabilityScheduler::new(
        FloorStorage::open_in_memory().unwrap(),
        config,
    ));
    let now = now_millis();
    let table = scheduler
        .register_table(
            &DiningTableCreate {
                number: 12,
                capacity: 4,
                location: "Main Hall".to_string(),
            },
            now - minutes_to_millis(200),
        )
        .unwrap();

    // Seated over three hours ago, never checked out
    scheduler
        .occupy(
            &WalkInRequest {
                table_id: table.id,
                party_size: 2,
                estimated_minutes: 90,
            },
            now - minutes_to_millis(200),
        )
        .unwrap();

    let mut tasks = BackgroundTasks::new();
    let reclaimer = IdleReclaimer::new(scheduler.clone(), tasks.shutdown_token());
    tasks.spawn("idle_reclaimer", TaskKind::Periodic, reclaimer.run());

    // The first sweep fires immediately
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    assert_eq!(
        scheduler.get_table(table.id).unwrap().state,
        TableState::Free
    );
    assert_eq!(tasks.check_health(), 0);
    tasks.shutdown().await;
}
