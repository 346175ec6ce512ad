use super::*;

#[test]
fn future_reservation_leaves_table_free() {
    let scheduler = create_test_scheduler();
    let table = register(&scheduler, 1, 4, "Main Hall");

    let reservation = scheduler
        .reserve(&booking(table.id, at(120), 90, 4), T0)
        .unwrap();

    assert_eq!(reservation.status, ReservationStatus::Pending);
    assert_eq!(reservation.party_size, 4);
    assert_eq!(
        scheduler.get_table(table.id).unwrap().state,
        TableState::Free
    );
}

#[test]
fn immediate_reservation_holds_the_table() {
    let scheduler = create_test_scheduler();
    let table = register(&scheduler, 1, 4, "Main Hall");

    // Starts within the immediate-effect threshold (15 minutes)
    scheduler
        .reserve(&booking(table.id, at(10), 60, 2), T0)
        .unwrap();

    assert_eq!(
        scheduler.get_table(table.id).unwrap().state,
        TableState::Reserved
    );
}

#[test]
fn start_exactly_at_threshold_is_immediate() {
    let scheduler = create_test_scheduler();
    let table = register(&scheduler, 1, 4, "Main Hall");

    scheduler
        .reserve(&booking(table.id, at(15), 60, 2), T0)
        .unwrap();

    assert_eq!(
        scheduler.get_table(table.id).unwrap().state,
        TableState::Reserved
    );
}

#[test]
fn overlapping_reservation_is_a_conflict() {
    let scheduler = create_test_scheduler();
    let table = register(&scheduler, 5, 4, "Main Hall");

    let first = scheduler
        .reserve(&booking(table.id, at(60), 90, 4), T0)
        .unwrap();

    // A smaller party inside the booked window
    let err = scheduler
        .reserve(&booking(table.id, at(90), 30, 2), T0)
        .unwrap_err();

    match err {
        FloorError::Conflict {
            table_id,
            reservation_id,
            ..
        } => {
            assert_eq!(table_id, table.id);
            assert_eq!(reservation_id, first.id);
        }
        other => panic!("expected conflict, got {other}"),
    }
}

#[test]
fn back_to_back_reservations_both_succeed() {
    let scheduler = create_test_scheduler();
    let table = register(&scheduler, 5, 4, "Main Hall");

    scheduler
        .reserve(&booking(table.id, at(60), 90, 4), T0)
        .unwrap();
    // Starts exactly when the first one ends
    scheduler
        .reserve(&booking(table.id, at(150), 60, 2), T0)
        .unwrap();

    let active = scheduler.reservations().list_active_by_table(table.id).unwrap();
    assert_eq!(active.len(), 2);
}

#[test]
fn party_larger_than_capacity_is_rejected() {
    let scheduler = create_test_scheduler();
    let table = register(&scheduler, 1, 4, "Main Hall");

    let err = scheduler
        .reserve(&booking(table.id, at(60), 90, 6), T0)
        .unwrap_err();

    assert!(matches!(
        err,
        FloorError::CapacityExceeded {
            capacity: 4,
            party_size: 6,
            ..
        }
    ));
}

#[test]
fn best_fit_minimizes_wasted_seats() {
    let scheduler = create_test_scheduler();
    register(&scheduler, 1, 4, "Main Hall");
    register(&scheduler, 2, 8, "Main Hall");
    register(&scheduler, 3, 6, "Main Hall");

    let window = TimeWindow::new(at(60), at(150)).unwrap();
    let candidates = scheduler.find_available_tables(window, 6, None).unwrap();

    // Capacity 4 is insufficient; 6 wastes nothing
    let best = AvailabilityScheduler::best_fit(&candidates, 6).unwrap();
    assert_eq!(best.capacity, 6);
}

#[test]
fn best_fit_skips_insufficient_capacity() {
    let scheduler = create_test_scheduler();
    register(&scheduler, 1, 4, "Main Hall");
    register(&scheduler, 2, 8, "Main Hall");

    let window = TimeWindow::new(at(60), at(150)).unwrap();
    let candidates = scheduler.find_available_tables(window, 6, None).unwrap();

    // The four-top cannot hold six; the eight-top wins despite the waste
    let best = AvailabilityScheduler::best_fit(&candidates, 6).unwrap();
    assert_eq!(best.capacity, 8);
}

#[test]
fn best_fit_breaks_ties_by_table_number() {
    let scheduler = create_test_scheduler();
    register(&scheduler, 9, 8, "Main Hall");
    register(&scheduler, 2, 8, "Main Hall");

    let window = TimeWindow::new(at(60), at(150)).unwrap();
    let candidates = scheduler.find_available_tables(window, 6, None).unwrap();

    let best = AvailabilityScheduler::best_fit(&candidates, 6).unwrap();
    assert_eq!(best.number, 2);
}

#[test]
fn best_fit_of_nothing_is_none() {
    assert!(AvailabilityScheduler::best_fit(&[], 4).is_none());
}

#[test]
fn availability_filters_capacity_location_and_maintenance() {
    let scheduler = create_test_scheduler();
    let small = register(&scheduler, 1, 2, "Terrace");
    let terrace = register(&scheduler, 2, 4, "Terrace");
    let hall = register(&scheduler, 3, 4, "Main Hall");
    let broken = register(&scheduler, 4, 4, "Terrace");
    scheduler
        .set_maintenance(broken.id, Some("wobbly"), T0)
        .unwrap();

    let window = TimeWindow::new(at(60), at(150)).unwrap();
    let available = scheduler
        .find_available_tables(window, 4, Some("Terrace"))
        .unwrap();

    let ids: Vec<i64> = available.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![terrace.id]);
    assert!(!ids.contains(&small.id));
    assert!(!ids.contains(&hall.id));
    assert!(!ids.contains(&broken.id));
}

#[test]
fn availability_excludes_conflicting_windows() {
    let scheduler = create_test_scheduler();
    let table = register(&scheduler, 1, 4, "Main Hall");
    let other = register(&scheduler, 2, 4, "Main Hall");
    scheduler
        .reserve(&booking(table.id, at(60), 90, 2), T0)
        .unwrap();

    let window = TimeWindow::new(at(90), at(120)).unwrap();
    let available = scheduler.find_available_tables(window, 2, None).unwrap();

    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, other.id);
}

#[test]
fn availability_is_idempotent() {
    let scheduler = create_test_scheduler();
    register(&scheduler, 1, 4, "Main Hall");
    register(&scheduler, 2, 6, "Terrace");
    let table = register(&scheduler, 3, 2, "Main Hall");
    scheduler
        .reserve(&booking(table.id, at(60), 60, 2), T0)
        .unwrap();

    let window = TimeWindow::new(at(30), at(90)).unwrap();
    let first = scheduler.find_available_tables(window, 2, None).unwrap();
    let second = scheduler.find_available_tables(window, 2, None).unwrap();

    let first_ids: Vec<i64> = first.iter().map(|t| t.id).collect();
    let second_ids: Vec<i64> = second.iter().map(|t| t.id).collect();
    assert_eq!(first_ids, second_ids);
}

#[test]
fn confirm_validates_without_seating() {
    let scheduler = create_test_scheduler();
    let table = register(&scheduler, 1, 4, "Main Hall");
    let reservation = scheduler
        .reserve(&booking(table.id, at(60), 90, 2), T0)
        .unwrap();

    let confirmed = scheduler.confirm(reservation.id, at(5)).unwrap();
    assert_eq!(confirmed.status, ReservationStatus::Confirmed);
    // Seating is explicit - the table does not move
    assert_eq!(
        scheduler.get_table(table.id).unwrap().state,
        TableState::Free
    );
}

#[test]
fn seat_requires_a_confirmed_reservation() {
    let scheduler = create_test_scheduler();
    let table = register(&scheduler, 1, 4, "Main Hall");
    let reservation = scheduler
        .reserve(&booking(table.id, at(60), 90, 2), T0)
        .unwrap();

    let err = scheduler.seat(reservation.id, at(60)).unwrap_err();
    assert!(matches!(
        err,
        FloorError::ReservationNotConfirmed {
            status: ReservationStatus::Pending,
            ..
        }
    ));
}

#[test]
fn seat_occupies_the_table() {
    let scheduler = create_test_scheduler();
    let table = register(&scheduler, 1, 4, "Main Hall");
    let reservation = scheduler
        .reserve(&booking(table.id, at(10), 90, 2), T0)
        .unwrap();
    scheduler.confirm(reservation.id, T0).unwrap();

    scheduler.seat(reservation.id, at(10)).unwrap();
    assert_eq!(
        scheduler.get_table(table.id).unwrap().state,
        TableState::Occupied
    );
}

#[test]
fn release_completes_the_started_booking() {
    let scheduler = create_test_scheduler();
    let table = register(&scheduler, 1, 4, "Main Hall");
    let reservation = scheduler
        .reserve(&booking(table.id, at(10), 90, 2), T0)
        .unwrap();
    scheduler.confirm(reservation.id, T0).unwrap();
    scheduler.seat(reservation.id, at(12)).unwrap();

    let released = scheduler.release(table.id, at(100)).unwrap();
    assert_eq!(released.state, TableState::Free);
    assert_eq!(
        scheduler.get_reservation(reservation.id).unwrap().status,
        ReservationStatus::Completed
    );
}

#[test]
fn release_leaves_future_bookings_untouched() {
    let scheduler = create_test_scheduler();
    let table = register(&scheduler, 1, 4, "Main Hall");
    scheduler.occupy(&walk_in(table.id, 2, 60), T0).unwrap();

    let future = scheduler
        .reserve(&booking(table.id, at(180), 90, 2), T0)
        .unwrap();
    scheduler.confirm(future.id, T0).unwrap();

    scheduler.release(table.id, at(45)).unwrap();
    assert_eq!(
        scheduler.get_reservation(future.id).unwrap().status,
        ReservationStatus::Confirmed
    );
}

#[test]
fn unknown_ids_are_not_found() {
    let scheduler = create_test_scheduler();
    assert!(matches!(
        scheduler.get_table(12345).unwrap_err(),
        FloorError::TableNotFound(12345)
    ));
    assert!(matches!(
        scheduler.get_reservation(6789).unwrap_err(),
        FloorError::ReservationNotFound(6789)
    ));
    assert!(matches!(
        scheduler.release(12345, T0).unwrap_err(),
        FloorError::TableNotFound(12345)
    ));
}

#[test]
fn events_carry_increasing_sequence_numbers() {
    let scheduler = create_test_scheduler();
    let mut rx = scheduler.subscribe();

    let table = register(&scheduler, 1, 4, "Main Hall");
    scheduler
        .reserve(&booking(table.id, at(10), 60, 2), T0)
        .unwrap();

    let registered = rx.try_recv().unwrap();
    assert_eq!(registered.event_type, FloorEventType::TableRegistered);

    // Immediate booking: the table hold precedes the reservation record
    let held = rx.try_recv().unwrap();
    assert_eq!(held.event_type, FloorEventType::TableStateChanged);
    let created = rx.try_recv().unwrap();
    assert_eq!(created.event_type, FloorEventType::ReservationCreated);

    assert!(registered.sequence < held.sequence);
    assert!(held.sequence < created.sequence);
}

#[test]
fn failed_operations_emit_no_events() {
    let scheduler = create_test_scheduler();
    let table = register(&scheduler, 1, 4, "Main Hall");
    scheduler
        .reserve(&booking(table.id, at(60), 90, 2), T0)
        .unwrap();

    let mut rx = scheduler.subscribe();
    let _ = scheduler
        .reserve(&booking(table.id, at(90), 30, 2), T0)
        .unwrap_err();

    assert!(rx.try_recv().is_err());
}
