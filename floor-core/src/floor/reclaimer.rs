//! Idle reclaimer - periodic sweep reclaiming abandoned floor state
//!
//! Real floors drift: parties leave without checkout, reserved guests never
//! arrive. The reclaimer detects tables occupied past the policy threshold
//! and reservations whose start passed without a check-in, and forces the
//! release or cancellation through the scheduler's entry points - it never
//! touches the registry or reservation store directly, preserving the
//! single-choke-point invariant.
//!
//! A table locked by an in-flight user operation is skipped and retried
//! next cycle; per-table failures are logged and swallowed so one stuck
//! table never halts the sweep for the rest of the registry.

use super::error::FloorError;
use super::scheduler::AvailabilityScheduler;
use shared::models::{ReservationStatus, TableState};
use shared::util::now_millis;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Outcome of one sweep cycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    /// Occupied tables force-released
    pub released: usize,
    /// Reserved tables whose booking was cancelled as a no-show
    pub no_shows: usize,
    /// Reservations cancelled because their window fully elapsed
    pub expired: usize,
    /// Tables skipped because a user operation held the lock
    pub skipped: usize,
    /// Per-table failures swallowed and logged
    pub failures: usize,
}

impl SweepStats {
    pub fn is_empty(&self) -> bool {
        *self == SweepStats::default()
    }
}

/// Registered as a `TaskKind::Periodic` task via `BackgroundTasks::spawn`
pub struct IdleReclaimer {
    scheduler: Arc<AvailabilityScheduler>,
    shutdown: CancellationToken,
}

impl IdleReclaimer {
    pub fn new(scheduler: Arc<AvailabilityScheduler>, shutdown: CancellationToken) -> Self {
        Self {
            scheduler,
            shutdown,
        }
    }

    /// Main loop: sweep on a fixed interval until shutdown
    pub async fn run(self) {
        let interval = Duration::from_secs(self.scheduler.config().sweep_interval_secs);
        tracing::info!(interval_secs = interval.as_secs(), "Idle reclaimer started");

        let mut tick = tokio::time::interval(interval);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let stats = self.sweep_once(now_millis());
                    if !stats.is_empty() {
                        tracing::info!(
                            released = stats.released,
                            no_shows = stats.no_shows,
                            expired = stats.expired,
                            skipped = stats.skipped,
                            failures = stats.failures,
                            "Sweep reclaimed floor state"
                        );
                    }
                }
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Idle reclaimer received shutdown signal");
                    return;
                }
            }
        }
    }

    /// One sweep over the registry at the given instant
    ///
    /// Public so tests and operators can force a cycle deterministically.
    pub fn sweep_once(&self, now: i64) -> SweepStats {
        let mut stats = SweepStats::default();
        self.reclaim_idle_occupied(now, &mut stats);
        self.reclaim_no_shows(now, &mut stats);
        self.expire_elapsed(now, &mut stats);
        stats
    }

    /// Occupied tables idle past the max-occupancy threshold are released
    fn reclaim_idle_occupied(&self, now: i64, stats: &mut SweepStats) {
        let tables = match self.scheduler.registry().list_by_state(TableState::Occupied) {
            Ok(tables) => tables,
            Err(e) => {
                stats.failures += 1;
                tracing::error!(error = %e, "Sweep failed to list occupied tables");
                return;
            }
        };

        let threshold = self.scheduler.config().max_occupancy_millis();
        for table in tables {
            let idle = now - table.state_changed_at;
            if idle <= threshold {
                continue;
            }
            match self.scheduler.try_release(table.id, now) {
                Ok(Some(_)) => {
                    stats.released += 1;
                    tracing::warn!(
                        table_id = table.id,
                        number = table.number,
                        idle_minutes = idle / 60_000,
                        "Reclaimed idle occupied table"
                    );
                }
                Ok(None) => stats.skipped += 1,
                Err(e) => {
                    stats.failures += 1;
                    log_sweep_failure(table.id, &e, "Failed to reclaim idle table");
                }
            }
        }
    }

    /// Reserved tables whose holding booking passed its grace period are
    /// no-shows: the booking is cancelled, which also frees the table
    fn reclaim_no_shows(&self, now: i64, stats: &mut SweepStats) {
        let tables = match self.scheduler.registry().list_by_state(TableState::Reserved) {
            Ok(tables) => tables,
            Err(e) => {
                stats.failures += 1;
                tracing::error!(error = %e, "Sweep failed to list reserved tables");
                return;
            }
        };

        let grace = self.scheduler.config().no_show_grace_millis();
        for table in tables {
            let active = match self.scheduler.reservations().list_active_by_table(table.id) {
                Ok(active) => active,
                Err(e) => {
                    stats.failures += 1;
                    log_sweep_failure(table.id, &e, "Failed to list reservations for table");
                    continue;
                }
            };
            // The booking holding the table is the soonest-starting active one
            let Some(holder) = active.first() else {
                continue;
            };
            if holder.start_time + grace >= now {
                continue;
            }

            match self.scheduler.try_cancel(holder.id, Some("no-show"), now) {
                Ok(Some(_)) => {
                    stats.no_shows += 1;
                    tracing::warn!(
                        table_id = table.id,
                        reservation_id = holder.id,
                        "Cancelled no-show reservation"
                    );
                }
                Ok(None) => stats.skipped += 1,
                Err(e) => {
                    stats.failures += 1;
                    log_sweep_failure(table.id, &e, "Failed to cancel no-show");
                }
            }
        }
    }

    /// Active reservations whose whole window elapsed without a check-in:
    /// never-confirmed bookings expire, confirmed ones are no-shows
    fn expire_elapsed(&self, now: i64, stats: &mut SweepStats) {
        let active = match self.scheduler.reservations().list_active() {
            Ok(active) => active,
            Err(e) => {
                stats.failures += 1;
                tracing::error!(error = %e, "Sweep failed to list active reservations");
                return;
            }
        };

        for reservation in active {
            if reservation.end_time() > now {
                continue;
            }
            let reason = match reservation.status {
                ReservationStatus::Pending => "expired",
                ReservationStatus::Confirmed => "no-show",
                _ => continue,
            };
            match self.scheduler.try_cancel(reservation.id, Some(reason), now) {
                Ok(Some(_)) => {
                    stats.expired += 1;
                    tracing::info!(
                        reservation_id = reservation.id,
                        table_id = reservation.table_id,
                        reason,
                        "Cancelled elapsed reservation"
                    );
                }
                Ok(None) => stats.skipped += 1,
                Err(e) => {
                    stats.failures += 1;
                    log_sweep_failure(reservation.table_id, &e, "Failed to expire reservation");
                }
            }
        }
    }
}

fn log_sweep_failure(table_id: i64, error: &FloorError, context: &'static str) {
    tracing::error!(table_id, error = %error, "{}", context);
}
