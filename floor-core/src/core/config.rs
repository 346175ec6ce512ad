use shared::util::minutes_to_millis;

/// Floor scheduling policy configuration
///
/// # Environment variables
///
/// All policy constants can be overridden through environment variables:
///
/// | Env var | Default | Meaning |
/// |---------|---------|---------|
/// | MIN_RESERVATION_MINUTES | 30 | Lower duration bound |
/// | MAX_RESERVATION_MINUTES | 480 | Upper duration bound |
/// | ADVANCE_BOOKING_DAYS | 30 | How far ahead bookings are accepted |
/// | IMMEDIATE_EFFECT_MINUTES | 15 | Reserve-now window that flips the table to Reserved |
/// | MAX_OCCUPANCY_MINUTES | 180 | Idle-occupancy reclaim threshold |
/// | NO_SHOW_GRACE_MINUTES | 15 | Grace period before a no-show is cancelled |
/// | SWEEP_INTERVAL_SECS | 60 | Reclaimer sweep cadence |
/// | UPCOMING_HORIZON_MINUTES | 120 | Default horizon for upcoming-reservation queries |
///
/// The configuration is read once at startup and treated as immutable for
/// the process lifetime.
#[derive(Debug, Clone)]
pub struct FloorConfig {
    /// Lower reservation duration bound (minutes)
    pub min_reservation_minutes: u32,
    /// Upper reservation duration bound (minutes)
    pub max_reservation_minutes: u32,
    /// Bookings further out than this are rejected
    pub advance_booking_days: u32,
    /// A reservation starting within this window also flips the table to Reserved
    pub immediate_effect_minutes: u32,
    /// Occupied tables idle longer than this are force-released
    pub max_occupancy_minutes: u32,
    /// Reserved tables whose reservation start passed by more than this are no-shows
    pub no_show_grace_minutes: u32,
    /// Reclaimer sweep interval (seconds)
    pub sweep_interval_secs: u64,
    /// Default horizon for `list_upcoming` (minutes)
    pub upcoming_horizon_minutes: u32,
}

fn env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl FloorConfig {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            min_reservation_minutes: env_u32("MIN_RESERVATION_MINUTES", 30),
            max_reservation_minutes: env_u32("MAX_RESERVATION_MINUTES", 480),
            advance_booking_days: env_u32("ADVANCE_BOOKING_DAYS", 30),
            immediate_effect_minutes: env_u32("IMMEDIATE_EFFECT_MINUTES", 15),
            max_occupancy_minutes: env_u32("MAX_OCCUPANCY_MINUTES", 180),
            no_show_grace_minutes: env_u32("NO_SHOW_GRACE_MINUTES", 15),
            sweep_interval_secs: std::env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            upcoming_horizon_minutes: env_u32("UPCOMING_HORIZON_MINUTES", 120),
        }
    }

    /// Built-in defaults, independent of the environment
    ///
    /// Used by tests that must not be affected by ambient env vars.
    pub fn builtin() -> Self {
        Self {
            min_reservation_minutes: 30,
            max_reservation_minutes: 480,
            advance_booking_days: 30,
            immediate_effect_minutes: 15,
            max_occupancy_minutes: 180,
            no_show_grace_minutes: 15,
            sweep_interval_secs: 60,
            upcoming_horizon_minutes: 120,
        }
    }

    // ==================== Millisecond helpers ====================

    pub fn immediate_effect_millis(&self) -> i64 {
        minutes_to_millis(self.immediate_effect_minutes)
    }

    pub fn max_occupancy_millis(&self) -> i64 {
        minutes_to_millis(self.max_occupancy_minutes)
    }

    pub fn no_show_grace_millis(&self) -> i64 {
        minutes_to_millis(self.no_show_grace_minutes)
    }

    pub fn advance_booking_millis(&self) -> i64 {
        self.advance_booking_days as i64 * 24 * 60 * 60_000
    }

    pub fn upcoming_horizon_millis(&self) -> i64 {
        minutes_to_millis(self.upcoming_horizon_minutes)
    }
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
