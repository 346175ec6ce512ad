//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Occupancy state of a dining table.
///
/// Exactly one state per table at any instant. The scheduler is the only
/// component that performs transitions; [`TableState::can_transition_to`]
/// is the authoritative transition table:
///
/// ```text
/// Free        -> Occupied    (walk-in seating / order opened)
/// Free        -> Reserved    (reservation effective now or soon)
/// Free        -> Maintenance (administrative)
/// Occupied    -> Free        (order closed / table released)
/// Reserved    -> Occupied    (guest arrives and is seated)
/// Reserved    -> Free        (reservation cancelled or expired)
/// Maintenance -> Free        (administrative, cleared)
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableState {
    /// Available for seating or reservation
    #[default]
    Free,
    /// A party is seated at the table
    Occupied,
    /// Held for an imminent reservation
    Reserved,
    /// Out of service
    Maintenance,
}

impl TableState {
    /// Check whether `next` is reachable from this state.
    pub fn can_transition_to(self, next: TableState) -> bool {
        matches!(
            (self, next),
            (TableState::Free, TableState::Occupied)
                | (TableState::Free, TableState::Reserved)
                | (TableState::Free, TableState::Maintenance)
                | (TableState::Occupied, TableState::Free)
                | (TableState::Reserved, TableState::Occupied)
                | (TableState::Reserved, TableState::Free)
                | (TableState::Maintenance, TableState::Free)
        )
    }
}

impl std::fmt::Display for TableState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableState::Free => write!(f, "FREE"),
            TableState::Occupied => write!(f, "OCCUPIED"),
            TableState::Reserved => write!(f, "RESERVED"),
            TableState::Maintenance => write!(f, "MAINTENANCE"),
        }
    }
}

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: i64,
    /// Table number shown on the floor plan (unique, human display)
    pub number: u32,
    pub capacity: u32,
    /// Free-text grouping, e.g. "Terrace" or "Main Hall"
    pub location: String,
    pub state: TableState,
    /// Unix millis of the last state change
    pub state_changed_at: i64,
    /// Unix millis of the last recorded cleaning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_cleaned_at: Option<i64>,
    /// Reason the table is under maintenance, cleared when lifted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_note: Option<String>,
    /// Soft-disable flag; inactive tables never appear in availability queries
    pub is_active: bool,
    pub created_at: i64,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub number: u32,
    pub capacity: u32,
    pub location: String,
}
