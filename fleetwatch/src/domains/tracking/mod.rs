//! Live driver tracking: roster, synchronizer and map projection.

pub mod markers;
pub mod roster;
pub mod tracker;

pub use markers::{MapView, Marker, StatusBadge, markers, render_table};
pub use roster::{ApplyOutcome, Roster, RosterSnapshot};
pub use tracker::{
    LiveTracker, LiveView, TrackerError, TrackerState, TrackerStats,
    UpdateNotice,
};
