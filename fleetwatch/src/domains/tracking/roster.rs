use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

use fleetwatch_model::{Driver, DriverId, Location, PositionUpdate};
use log::warn;

/// Result of applying one position report to the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// No roster entry has this identity; the report was dropped.
    UnknownDriver,
}

/// Drivers tracked by a live view, in initial-fetch order.
///
/// Holds at most one entry per identity. The index maps identity to the
/// entry's position in `drivers` and is only rebuilt on seeding, since
/// updates never insert, remove or reorder.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    drivers: Vec<Driver>,
    index: HashMap<DriverId, usize>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a full fetch. A repeated identity keeps its first record
    /// and position.
    pub fn from_drivers(drivers: impl IntoIterator<Item = Driver>) -> Self {
        let iter = drivers.into_iter();
        let mut roster = Self {
            drivers: Vec::with_capacity(iter.size_hint().0),
            index: HashMap::with_capacity(iter.size_hint().0),
        };

        for driver in iter {
            if roster.index.contains_key(&driver.id) {
                warn!(
                    "Duplicate driver {} in fetch result, keeping first",
                    driver.id
                );
                continue;
            }
            roster.index.insert(driver.id.clone(), roster.drivers.len());
            roster.drivers.push(driver);
        }
        roster
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Driver> {
        self.index.get(id).map(|&pos| &self.drivers[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Driver> {
        self.drivers.iter()
    }

    /// Replace the location of the matching driver and nothing else. Unknown
    /// identities are dropped, never inserted.
    pub fn apply_position_update(
        &mut self,
        id: &DriverId,
        location: Location,
    ) -> ApplyOutcome {
        match self.index.get(id) {
            Some(&pos) => {
                self.drivers[pos].location = Some(location);
                ApplyOutcome::Applied
            }
            None => ApplyOutcome::UnknownDriver,
        }
    }

    pub fn apply(&mut self, update: &PositionUpdate) -> ApplyOutcome {
        self.apply_position_update(&update.driver_id, update.location())
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        RosterSnapshot(Arc::from(self.drivers.as_slice()))
    }
}

/// Immutable, cheaply clonable copy of the roster at one point in time.
///
/// Taking one copies every driver, and lookups on it are O(n).
#[derive(Debug, Clone, PartialEq)]
pub struct RosterSnapshot(Arc<[Driver]>);

impl RosterSnapshot {
    pub fn drivers(&self) -> &[Driver] {
        &self.0
    }

    /// Linear scan; the identity index stays with the [`Roster`].
    pub fn get(&self, id: &str) -> Option<&Driver> {
        self.0.iter().find(|driver| driver.id.as_str() == id)
    }
}

impl Default for RosterSnapshot {
    fn default() -> Self {
        RosterSnapshot(Arc::from(Vec::new()))
    }
}

impl Deref for RosterSnapshot {
    type Target = [Driver];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
