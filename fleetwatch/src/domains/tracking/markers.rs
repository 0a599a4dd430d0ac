//! Projection of roster snapshots onto map markers and text tables.

use std::fmt::{self, Write as _};

use fleetwatch_model::{Driver, DriverId, DriverStatus, Location, StatusTone};

/// Riyadh city center.
pub const DEFAULT_CENTER: Location = Location::new(24.7136, 46.6753);
pub const DEFAULT_ZOOM: u8 = 12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: Location,
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl fmt::Display for MapView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "center ({:.4}, {:.4}), zoom {}",
            self.center.lat, self.center.lng, self.zoom
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub driver_id: DriverId,
    pub position: Location,
    /// `"{name} - {status}"`
    pub popup: String,
    pub tone: StatusTone,
}

/// Human-readable status chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: String,
    pub tone: StatusTone,
}

impl StatusBadge {
    pub fn for_status(status: &DriverStatus) -> Self {
        let label = match status {
            DriverStatus::Available => "Available",
            DriverStatus::Busy => "Busy (on a job)",
            DriverStatus::Off => "Unavailable",
            DriverStatus::Other(raw) => raw.as_str(),
        };
        Self {
            label: label.to_string(),
            tone: status.tone(),
        }
    }
}

/// One marker per located driver, in roster order. Drivers that have not
/// reported a position yet are left off the map.
pub fn markers(drivers: &[Driver]) -> Vec<Marker> {
    drivers
        .iter()
        .filter_map(|driver| {
            let position = driver.location?;
            Some(Marker {
                driver_id: driver.id.clone(),
                position,
                popup: format!("{} - {}", driver.name, driver.status),
                tone: driver.status.tone(),
            })
        })
        .collect()
}

/// Fixed-width table of the roster for terminal output.
pub fn render_table(drivers: &[Driver]) -> String {
    let rows: Vec<[String; 6]> = drivers
        .iter()
        .map(|driver| {
            let (lat, lng) = match driver.location {
                Some(loc) => {
                    (format!("{:.5}", loc.lat), format!("{:.5}", loc.lng))
                }
                None => ("-".to_string(), "-".to_string()),
            };
            [
                driver.id.to_string(),
                driver.name.clone(),
                StatusBadge::for_status(&driver.status).label,
                lat,
                lng,
                driver.vehicle.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();

    let header = ["ID", "NAME", "STATUS", "LAT", "LNG", "VEHICLE"];
    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header.map(str::to_string), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let mut line = String::new();
    for (cell, width) in cells.iter().zip(widths) {
        let _ = write!(line, "{:<width$}  ", cell, width = *width);
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
