//! Real King County / Puget Sound locations for test fixtures.
//!
//! Coordinates sourced from OpenStreetMap; routable with OSRM Washington data.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// Provider depots
// ============================================================================

pub const BELLEVUE_DEPOT: Location = Location::new("Provider 5 base, Bellevue", 47.591956, -122.182784);
pub const SOUTH_PARK_DEPOT: Location = Location::new("Provider 6 base, South Park", 47.530563, -122.322681);

// ============================================================================
// Central Seattle
// ============================================================================

pub const CAPITOL_HILL: Location = Location::new("Broadway & E John St", 47.6195, -122.3208);
pub const FIRST_HILL: Location = Location::new("Harborview Medical Center", 47.6040, -122.3236);
pub const PIONEER_SQUARE: Location = Location::new("Occidental Square", 47.6003, -122.3333);
pub const INTERNATIONAL_DISTRICT: Location = Location::new("Uwajimaya", 47.5983, -122.3265);
pub const BEACON_HILL: Location = Location::new("Beacon Hill Station", 47.5791, -122.3116);
pub const QUEEN_ANNE: Location = Location::new("Kerry Park", 47.6295, -122.3599);

// ============================================================================
// North Seattle
// ============================================================================

pub const UNIVERSITY_DISTRICT: Location = Location::new("UW Medical Center", 47.6500, -122.3075);
pub const FREMONT: Location = Location::new("Fremont Troll", 47.6510, -122.3473);
pub const BALLARD: Location = Location::new("Ballard Locks", 47.6654, -122.3973);
pub const NORTHGATE: Location = Location::new("Northgate Station", 47.7025, -122.3280);

// ============================================================================
// Outlying (beyond any reasonable pickup radius from downtown)
// ============================================================================

pub const TACOMA_DOME: Location = Location::new("Tacoma Dome Station", 47.2392, -122.4270);
pub const EVERETT_STATION: Location = Location::new("Everett Station", 47.9753, -122.1977);
