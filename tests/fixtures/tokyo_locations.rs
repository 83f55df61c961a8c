//! Real Tokyo-area shooting locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. The city spots cluster within
//! a few kilometers of each other while the day-trip spots sit well
//! outside town, so optimized routes have an obvious shape to assert on.

/// A named spot with coordinates.
#[derive(Debug, Clone)]
pub struct Spot {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Spot {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// Central Tokyo landmarks (good for dense single-day routes)
// ============================================================================

pub const CITY_SPOTS: &[Spot] = &[
    Spot::new("Tokyo Tower", 35.6585805, 139.7454329),
    Spot::new("Zojoji Temple", 35.6574321, 139.7482461),
    Spot::new("Shibuya Crossing", 35.6594945, 139.7005536),
    Spot::new("Meiji Shrine", 35.6763976, 139.6993259),
    Spot::new("Shinjuku Gyoen", 35.6851763, 139.7100665),
    Spot::new("Tokyo Station", 35.6812362, 139.7671248),
    Spot::new("Senso-ji", 35.7147651, 139.7966553),
    Spot::new("Ueno Park", 35.7155818, 139.7745286),
    Spot::new("Tokyo Skytree", 35.7100627, 139.8107004),
];

// ============================================================================
// Tokyo Bay waterfront (sunset / night shoots)
// ============================================================================

pub const BAY_SPOTS: &[Spot] = &[
    Spot::new("Odaiba Seaside Park", 35.6297961, 139.7731979),
    Spot::new("Rainbow Bridge Viewpoint", 35.6365743, 139.7630856),
    Spot::new("Toyosu Market", 35.6425013, 139.7840114),
];

// ============================================================================
// Day-trip spots south of the city (Yokohama / Shonan coast)
// ============================================================================

pub const DAY_TRIP_SPOTS: &[Spot] = &[
    Spot::new("Minato Mirai", 35.4563392, 139.6380137),
    Spot::new("Kamakura Great Buddha", 35.3167461, 139.5353475),
    Spot::new("Enoshima", 35.2990028, 139.4804316),
];
