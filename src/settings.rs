//! Deployment settings
//!
//! Supplied once at startup and not user-editable. `Default` is the
//! reference deployment (three TMU campuses, Tokyo Station as the target).

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::geo::Coordinate;
use crate::proximity::NamedLocation;

/// Options handed to the platform geolocation watch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    /// Give up on a single reading after this long (ms)
    pub timeout_ms: u32,
    /// Accept cached readings up to this age (ms)
    pub maximum_age_ms: u32,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: WATCH_TIMEOUT_MS,
            maximum_age_ms: WATCH_MAXIMUM_AGE_MS,
        }
    }
}

/// Check-in deployment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Check-in locations, in tie-break order
    pub locations: Vec<NamedLocation>,
    /// Display-only destination; never used for proximity
    pub target: Coordinate,
    /// Check-in radius (meters)
    pub checkin_radius_meters: f64,
    /// Fixes older than this are stale (ms)
    pub max_fix_age_ms: i64,
    /// Simulated delay before a push lands (ms)
    pub push_delay_ms: u32,
    pub watch: WatchOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locations: vec![
                NamedLocation::new(
                    "南大沢",
                    35.623500,
                    139.376500,
                    "本部・文理全般。多摩ニュータウンの奥座敷。",
                ),
                NamedLocation::new(
                    "日野",
                    35.661577,
                    139.366481,
                    "システムデザイン学部。工業団地の要塞。",
                ),
                NamedLocation::new(
                    "荒川",
                    35.750036,
                    139.771859,
                    "健康福祉学部。都電が走る牧歌的下町。",
                ),
            ],
            target: Coordinate::new(35.681236, 139.767125),
            checkin_radius_meters: CHECKIN_RADIUS_METERS,
            max_fix_age_ms: MAX_FIX_AGE_MS,
            push_delay_ms: PUSH_DELAY_MS,
            watch: WatchOptions::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take reference defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Look up a location by name
    pub fn location(&self, name: &str) -> Option<&NamedLocation> {
        self.locations.iter().find(|l| l.name == name)
    }

    /// Distance from a campus to the display target (meters)
    pub fn distance_to_target(&self, location: &NamedLocation) -> f64 {
        location.coordinate().distance_to(&self.target)
    }
}
