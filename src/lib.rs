//! Moving TMU - campus check-in core
//!
//! Core modules:
//! - `geo`: Great-circle distance on a spherical Earth
//! - `proximity`: Nearest configured location and in-range status
//! - `profile`: Persisted operative identity and push counter
//! - `progression`: Rank and achievement threshold tables
//! - `operation`: Check-in desk (latest fix, status line, guarded push)
//! - `impact`: Arithmetic projection of pushes into force and distance
//! - `session`: Mock login identity record
//! - `persistence`: Injected key-value storage (memory / LocalStorage)
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Static deployment configuration

pub mod geo;
pub mod impact;
pub mod operation;
pub mod persistence;
pub mod platform;
pub mod profile;
pub mod progression;
pub mod proximity;
pub mod random;
pub mod session;
pub mod settings;

pub use geo::{Coordinate, compute_distance};
pub use operation::{CheckInDesk, GeoFix, PushError, StatusLine};
pub use profile::{OperativeProfile, ProfileManager};
pub use progression::{AchievementDefinition, Progression, RankDefinition};
pub use proximity::{NamedLocation, ProximityError, ProximityResult, evaluate};
pub use settings::Settings;

/// Deployment constants
pub mod consts {
    /// Mean Earth radius used by the haversine formula (meters)
    pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

    /// Check-in radius around each campus (meters), wide enough to cover a campus
    pub const CHECKIN_RADIUS_METERS: f64 = 1000.0;

    /// Fixes older than this are treated as stale (ms)
    pub const MAX_FIX_AGE_MS: i64 = 5_000;
    /// Simulated round-trip before a push is recorded (ms)
    pub const PUSH_DELAY_MS: u32 = 800;
    /// Periodic re-render so a fix going stale shows without a new reading (ms)
    pub const VIEW_REFRESH_MS: i32 = 1_000;
    const _: () = assert!((VIEW_REFRESH_MS as i64) < MAX_FIX_AGE_MS);

    /// Geolocation watch defaults
    pub const WATCH_TIMEOUT_MS: u32 = 20_000;
    pub const WATCH_MAXIMUM_AGE_MS: u32 = 1_000;

    /// LocalStorage keys
    pub const PROFILE_KEY: &str = "tmu_operative_profile";
    pub const SESSION_KEY: &str = "tmu_tactical_user";
}
