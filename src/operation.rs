//! Check-in desk
//!
//! Sits between the coordinate stream and the profile:
//! - keeps the latest fix (or sensing error)
//! - derives the status line shown to the operative
//! - guards the push so one gesture records at most one action
//!
//! Everything runs on the UI thread; the guard is an `Rc<Cell<bool>>`
//! released when the [`PushTicket`] drops, including when the push task is
//! aborted mid-flight.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use log::{debug, info};
use thiserror::Error;

use crate::geo::Coordinate;
use crate::persistence::{ProfileStore, StorageError};
use crate::profile::ProfileManager;
use crate::proximity::{ProximityError, ProximityResult, evaluate};
use crate::random::RandomSource;
use crate::settings::Settings;

/// One reading from the coordinate source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFix {
    pub coordinate: Coordinate,
    /// When the reading was received (Unix ms)
    pub timestamp_ms: i64,
}

/// Sensing capability absent or denied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("geolocation unavailable: {message}")]
pub struct GeolocationUnavailable {
    pub message: String,
}

impl GeolocationUnavailable {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PushError {
    #[error("no fresh position fix")]
    NoFix,
    #[error("out of range: nearest is {nearest} at {distance_meters:.0}m")]
    OutOfRange {
        nearest: String,
        distance_meters: f64,
    },
    #[error("a push is already in flight")]
    InFlight,
    /// The push was counted in memory but could not be saved
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Status line for the check-in view
#[derive(Debug, Clone, PartialEq)]
pub enum StatusLine {
    GpsError(String),
    /// No fix yet, or the last one went stale
    Triangulating,
    Locked { name: String, distance_meters: f64 },
    OutOfRange { name: String, distance_meters: f64 },
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLine::GpsError(message) => write!(f, "GPS Error: {message}"),
            StatusLine::Triangulating => write!(f, "測位中 (Triangulating)..."),
            StatusLine::Locked {
                name,
                distance_meters,
            } => write!(f, "目標ロック: {name} ({}m)", distance_meters.round() as i64),
            StatusLine::OutOfRange {
                name,
                distance_meters,
            } => write!(f, "射程圏外。最寄: {name} ({}m)", distance_meters.round() as i64),
        }
    }
}

/// Holds the push guard. Dropping it re-enables pushing.
#[must_use]
pub struct PushTicket {
    in_flight: Rc<Cell<bool>>,
}

impl Drop for PushTicket {
    fn drop(&mut self) {
        self.in_flight.set(false);
    }
}

pub struct CheckInDesk {
    settings: Settings,
    latest: Option<GeoFix>,
    error: Option<GeolocationUnavailable>,
    in_flight: Rc<Cell<bool>>,
}

impl CheckInDesk {
    /// Fails when `settings` has no locations to check in at
    pub fn new(settings: Settings) -> Result<Self, ProximityError> {
        if settings.locations.is_empty() {
            return Err(ProximityError::EmptyInput);
        }
        Ok(Self {
            settings,
            latest: None,
            error: None,
            in_flight: Rc::new(Cell::new(false)),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Latest reading wins; a fix clears any earlier sensing error
    pub fn update_fix(&mut self, fix: GeoFix) {
        debug!(
            "Fix {:.6},{:.6}",
            fix.coordinate.latitude, fix.coordinate.longitude
        );
        self.latest = Some(fix);
        self.error = None;
    }

    pub fn report_error(&mut self, error: GeolocationUnavailable) {
        info!("{error}");
        self.error = Some(error);
    }

    pub fn latest_fix(&self) -> Option<GeoFix> {
        self.latest
    }

    pub fn error(&self) -> Option<&GeolocationUnavailable> {
        self.error.as_ref()
    }

    /// Latest fix, unless it is older than `max_fix_age_ms` or not a real position
    pub fn fresh_fix(&self, now_ms: i64) -> Option<GeoFix> {
        self.latest.filter(|fix| {
            fix.coordinate.is_finite() && now_ms - fix.timestamp_ms <= self.settings.max_fix_age_ms
        })
    }

    /// Evaluate the fresh fix against the configured locations
    pub fn proximity(&self, now_ms: i64) -> Option<ProximityResult> {
        let fix = self.fresh_fix(now_ms)?;
        // new() rejects an empty location set, so this cannot fail
        evaluate(
            fix.coordinate,
            &self.settings.locations,
            self.settings.checkin_radius_meters,
        )
        .ok()
    }

    pub fn status(&self, now_ms: i64) -> StatusLine {
        if let Some(error) = &self.error {
            return StatusLine::GpsError(error.message.clone());
        }
        match self.proximity(now_ms) {
            None => StatusLine::Triangulating,
            Some(result) if result.within_radius => StatusLine::Locked {
                name: result.nearest.name,
                distance_meters: result.distance_meters,
            },
            Some(result) => StatusLine::OutOfRange {
                name: result.nearest.name,
                distance_meters: result.distance_meters,
            },
        }
    }

    pub fn is_push_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    /// Take the push guard if in range and no push is pending
    pub fn begin_push(&self, now_ms: i64) -> Result<PushTicket, PushError> {
        if self.in_flight.get() {
            return Err(PushError::InFlight);
        }
        let result = self.proximity(now_ms).ok_or(PushError::NoFix)?;
        if !result.within_radius {
            return Err(PushError::OutOfRange {
                nearest: result.nearest.name,
                distance_meters: result.distance_meters,
            });
        }
        self.in_flight.set(true);
        Ok(PushTicket {
            in_flight: Rc::clone(&self.in_flight),
        })
    }
}

/// Run one push: take the guard, wait out `delay`, record the action
///
/// Wrap in `futures::future::abortable` to cancel; an aborted push records
/// nothing and releases the guard once the task is dropped. Neither cell is
/// borrowed across the await.
pub async fn push<S, R, D>(
    desk: &RefCell<CheckInDesk>,
    profiles: &RefCell<ProfileManager<S, R>>,
    now_ms: i64,
    delay: D,
) -> Result<u64, PushError>
where
    S: ProfileStore,
    R: RandomSource,
    D: Future<Output = ()>,
{
    let ticket = desk.borrow().begin_push(now_ms)?;
    delay.await;
    let total = profiles.borrow_mut().record_action()?;
    drop(ticket);
    Ok(total)
}
