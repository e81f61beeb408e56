//! Browser geolocation watch
//!
//! `GeoWatch` owns a `navigator.geolocation.watchPosition` subscription.
//! Dropping it clears the watch and frees the JS callbacks.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Geolocation, GeolocationPosition, GeolocationPositionError, PositionOptions};

use crate::geo::Coordinate;
use crate::operation::{GeoFix, GeolocationUnavailable};
use crate::settings::WatchOptions;

pub struct GeoWatch {
    geolocation: Geolocation,
    watch_id: i32,
    _on_fix: Closure<dyn FnMut(GeolocationPosition)>,
    _on_error: Closure<dyn FnMut(GeolocationPositionError)>,
}

impl GeoWatch {
    /// Start watching. Each reading is stamped with the receive time.
    pub fn start<F, E>(
        options: &WatchOptions,
        mut on_fix: F,
        mut on_error: E,
    ) -> Result<Self, GeolocationUnavailable>
    where
        F: FnMut(GeoFix) + 'static,
        E: FnMut(GeolocationUnavailable) + 'static,
    {
        let geolocation = web_sys::window()
            .ok_or_else(|| GeolocationUnavailable::new("no window"))?
            .navigator()
            .geolocation()
            .map_err(|_| GeolocationUnavailable::new("Geolocation not supported"))?;

        let fix_cb = Closure::<dyn FnMut(GeolocationPosition)>::new(
            move |position: GeolocationPosition| {
                let coords = position.coords();
                on_fix(GeoFix {
                    coordinate: Coordinate::new(coords.latitude(), coords.longitude()),
                    timestamp_ms: super::now_ms(),
                });
            },
        );
        let error_cb = Closure::<dyn FnMut(GeolocationPositionError)>::new(
            move |error: GeolocationPositionError| {
                on_error(GeolocationUnavailable::new(error.message()));
            },
        );

        let opts = PositionOptions::new();
        opts.set_enable_high_accuracy(options.high_accuracy);
        opts.set_timeout(options.timeout_ms);
        opts.set_maximum_age(options.maximum_age_ms);

        let watch_id = geolocation
            .watch_position_with_error_callback_and_options(
                fix_cb.as_ref().unchecked_ref(),
                Some(error_cb.as_ref().unchecked_ref()),
                &opts,
            )
            .map_err(|e| GeolocationUnavailable::new(format!("{e:?}")))?;

        log::info!("Geolocation watch {} started", watch_id);

        Ok(Self {
            geolocation,
            watch_id,
            _on_fix: fix_cb,
            _on_error: error_cb,
        })
    }
}

impl Drop for GeoWatch {
    fn drop(&mut self) {
        self.geolocation.clear_watch(self.watch_id);
        log::info!("Geolocation watch {} cleared", self.watch_id);
    }
}
