//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time
//! - Geolocation watch (browser only)
//! - Clipboard (browser only)
//! - Timers for the simulated push delay (browser only)

#[cfg(target_arch = "wasm32")]
pub mod geolocation;

#[cfg(target_arch = "wasm32")]
pub use geolocation::GeoWatch;

/// Current Unix time (ms)
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

/// Current Unix time (ms)
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Resolve after `ms` milliseconds via `setTimeout`
#[cfg(target_arch = "wasm32")]
pub async fn sleep_ms(ms: u32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32);
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

/// Write text to the system clipboard. Fire-and-forget.
#[cfg(target_arch = "wasm32")]
pub fn copy_to_clipboard(text: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let promise = window.navigator().clipboard().write_text(text);
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
            log::warn!("Clipboard write failed: {:?}", e);
        }
    });
}
