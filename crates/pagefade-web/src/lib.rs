//! `Pagefade` Web - WASM front end.
//!
//! Fades out and hides the page's loading overlay once the window `load`
//! event has fired. With the default `autostart` feature the module does
//! this on its own using production timings; otherwise call `dismissLoader`
//! from JavaScript:
//!
//! ```js
//! const handle = dismissLoader({ elementId: "loader", fadeDurationMs: 400, displayDelayMs: 400 });
//! // later, if the view is torn down before the loader is gone:
//! handle.cancel();
//! ```

pub mod dismiss;
pub mod element;
pub mod logging;

use pagefade_core::FadeConfig;
use tracing::error;
use wasm_bindgen::prelude::*;

pub use dismiss::{DismissHandle, dismiss_on_load};
pub use element::WebElement;

/// Entry point, called automatically when the WASM module is loaded.
#[cfg(feature = "autostart")]
#[wasm_bindgen(start)]
pub fn start() {
    init_runtime();

    if let Err(e) = dismiss_on_load(FadeConfig::production()) {
        error!("Failed to schedule loader dismissal: {e}");
    }
}

/// Schedule the loader dismissal with options from JavaScript.
///
/// `options` may be `undefined`, `null` or an object with any of
/// `elementId`, `fadeDurationMs`, `opacityDelayMs`, `displayDelayMs`;
/// missing fields take the production defaults.
///
/// # Errors
///
/// Throws if the options are malformed, the opacity delay is not shorter
/// than the display delay, or the page has no window.
#[wasm_bindgen(js_name = dismissLoader)]
pub fn dismiss_loader(options: JsValue) -> Result<DismissHandle, JsValue> {
    init_runtime();

    let config = if options.is_undefined() || options.is_null() {
        FadeConfig::default()
    } else {
        serde_wasm_bindgen::from_value::<FadeConfig>(options)
            .map_err(|e| JsValue::from_str(&format!("Invalid loader options: {e}")))?
    };

    dismiss_on_load(config).map_err(|e| {
        error!("Failed to schedule loader dismissal: {e}");
        JsValue::from_str(&e.to_string())
    })
}

/// Panic hook and console logging; safe to call more than once.
fn init_runtime() {
    // Set up better panic messages in the browser console
    console_error_panic_hook::set_once();
    match logging::init_auto() {
        // Installed by an earlier call
        Ok(()) | Err(logging::LoggingError::AlreadyInitialized(_)) => {}
    }
}
