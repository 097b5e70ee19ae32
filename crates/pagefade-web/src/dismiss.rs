//! Browser scheduling of the loader dismissal.
//!
//! Waits for the window `load` event, finds the loader element, then runs
//! each step on its own browser timer.

use std::cell::OnceCell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use pagefade_core::{
    CancellationToken, Error, FadeConfig, LoaderDismisser, LoaderPhase, Result, StepOutcome,
};
use tracing::{debug, error, info};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{AddEventListenerOptions, Document, Window};

use crate::element::{WebElement, js_error_message};

type SharedDismisser = Rc<OnceCell<LoaderDismisser<WebElement>>>;

/// Handle to a scheduled dismissal.
///
/// Dropping the handle does not stop the dismissal.
#[wasm_bindgen]
pub struct DismissHandle {
    token: CancellationToken,
    dismisser: SharedDismisser,
}

#[wasm_bindgen]
impl DismissHandle {
    /// Stop any step that has not run yet. Already applied styles stay.
    pub fn cancel(&self) {
        self.token.cancel();
        debug!("Loader dismissal cancelled");
    }

    /// Whether [`cancel`](Self::cancel) was called.
    #[wasm_bindgen(js_name = isCancelled)]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Current phase: `visible`, `fading`, `faded` or `hidden`.
    pub fn phase(&self) -> String {
        self.current_phase().to_string()
    }
}

impl DismissHandle {
    /// Current phase; `Visible` until the load event has been handled.
    #[must_use]
    pub fn current_phase(&self) -> LoaderPhase {
        self.dismisser
            .get()
            .map_or(LoaderPhase::Visible, LoaderDismisser::phase)
    }
}

/// Dismiss the loader once the page has loaded.
///
/// The configuration is checked immediately; the element is looked up when
/// the load event fires. If the document has already finished loading, the
/// sequence starts right away.
pub fn dismiss_on_load(config: FadeConfig) -> Result<DismissHandle> {
    config.validate()?;

    let window = web_sys::window().ok_or_else(|| Error::HostUnavailable("window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| Error::HostUnavailable("document".to_string()))?;

    let handle = DismissHandle {
        token: CancellationToken::new(),
        dismisser: Rc::new(OnceCell::new()),
    };

    let token = handle.token.clone();
    let dismisser = Rc::clone(&handle.dismisser);

    if is_loaded(&document) {
        debug!("Document already loaded, dismissing now");
        start(&document, config, token, &dismisser);
    } else {
        let on_load = Closure::once(move || {
            start(&document, config, token, &dismisser);
        });
        add_load_listener(&window, &on_load)?;
        on_load.forget();
    }

    Ok(handle)
}

fn is_loaded(document: &Document) -> bool {
    let state = js_sys::Reflect::get(document, &JsValue::from_str("readyState"))
        .ok()
        .and_then(|state| state.as_string());
    is_complete(state.as_deref())
}

/// Whether a `document.readyState` value means `load` has already fired.
pub(crate) fn is_complete(ready_state: Option<&str>) -> bool {
    ready_state == Some("complete")
}

fn add_load_listener(window: &Window, callback: &Closure<dyn FnMut()>) -> Result<()> {
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    window
        .add_event_listener_with_callback_and_add_event_listener_options(
            "load",
            callback.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(|e| Error::HostUnavailable(format!("load listener: {}", js_error_message(&e))))
}

/// Run the sequence; failures are logged, never thrown into the page.
fn start(
    document: &Document,
    config: FadeConfig,
    token: CancellationToken,
    dismisser: &SharedDismisser,
) {
    if let Err(e) = try_start(document, config, token, dismisser) {
        error!("Failed to dismiss loader: {e}");
    }
}

fn try_start(
    document: &Document,
    config: FadeConfig,
    token: CancellationToken,
    dismisser: &SharedDismisser,
) -> Result<()> {
    let element = WebElement::find_with_fallback(document, &config.element_id)?;
    info!("Found loader element '{}'", element.id());

    let cell = Rc::clone(dismisser);
    let dismisser = match cell.get() {
        Some(existing) => existing,
        None => {
            let created = LoaderDismisser::with_token(element, config, token)?;
            cell.get_or_init(|| created)
        }
    };

    for scheduled in dismisser.on_load()? {
        let cell = Rc::clone(&cell);
        spawn_local(async move {
            TimeoutFuture::new(scheduled.at_ms()).await;
            let Some(dismisser) = cell.get() else {
                return;
            };
            match dismisser.apply(scheduled) {
                Ok(StepOutcome::Applied(phase)) => {
                    debug!("Loader {} step applied, now {phase}", scheduled.step);
                }
                Ok(StepOutcome::Cancelled) => {}
                Err(e) => error!("Loader {} step failed: {e}", scheduled.step),
            }
        });
    }

    Ok(())
}
