//! DOM-backed loader element.

use std::time::Duration;

use pagefade_core::{
    DisplayMode, Error, FALLBACK_ELEMENT_ID, LoaderStyle, Result, opacity_transition,
};
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

/// The loader overlay node, written through its inline style.
pub struct WebElement {
    id: String,
    element: HtmlElement,
}

impl WebElement {
    /// Look up the loader by id.
    pub fn find(document: &Document, id: &str) -> Result<Self> {
        let element = document
            .get_element_by_id(id)
            .ok_or_else(|| Error::ElementNotFound(id.to_string()))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| Error::Configuration(format!("element '{id}' is not an HTML element")))?;

        Ok(Self {
            id: id.to_string(),
            element,
        })
    }

    /// Look up the loader by id, falling back to [`FALLBACK_ELEMENT_ID`].
    pub fn find_with_fallback(document: &Document, id: &str) -> Result<Self> {
        resolve_with_fallback(id, |candidate| Self::find(document, candidate))
    }

    /// Id the element was found under.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    fn set_property(&self, property: &str, value: &str) -> Result<()> {
        self.element
            .style()
            .set_property(property, value)
            .map_err(|e| Error::style(property, js_error_message(&e)))
    }
}

impl LoaderStyle for WebElement {
    fn set_transition(&self, duration: Duration) -> Result<()> {
        self.set_property("transition", &opacity_transition(duration))
    }

    fn set_opacity(&self, opacity: f64) -> Result<()> {
        self.set_property("opacity", &opacity_value(opacity))
    }

    fn set_display(&self, display: DisplayMode) -> Result<()> {
        self.set_property("display", display.css_value())
    }
}

/// Run `lookup` for `id`, then for [`FALLBACK_ELEMENT_ID`] if `id` is absent.
///
/// Only a missing primary triggers the fallback. A missing fallback is
/// reported under the primary id; any other fallback error is kept.
pub(crate) fn resolve_with_fallback<T>(
    id: &str,
    lookup: impl Fn(&str) -> Result<T>,
) -> Result<T> {
    match lookup(id) {
        Err(Error::ElementNotFound(_)) if id != FALLBACK_ELEMENT_ID => {
            debug!("No element '{id}', trying '{FALLBACK_ELEMENT_ID}'");
            lookup(FALLBACK_ELEMENT_ID).map_err(|e| match e {
                Error::ElementNotFound(_) => Error::ElementNotFound(id.to_string()),
                other => other,
            })
        }
        result => result,
    }
}

/// CSS value for an opacity, clamped to 0 - 1.
pub(crate) fn opacity_value(opacity: f64) -> String {
    format!("{}", opacity.clamp(0.0, 1.0))
}

/// Best-effort message from a thrown JS value.
pub(crate) fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}
