//! Loader element abstraction.
//!
//! The dismisser never looks the element up itself: the host hands it
//! something implementing [`LoaderStyle`]. The browser front end wraps a DOM
//! node; headless hosts and tests use [`MemoryElement`].

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Layout state of the loader element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Whatever the page stylesheet specifies.
    #[default]
    Visible,
    /// Removed from layout (`display: none`).
    None,
}

impl DisplayMode {
    /// Inline CSS value for this mode. An empty value clears the inline
    /// override and leaves the stylesheet in charge.
    #[must_use]
    pub const fn css_value(self) -> &'static str {
        match self {
            Self::Visible => "",
            Self::None => "none",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visible => write!(f, "visible"),
            Self::None => write!(f, "none"),
        }
    }
}

/// CSS `transition` value animating opacity over `duration`.
#[must_use]
pub fn opacity_transition(duration: Duration) -> String {
    format!("opacity {}ms", duration.as_millis())
}

/// Style operations the dismisser performs on the loader element.
/// This trait allows for mocking in tests.
#[cfg_attr(test, mockall::automock)]
pub trait LoaderStyle {
    /// Animate future opacity changes over `duration`.
    fn set_transition(&self, duration: Duration) -> Result<()>;

    /// Set the element opacity (0.0 - 1.0).
    fn set_opacity(&self, opacity: f64) -> Result<()>;

    /// Set the element's layout state.
    fn set_display(&self, display: DisplayMode) -> Result<()>;
}

/// Observable style state of a [`MemoryElement`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSnapshot {
    /// Current opacity.
    pub opacity: f64,
    /// Current layout state.
    pub display: DisplayMode,
    /// Opacity transition length, if one was set.
    pub transition: Option<Duration>,
}

impl Default for StyleSnapshot {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            display: DisplayMode::Visible,
            transition: None,
        }
    }
}

/// In-memory loader element. Clones share the same style state.
#[derive(Debug, Clone, Default)]
pub struct MemoryElement {
    style: Arc<Mutex<StyleSnapshot>>,
}

impl MemoryElement {
    /// Create a fully visible element with no transition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an element starting from the given style.
    #[must_use]
    pub fn with_style(style: StyleSnapshot) -> Self {
        Self {
            style: Arc::new(Mutex::new(style)),
        }
    }

    /// Copy of the current style state.
    #[must_use]
    pub fn snapshot(&self) -> StyleSnapshot {
        self.style
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update(&self, f: impl FnOnce(&mut StyleSnapshot)) {
        let mut style = self.style.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut style);
    }
}

impl LoaderStyle for MemoryElement {
    fn set_transition(&self, duration: Duration) -> Result<()> {
        self.update(|style| style.transition = Some(duration));
        Ok(())
    }

    fn set_opacity(&self, opacity: f64) -> Result<()> {
        self.update(|style| style.opacity = opacity.clamp(0.0, 1.0));
        Ok(())
    }

    fn set_display(&self, display: DisplayMode) -> Result<()> {
        self.update(|style| style.display = display);
        Ok(())
    }
}
