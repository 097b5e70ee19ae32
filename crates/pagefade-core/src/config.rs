//! Fade-out configuration for the page loader.
//!
//! A [`FadeConfig`] describes three timings measured from the page's load
//! event:
//! - `fade_duration_ms`: length of the CSS opacity transition
//! - `opacity_delay_ms`: when the opacity is set to zero
//! - `display_delay_ms`: when the element is removed from layout
//!
//! # Example
//!
//! ```rust
//! use pagefade_core::FadeConfig;
//!
//! let config = FadeConfig::production().with_fade_duration_ms(600);
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Default id of the loader element in the page markup.
pub const DEFAULT_ELEMENT_ID: &str = "js-loader";

/// Id tried when [`DEFAULT_ELEMENT_ID`] is absent from the document.
pub const FALLBACK_ELEMENT_ID: &str = "loader";

/// Browsers clamp nested timers to 4ms; snaps shorter than this are noise.
pub const TIMER_GRANULARITY_MS: u64 = 4;

/// Default fade duration in milliseconds.
pub const DEFAULT_FADE_DURATION_MS: u32 = 1000;

/// Default delay before the opacity change, in milliseconds.
/// Non-zero so the transition property is applied before opacity changes.
pub const DEFAULT_OPACITY_DELAY_MS: u32 = 1;

/// Default delay before the element is hidden, in milliseconds.
pub const DEFAULT_DISPLAY_DELAY_MS: u32 = DEFAULT_FADE_DURATION_MS;

/// Timing and target configuration for dismissing the loader.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FadeConfig {
    /// Id of the loader element.
    #[serde(default = "default_element_id")]
    pub element_id: String,

    /// Length of the opacity transition.
    #[serde(default = "default_fade_duration_ms")]
    pub fade_duration_ms: u32,

    /// Delay after load before opacity is set to zero.
    #[serde(default = "default_opacity_delay_ms")]
    pub opacity_delay_ms: u32,

    /// Delay after load before display is set to `none`.
    #[serde(default = "default_display_delay_ms")]
    pub display_delay_ms: u32,
}

fn default_element_id() -> String {
    DEFAULT_ELEMENT_ID.to_string()
}

const fn default_fade_duration_ms() -> u32 {
    DEFAULT_FADE_DURATION_MS
}

const fn default_opacity_delay_ms() -> u32 {
    DEFAULT_OPACITY_DELAY_MS
}

const fn default_display_delay_ms() -> u32 {
    DEFAULT_DISPLAY_DELAY_MS
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl FadeConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Production timings: one second fade, started right after load.
    #[must_use]
    pub fn production() -> Self {
        Self {
            element_id: default_element_id(),
            fade_duration_ms: DEFAULT_FADE_DURATION_MS,
            opacity_delay_ms: DEFAULT_OPACITY_DELAY_MS,
            display_delay_ms: DEFAULT_DISPLAY_DELAY_MS,
        }
    }

    /// Shorter 400ms fade, started right after load.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            element_id: default_element_id(),
            fade_duration_ms: 400,
            opacity_delay_ms: DEFAULT_OPACITY_DELAY_MS,
            display_delay_ms: 400,
        }
    }

    /// Demo timings that keep the loader on screen for a second.
    ///
    /// The hide delay (`500 + fade`) is shorter than the opacity delay, so
    /// [`validate`](Self::validate) rejects this configuration.
    #[must_use]
    pub fn demo() -> Self {
        let fade_duration_ms = 400;
        Self {
            element_id: default_element_id(),
            fade_duration_ms,
            opacity_delay_ms: 1000,
            display_delay_ms: 500 + fade_duration_ms,
        }
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the loader element id.
    #[must_use]
    pub fn with_element_id(mut self, element_id: impl Into<String>) -> Self {
        self.element_id = element_id.into();
        self
    }

    /// Set the fade duration.
    #[must_use]
    pub fn with_fade_duration_ms(mut self, fade_duration_ms: u32) -> Self {
        self.fade_duration_ms = fade_duration_ms;
        self
    }

    /// Set the delay before the opacity change.
    #[must_use]
    pub fn with_opacity_delay_ms(mut self, opacity_delay_ms: u32) -> Self {
        self.opacity_delay_ms = opacity_delay_ms;
        self
    }

    /// Set the delay before the element is hidden.
    #[must_use]
    pub fn with_display_delay_ms(mut self, display_delay_ms: u32) -> Self {
        self.display_delay_ms = display_delay_ms;
        self
    }

    /// Fade duration as a [`Duration`].
    #[must_use]
    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.fade_duration_ms))
    }

    /// Opacity delay as a [`Duration`].
    #[must_use]
    pub fn opacity_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.opacity_delay_ms))
    }

    /// Display delay as a [`Duration`].
    #[must_use]
    pub fn display_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.display_delay_ms))
    }

    /// Whether the element is hidden before the fade has visually finished.
    #[must_use]
    pub fn hides_before_fade_completes(&self) -> bool {
        self.snap_gap_ms() > 0
    }

    /// How long the fade still has to run when the element is hidden.
    #[must_use]
    pub fn snap_gap_ms(&self) -> u64 {
        (u64::from(self.opacity_delay_ms) + u64::from(self.fade_duration_ms))
            .saturating_sub(u64::from(self.display_delay_ms))
    }

    /// Check the configuration without logging.
    ///
    /// The element id must be non-empty and the opacity delay must be
    /// strictly shorter than the display delay.
    pub fn check(&self) -> Result<()> {
        if self.element_id.trim().is_empty() {
            return Err(Error::Configuration(
                "loader element id must not be empty".to_string(),
            ));
        }

        if self.opacity_delay_ms >= self.display_delay_ms {
            return Err(Error::InvertedDelays {
                opacity_delay_ms: self.opacity_delay_ms,
                display_delay_ms: self.display_delay_ms,
            });
        }

        Ok(())
    }

    /// Check the configuration and report a visible snap.
    ///
    /// Hiding before the fade completes is allowed. It is logged as a
    /// warning only when the cut is longer than [`TIMER_GRANULARITY_MS`];
    /// shorter cuts are not noticeable and go to debug.
    pub fn validate(&self) -> Result<()> {
        self.check()?;

        let gap = self.snap_gap_ms();
        if gap > TIMER_GRANULARITY_MS {
            warn!(
                "Loader '{}' is hidden at {}ms, {gap}ms before its fade ends",
                self.element_id, self.display_delay_ms
            );
        } else if gap > 0 {
            debug!(
                "Loader '{}' is hidden {gap}ms before its fade ends",
                self.element_id
            );
        }

        Ok(())
    }
}
