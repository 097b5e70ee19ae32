//! `Pagefade` Core Library
//!
//! This crate provides the host-independent part of dismissing a page
//! loading overlay once the page has loaded:
//! - Fade configuration with presets and validation
//! - An element abstraction so the overlay can be injected or mocked
//! - The ordered timeline of deferred style changes
//! - Cancellation of steps that have not run yet
//! - A tokio driver for running the sequence outside the browser
//!
//! ```rust
//! use pagefade_core::{FadeConfig, LoaderDismisser, MemoryElement, StepOutcome};
//!
//! let element = MemoryElement::new();
//! let dismisser = LoaderDismisser::new(element.clone(), FadeConfig::production())?;
//! for step in dismisser.on_load()? {
//!     assert!(matches!(dismisser.apply(step)?, StepOutcome::Applied(_)));
//! }
//! assert_eq!(element.snapshot().opacity, 0.0);
//! # Ok::<(), pagefade_core::Error>(())
//! ```

pub mod cancel;
pub mod config;
pub mod dismisser;
#[cfg(feature = "driver")]
pub mod driver;
pub mod element;
pub mod error;
pub mod phase;
pub mod timeline;

pub use cancel::CancellationToken;
pub use config::{
    DEFAULT_DISPLAY_DELAY_MS, DEFAULT_ELEMENT_ID, DEFAULT_FADE_DURATION_MS,
    DEFAULT_OPACITY_DELAY_MS, FALLBACK_ELEMENT_ID, FadeConfig, TIMER_GRANULARITY_MS,
};
pub use dismisser::{LoaderDismisser, StepOutcome};
#[cfg(feature = "driver")]
pub use driver::{DismissReport, run};
pub use element::{DisplayMode, LoaderStyle, MemoryElement, StyleSnapshot, opacity_transition};
pub use error::{Error, Result};
pub use phase::LoaderPhase;
pub use timeline::{FadeStep, FadeTimeline, ScheduledStep};
