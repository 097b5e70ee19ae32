//! Deferred steps of the loader dismissal, ordered by when they fire.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::FadeConfig;

/// A deferred style change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FadeStep {
    /// Set opacity to zero.
    Fade,
    /// Remove the element from layout.
    Hide,
}

impl fmt::Display for FadeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fade => write!(f, "fade"),
            Self::Hide => write!(f, "hide"),
        }
    }
}

/// A step and its offset from the load event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledStep {
    /// Offset from the load event.
    pub at: Duration,
    /// What happens at that offset.
    pub step: FadeStep,
}

impl ScheduledStep {
    /// Offset in whole milliseconds, saturating at `u32::MAX`.
    #[must_use]
    pub fn at_ms(&self) -> u32 {
        u32::try_from(self.at.as_millis()).unwrap_or(u32::MAX)
    }
}

/// Steps derived from a [`FadeConfig`], sorted by offset.
///
/// Building a timeline does not validate the configuration; an inverted
/// configuration yields the hide step first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FadeTimeline {
    steps: Vec<ScheduledStep>,
}

impl FadeTimeline {
    /// Build the timeline for `config`.
    #[must_use]
    pub fn from_config(config: &FadeConfig) -> Self {
        let mut steps = vec![
            ScheduledStep {
                at: config.opacity_delay(),
                step: FadeStep::Fade,
            },
            ScheduledStep {
                at: config.display_delay(),
                step: FadeStep::Hide,
            },
        ];
        // Stable: on a tie the fade keeps its place ahead of the hide.
        steps.sort_by_key(|s| s.at);
        Self { steps }
    }

    /// Steps in firing order.
    #[must_use]
    pub fn steps(&self) -> &[ScheduledStep] {
        &self.steps
    }

    /// Offset of the last step.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.steps.last().map_or(Duration::ZERO, |s| s.at)
    }

    /// Offset of the given step, if scheduled.
    #[must_use]
    pub fn offset_of(&self, step: FadeStep) -> Option<Duration> {
        self.steps.iter().find(|s| s.step == step).map(|s| s.at)
    }
}

impl IntoIterator for FadeTimeline {
    type Item = ScheduledStep;
    type IntoIter = std::vec::IntoIter<ScheduledStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}
