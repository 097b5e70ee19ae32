//! Loader dismissal phases.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::timeline::FadeStep;

/// Where the loader is in its dismissal.
///
/// `Visible -> Fading -> Faded -> Hidden`, with `Hidden` terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderPhase {
    /// Page is still loading; loader fully shown.
    #[default]
    Visible,
    /// Load fired and the transition is set; opacity not yet changed.
    Fading,
    /// Opacity set to zero.
    Faded,
    /// Removed from layout.
    Hidden,
}

impl LoaderPhase {
    /// Whether no further step changes the element.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Hidden)
    }

    /// Phase reached once `step` has been applied.
    ///
    /// Hiding is terminal: a late fade step does not bring the loader back
    /// to `Faded`.
    #[must_use]
    pub const fn after(self, step: FadeStep) -> Self {
        match (self, step) {
            (Self::Hidden, _) | (_, FadeStep::Hide) => Self::Hidden,
            (_, FadeStep::Fade) => Self::Faded,
        }
    }
}

impl fmt::Display for LoaderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visible => write!(f, "visible"),
            Self::Fading => write!(f, "fading"),
            Self::Faded => write!(f, "faded"),
            Self::Hidden => write!(f, "hidden"),
        }
    }
}
