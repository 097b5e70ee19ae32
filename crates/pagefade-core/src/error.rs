//! Error types for Pagefade core operations.

use thiserror::Error;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while dismissing the page loader.
#[derive(Debug, Error)]
pub enum Error {
    /// The hide step would fire before (or together with) the fade step.
    #[error(
        "Opacity delay ({opacity_delay_ms}ms) must be shorter than display delay ({display_delay_ms}ms)"
    )]
    InvertedDelays {
        /// Delay before the opacity change.
        opacity_delay_ms: u32,
        /// Delay before the element is removed from layout.
        display_delay_ms: u32,
    },

    /// No element with the given id exists in the document.
    #[error("Loader element not found: {0}")]
    ElementNotFound(String),

    /// Writing a style property failed.
    #[error("Failed to set style property {property}: {message}")]
    Style {
        /// CSS property being written.
        property: String,
        /// Host error message.
        message: String,
    },

    /// The host environment (window, document) is not available.
    #[error("Host unavailable: {0}")]
    HostUnavailable(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a style error for the given property.
    pub fn style(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Style {
            property: property.into(),
            message: message.into(),
        }
    }
}
