//! Error types for Ember.

use thiserror::Error;

/// Top-level error type for popup operations.
#[derive(Debug, Error)]
pub enum PopupError {
    /// Overlay errors
    #[error("Overlay error: {0}")]
    Overlay(#[from] OverlayError),

    /// Popup system started without a rendering root
    #[error("No overlay root available; popups are disabled")]
    MissingOverlayRoot,

    /// Popup system started without a game-state owner to register with
    #[error("No game-state owner to register with; popups are disabled")]
    MissingOwner,

    /// Invalid settings value
    #[error("Invalid popup setting `{field}`: {reason}")]
    InvalidSetting {
        /// Setting name
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Overlay-specific errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OverlayError {
    /// The overlay root has been torn down
    #[error("Overlay root has been torn down")]
    TornDown,
}

/// Result type alias for popup operations.
pub type PopupResult<T> = Result<T, PopupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_error_converts() {
        let err: PopupError = OverlayError::TornDown.into();
        assert_eq!(err.to_string(), "Overlay error: Overlay root has been torn down");
    }
}
