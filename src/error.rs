//! Error types for the scatter plot engine.
//!
//! Every failure in this crate is either render-fatal (the incoming dataset
//! is rejected and the previous plot stays on screen) or silently tolerated.
//! Only the render-fatal kinds, plus I/O around configuration and export,
//! surface as [`PlotError`].

use thiserror::Error;

/// Result type alias for canvasplot operations.
pub type Result<T> = std::result::Result<T, PlotError>;

/// Main error type for canvasplot.
#[derive(Error, Debug)]
pub enum PlotError {
    /// Two or more points share the same label. Carries each duplicated
    /// label once, in first-seen order.
    #[error("duplicate point labels: {}", .0.join(", "))]
    DuplicateLabels(Vec<String>),

    /// Positional arrays of an inbound dataset differ in length.
    #[error("positional array '{field}' has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A host message could not be (de)serialized.
    #[error("malformed host message: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be parsed or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rasterizing or encoding a snapshot failed.
    #[error("export error: {0}")]
    Export(String),
}

impl PlotError {
    /// Whether this error aborts a render (as opposed to I/O around it).
    pub fn is_render_fatal(&self) -> bool {
        matches!(
            self,
            PlotError::DuplicateLabels(_) | PlotError::LengthMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_labels_message_lists_values() {
        let err = PlotError::DuplicateLabels(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "duplicate point labels: a, b");
        assert!(err.is_render_fatal());
    }

    #[test]
    fn config_error_is_not_render_fatal() {
        let err = PlotError::Config("bad".into());
        assert!(!err.is_render_fatal());
    }
}
