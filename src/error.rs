//! Error types for the rendering pipeline

use std::fmt;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors raised by a render session, one variant per failing stage
#[derive(Error, Debug)]
pub enum RenderError {
    /// The rendering engine could not be started
    #[error("Engine launch failed: {0}")]
    EngineLaunch(String),

    /// The document or one of the resources it references failed to load
    #[error("Failed to load document: {0}")]
    DocumentLoad(String),

    /// Load quiescence or capture did not finish in time
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// The screenshot could not be produced or written
    #[error("Capture failed: {0}")]
    Capture(String),

    /// The engine did not terminate cleanly
    #[error("Engine shutdown failed: {0}")]
    Shutdown(String),
}

/// Pipeline step during which a filesystem operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Composing,
    Materializing,
    PreparingOutput,
    Rendering,
    Cleaning,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Composing => "composing",
            Stage::Materializing => "materializing",
            Stage::PreparingOutput => "preparing output",
            Stage::Rendering => "rendering",
            Stage::Cleaning => "cleaning",
        };
        f.write_str(name)
    }
}

/// Errors surfaced to callers of `Pipeline::run`
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A required request field is missing or empty
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Filesystem failure outside the render session
    #[error("I/O error while {stage}: {source}")]
    Io {
        stage: Stage,
        #[source]
        source: std::io::Error,
    },

    /// The background render worker has stopped
    #[error("Render worker unavailable: {0}")]
    WorkerUnavailable(String),

    /// A render stage failed
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl PipelineError {
    pub(crate) fn io(stage: Stage, source: std::io::Error) -> Self {
        PipelineError::Io { stage, source }
    }

    /// The render-stage cause, if the failure came from the render driver
    pub fn render_error(&self) -> Option<&RenderError> {
        match self {
            PipelineError::Render(e) => Some(e),
            _ => None,
        }
    }

    /// Message safe to show to end users: no paths, no engine detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            PipelineError::InvalidRequest(_) => "Invalid product data.",
            _ => "Failed to generate image.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_errors_convert_into_pipeline_errors() {
        let err: PipelineError = RenderError::Timeout(250).into();
        assert!(matches!(err.render_error(), Some(RenderError::Timeout(250))));
        assert_eq!(err.to_string(), "Operation timed out after 250ms");
    }

    #[test]
    fn public_message_hides_paths() {
        let err = PipelineError::io(
            Stage::PreparingOutput,
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "/srv/secret/artes"),
        );
        assert!(err.to_string().contains("/srv/secret/artes"));
        assert!(!err.public_message().contains("/srv"));
        assert_eq!(err.public_message(), "Failed to generate image.");
    }
}
