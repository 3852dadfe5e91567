use std::path::PathBuf;

/// Errors raised while loading, transforming, rendering or persisting a plot.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// No input path was given on the command line.
    #[error("no input file given")]
    Usage,

    /// The input table could not be read or has the wrong shape.
    #[error("invalid input {}: {reason}", path.display())]
    Input { path: PathBuf, reason: String },

    /// Thresholding removed every row of a spectral table.
    #[error("no spectral points left in {} after magnitude filtering", path.display())]
    EmptyAfterFilter { path: PathBuf },

    /// Drawing or image encoding failed.
    #[error("rendering failed: {0}")]
    Render(String),

    /// The output file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn input(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        PipelineError::Input {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for the failures that stem from the input file itself.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PipelineError::Input { .. } | PipelineError::EmptyAfterFilter { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
