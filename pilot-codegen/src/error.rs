//! Error types for pilot-codegen.

use std::path::PathBuf;

use thiserror::Error;

use pilot_renderer::RenderError;

/// All errors that can arise from generating or writing a scaffold.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Rendering one planned file failed; the whole run is aborted.
    #[error("failed to generate {output}: {source}")]
    Render {
        output: String,
        #[source]
        source: RenderError,
    },

    /// A phase-scoped file refers to a phase the model does not have.
    #[error("planned file {output} refers to unknown phase '{phase}'")]
    UnknownPhase { output: String, phase: String },

    /// A planned path would resolve outside the output root.
    #[error("refusing to write '{path}': path must stay under the output root")]
    UnsafePath { path: String },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error (hash store).
    #[error("hash store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error (deployment manifest).
    #[error("manifest YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience constructor for [`CodegenError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CodegenError {
    CodegenError::Io {
        path: path.into(),
        source,
    }
}
