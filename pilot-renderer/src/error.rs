//! Error types for pilot-renderer.

use std::error::Error as _;

use thiserror::Error;

use pilot_core::ResolutionError;

/// All errors that can arise from rendering a single template.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template source failed to parse.
    #[error("template '{template}' has a syntax error: {detail}")]
    Syntax { template: String, detail: String },

    /// The template parsed but failed while executing against its context
    /// (missing variable, failing function or filter, unserializable context).
    #[error("template '{template}' failed to render: {detail}")]
    Execution { template: String, detail: String },

    /// The template store could not supply the template source.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

impl RenderError {
    pub(crate) fn syntax(template: &str, err: &tera::Error) -> Self {
        RenderError::Syntax { template: template.to_string(), detail: flatten(err) }
    }

    pub(crate) fn execution(template: &str, err: &tera::Error) -> Self {
        RenderError::Execution { template: template.to_string(), detail: flatten(err) }
    }

    /// Identifier of the template involved, when there is one.
    pub fn template(&self) -> Option<&str> {
        match self {
            RenderError::Syntax { template, .. } | RenderError::Execution { template, .. } => {
                Some(template)
            }
            RenderError::Resolution(ResolutionError::TemplateNotFound { id })
            | RenderError::Resolution(ResolutionError::TemplateIo { id, .. }) => Some(id),
            RenderError::Resolution(_) => None,
        }
    }
}

/// Tera reports the useful part (the failing variable or function) in the
/// source chain; join the whole chain into one line.
fn flatten(err: &tera::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(inner) = source {
        parts.push(inner.to_string());
        source = inner.source();
    }
    parts.join(": ")
}
