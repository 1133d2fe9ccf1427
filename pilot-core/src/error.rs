//! Error types for pilot-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading a project descriptor.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The descriptor file could not be read.
    #[error("failed to read descriptor at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The descriptor parsed (or failed to parse) into something unusable.
    #[error("malformed descriptor: {0}")]
    Malformed(#[from] MalformedDescriptor),

    /// The module root could not be determined.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// Structural or validation failure on the input descriptor.
#[derive(Debug, Error)]
pub enum MalformedDescriptor {
    /// YAML parse error — includes line/column context from serde_yaml.
    #[error("{0}")]
    Syntax(#[from] serde_yaml::Error),

    /// `apiVersion` is not of the form `<group>/<version>`.
    #[error("apiVersion '{value}' must be of the form <group>/<version>")]
    ApiVersion { value: String },

    #[error("kind must not be empty")]
    EmptyKind,

    /// The kind is used in Go type names and import paths.
    #[error("kind '{value}' must start with an ASCII letter followed by ASCII letters or digits")]
    InvalidKind { value: String },

    #[error("phase at position {index} has an empty name")]
    EmptyPhaseName { index: usize },

    #[error("phase '{name}' is declared more than once")]
    DuplicatePhase { name: String },

    /// The phase name has no characters usable in a package path.
    #[error("phase name '{name}' does not produce a valid package name")]
    InvalidPhaseName { name: String },

    /// Two distinct phase names share one worker package directory.
    #[error("phases '{first}' and '{second}' both map to worker package '{package}'")]
    PhasePackageCollision {
        first: String,
        second: String,
        package: String,
    },
}

/// Lookup failure against an external collaborator (module root or
/// template store).
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("cannot resolve module root for {dir}: {reason}")]
    ModuleRoot { dir: PathBuf, reason: String },

    #[error("module root '{value}' is empty")]
    EmptyModuleRoot { value: String },

    #[error("template '{id}' not found")]
    TemplateNotFound { id: String },

    #[error("failed to read template '{id}' at {path}: {source}")]
    TemplateIo {
        id: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
